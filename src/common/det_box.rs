use serde::{Deserialize, Serialize};

/// Axis-aligned box stored as top-left corner plus size, in pixels.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl DetBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Builds a box from its center and size.
    pub fn from_cxcywh(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.,
            y: cy - h / 2.,
            w,
            h,
        }
    }

    pub fn x_max(&self) -> f32 {
        self.x + self.w
    }

    pub fn y_max(&self) -> f32 {
        self.y + self.h
    }

    pub fn cx(&self) -> f32 {
        self.x + self.w / 2.
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Overlapping area; non-overlapping extents are clamped to zero.
    pub fn intersect(&self, other: &DetBox) -> f32 {
        let left = self.x.max(other.x);
        let right = self.x_max().min(other.x_max());
        let top = self.y.max(other.y);
        let bottom = self.y_max().min(other.y_max());
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    pub fn union(&self, other: &DetBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Intersection over union. Two degenerate boxes with no union area
    /// have an IoU of 0.
    pub fn iou(&self, other: &DetBox) -> f32 {
        let union = self.union(other);
        if union <= 0. {
            return 0.;
        }
        self.intersect(other) / union
    }
}
