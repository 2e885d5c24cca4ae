use serde::{Deserialize, Serialize};
use crate::common::DetBox;
use crate::processing::nms::Nms;

/// One decoded object: geometry in source-image pixels, the winning class
/// and its raw score. Never mutated once the decoder has emitted it.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: DetBox,
    pub confidence: f32,
    pub class_id: usize,
    pub class_name: Option<String>,
}

impl Nms for Detection {
    fn iou(&self, other: &Self) -> f32 {
        self.bbox.iou(&other.bbox)
    }

    fn confidence(&self) -> f32 {
        self.confidence
    }

    fn class_id(&self) -> usize {
        self.class_id
    }
}

impl Detection {
    pub fn new(class_id: usize, bbox: DetBox, class_name: Option<String>, confidence: f32) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
            class_name,
        }
    }

    pub fn x(&self) -> f32 {
        self.bbox.x
    }

    pub fn y(&self) -> f32 {
        self.bbox.y
    }

    pub fn w(&self) -> f32 {
        self.bbox.w
    }

    pub fn h(&self) -> f32 {
        self.bbox.h
    }

    pub fn get_label(&self) -> String {
        self.class_name.clone().unwrap_or("Unknown".to_string())
    }
}
