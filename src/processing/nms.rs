//! Greedy non-maximum suppression.

use crate::data::NmsMode;

pub trait Nms {
    fn iou(&self, other: &Self) -> f32;
    fn confidence(&self) -> f32;
    fn class_id(&self) -> usize;
}

/// Keeps the highest-confidence box, drops every remaining box whose IoU
/// with it is `>= iou_threshold`, and repeats on what is left.
///
/// Output is a subset of the input ordered by descending confidence; equal
/// confidences keep their input order. Under [`NmsMode::PerClass`] boxes of
/// different classes never suppress each other.
pub fn suppress<T: Nms>(mut boxes: Vec<T>, iou_threshold: f32, mode: NmsMode) -> Vec<T> {
    nms(&mut boxes, iou_threshold, mode);
    boxes
}

/// In-place variant of [`suppress`].
pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32, mode: NmsMode) {
    // sort_by is stable
    boxes.sort_by(|b1, b2| b2.confidence().total_cmp(&b1.confidence()));

    let mut current_index = 0;
    for index in 0..boxes.len() {
        let mut drop = false;
        for prev_index in 0..current_index {
            let kept = &boxes[prev_index];
            let candidate = &boxes[index];
            if mode == NmsMode::PerClass && kept.class_id() != candidate.class_id() {
                continue;
            }
            if kept.iou(candidate) >= iou_threshold {
                drop = true;
                break;
            }
        }
        if !drop {
            boxes.swap(current_index, index);
            current_index += 1;
        }
    }
    boxes.truncate(current_index);
}
