//! Packed `[1, 4 + classes, boxes]` detection output -> candidate boxes.

use ndarray::{s, Axis};
use crate::common::{DetBox, Detection, LabelTable};
use crate::data::{PipelineError, PipelineResult, Tensor};
use crate::processing::classification::argmax;

/// Source and model-input sizes a detection output is mapped between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeGeometry {
    pub source_w: f32,
    pub source_h: f32,
    pub model_w: f32,
    pub model_h: f32,
}

impl DecodeGeometry {
    pub fn new(source_w: u32, source_h: u32, model_w: u32, model_h: u32) -> Self {
        Self {
            source_w: source_w as f32,
            source_h: source_h as f32,
            model_w: model_w as f32,
            model_h: model_h as f32,
        }
    }

    /// Per-axis factors from model-input space back to source pixels.
    pub fn ratios(&self) -> (f32, f32) {
        (self.source_w / self.model_w, self.source_h / self.model_h)
    }
}

/// Decodes every box whose best raw class score exceeds
/// `confidence_threshold`, in increasing box-index order.
///
/// Attribute `a` of box `i` sits at flat offset `a * B + i`: rows 0..4 are
/// `cx, cy, w, h` in model-input pixels, the remaining rows are class scores.
/// Scores are compared as the model emits them, without softmax. Geometry is
/// rescaled per axis because preprocessing stretched the image.
pub fn decode(
    output: &Tensor,
    geometry: DecodeGeometry,
    confidence_threshold: f32,
    labels: &LabelTable,
) -> PipelineResult<Vec<Detection>> {
    let preds = output.planar()?;
    let num_attrs = preds.len_of(Axis(0));
    if num_attrs < 5 {
        return Err(PipelineError::shape_mismatch("[1, 4 + num_classes (>= 1), boxes]", &output.dims()));
    }
    if geometry.model_w <= 0. || geometry.model_h <= 0. {
        return Err(PipelineError::InvalidConfig(format!(
            "model input size must be positive, got {}x{}",
            geometry.model_w, geometry.model_h
        )));
    }

    let (rx, ry) = geometry.ratios();
    let num_boxes = preds.len_of(Axis(1));
    let mut detections = Vec::new();

    for i in 0..num_boxes {
        let Some((class_id, confidence)) = argmax(preds.slice(s![4.., i]).iter().copied()) else {
            continue;
        };

        // filtering low scores
        if confidence <= confidence_threshold {
            continue;
        }

        let (cx, cy, w, h) = (preds[[0, i]], preds[[1, i]], preds[[2, i]], preds[[3, i]]);
        let bbox = DetBox::from_cxcywh(cx * rx, cy * ry, w * rx, h * ry);

        detections.push(Detection::new(class_id, bbox, labels.name(class_id), confidence));
    }

    log::trace!("Decoded {} of {} candidate boxes", detections.len(), num_boxes);
    Ok(detections)
}
