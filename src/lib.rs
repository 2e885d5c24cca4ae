//! Image classification and object detection pre/post-processing around a
//! pluggable inference engine.
//!
//! A [`Pipeline`] stretches a [`PixelBuffer`] into the model's NCHW input,
//! hands it to an [`InferenceEngine`], then decodes the output into a
//! [`ClassificationResult`] or a suppressed list of [`Detection`]s.

mod utils;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod processing;

use crate::common::{LabelTable, ModelConfig};

pub use crate::common::{ClassificationResult, Detection, PipelineConfig, PixelBuffer, Prediction};
pub use crate::data::{PipelineError, PipelineResult};
pub use crate::detection_runners::{InferenceEngine, Pipeline};
#[cfg(feature = "ort")]
pub use crate::detection_runners::OrtEngine;

/// Builds a pipeline for `model` around an already constructed engine.
///
/// Labels are loaded from `model.labels_path`; a missing or unreadable label
/// file degrades to unnamed classes instead of failing.
pub async fn init_pipeline<E: InferenceEngine>(engine: E, model: &ModelConfig) -> anyhow::Result<Pipeline<E>> {
    log::info!("Initializing pipeline\n{}", model.to_string());
    let labels: LabelTable = model.load_labels().await;
    let pipeline = Pipeline::new(engine, model.pipeline.clone(), labels)?;
    Ok(pipeline)
}

/// Loads the ONNX model described by `model` and warms it up with one run
/// on a blank frame.
#[cfg(feature = "ort")]
pub async fn init_ort_pipeline(model: &ModelConfig) -> anyhow::Result<Pipeline<OrtEngine>> {
    let engine = OrtEngine::new(model)?;
    let pipeline = init_pipeline(engine, model).await?;

    let blank = PixelBuffer::filled(model.pipeline.model_width, model.pipeline.model_height, [0, 0, 0]);
    pipeline.run(&blank).await?;
    Ok(pipeline)
}
