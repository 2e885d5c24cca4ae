mod inference_engine;
mod pipeline;
#[cfg(feature = "ort")]
mod ort_engine;

pub use inference_engine::InferenceEngine;
pub use pipeline::Pipeline;
#[cfg(feature = "ort")]
pub use ort_engine::OrtEngine;
