use thiserror::Error;
use crate::data::PipelineStage;

/// Failures surfaced by a pipeline invocation.
///
/// Every variant is distinguishable from an empty detection list or a
/// low-probability classification, which are successful results.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source image or target dimensions are unusable (zero-sized, short buffer, ...).
    #[error("preprocessing failed: {0}")]
    Preprocess(String),

    /// The inference engine failed to load, execute or answer in time.
    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),

    /// The output tensor does not match the model output contract.
    #[error("shape mismatch: expected {expected}, got {actual:?}")]
    ShapeMismatch {
        expected: String,
        actual: Vec<usize>,
    },

    /// Label lookup out of range.
    #[error("label index {index} out of range for table of {len} labels")]
    Index {
        index: usize,
        len: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn shape_mismatch(expected: impl Into<String>, actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
            actual: actual.to_vec(),
        }
    }

    /// The state the invocation was in when this error was raised.
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::InvalidConfig(_) => PipelineStage::Idle,
            PipelineError::Preprocess(_) => PipelineStage::Preprocessing,
            PipelineError::Inference(_) => PipelineStage::AwaitingInference,
            PipelineError::ShapeMismatch { .. } | PipelineError::Index { .. } => PipelineStage::Postprocessing,
        }
    }

    pub fn is_postprocess(&self) -> bool {
        matches!(self.stage(), PipelineStage::Postprocessing)
    }
}
