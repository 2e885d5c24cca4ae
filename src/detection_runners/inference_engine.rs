use std::future::Future;
use std::sync::Arc;
use crate::data::{Tensor, Tensors};

/// Executes a model forward pass. Loading weights and running the graph are
/// the engine's business; the pipeline only hands it an input tensor and
/// reads back named outputs.
pub trait InferenceEngine: Send + Sync {
    /// Runs the model on `input`, a `[1, 3, H, W]` tensor. `input_name`
    /// selects the model input; `None` means the engine's first input.
    fn infer(
        &self,
        input_name: Option<&str>,
        input: Tensor,
    ) -> impl Future<Output = anyhow::Result<Tensors>> + Send;
}

impl<E: InferenceEngine> InferenceEngine for Arc<E> {
    fn infer(
        &self,
        input_name: Option<&str>,
        input: Tensor,
    ) -> impl Future<Output = anyhow::Result<Tensors>> + Send {
        self.as_ref().infer(input_name, input)
    }
}
