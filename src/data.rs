mod error;
mod nms_mode;
mod pipeline_mode;
mod pipeline_stage;
mod tensor;
mod tensors;

pub use error::{PipelineError, PipelineResult};
pub use nms_mode::NmsMode;
pub use pipeline_mode::PipelineMode;
pub use pipeline_stage::PipelineStage;
pub use tensor::Tensor;
pub use tensors::Tensors;
