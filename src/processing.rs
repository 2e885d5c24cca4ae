pub mod classification;
pub mod detection;
pub mod nms;
pub mod tensor_builder;

pub use detection::DecodeGeometry;
pub use nms::{suppress, Nms};
