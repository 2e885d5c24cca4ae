mod classification;
mod det_box;
mod detection;
mod label_table;
mod model_config;
mod pipeline_config;
mod pixel_buffer;
mod prediction;

pub use classification::*;
pub use det_box::*;
pub use detection::*;
pub use label_table::*;
pub use model_config::*;
pub use pipeline_config::*;
pub use pixel_buffer::*;
pub use prediction::*;
