use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::common::{LabelTable, PipelineConfig};

/// Where a model and its labels live, plus how to drive it.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub weights_path: String,
    #[serde(default)]
    pub labels_path: Option<String>,
    /// Path to the ONNX Runtime shared library, when it is not on the loader path.
    #[serde(default)]
    pub ort_lib_path: Option<String>,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl ModelConfig {
    pub fn new(weights_path: String, labels_path: Option<String>, pipeline: PipelineConfig) -> Self {
        Self {
            weights_path,
            labels_path,
            ort_lib_path: None,
            pipeline,
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid model configuration in {}", path.display()))
    }

    /// Loads the label table, or an empty one when no path is configured
    /// or the file is unusable.
    pub async fn load_labels(&self) -> LabelTable {
        match &self.labels_path {
            Some(path) => LabelTable::load_or_empty(path).await,
            None => {
                log::warn!("No labels path configured, continuing without class names");
                LabelTable::empty()
            }
        }
    }

    pub fn to_string(&self) -> String {
        format!("Weights File Path: {}\n\
        Labels Path: {}\n\
        OnnxRuntime Lib Path: {}\n\
        {}",
                self.weights_path,
                self.labels_path.as_deref().unwrap_or("-"),
                self.ort_lib_path.as_deref().unwrap_or("-"),
                self.pipeline.to_string())
    }
}
