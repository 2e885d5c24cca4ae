use serde::{Deserialize, Serialize};

/// Which decoder the orchestrator dispatches to after inference.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    Classification,
    #[default] Detection,
}

impl PipelineMode {
    pub fn from_str(mode: &str) -> Option<Self> {
        match mode.to_lowercase().as_str() {
            "classification" | "classify" => Some(PipelineMode::Classification),
            "detection" | "detect" => Some(PipelineMode::Detection),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineMode::Classification => "Classification",
            PipelineMode::Detection => "Detection",
        }
    }
}
