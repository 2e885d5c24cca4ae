use std::time::Duration;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::data::{NmsMode, PipelineError, PipelineMode, PipelineResult};

pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Options recognised by the pipeline for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: PipelineMode,
    pub model_width: u32,
    pub model_height: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub nms_mode: NmsMode,
    /// Keep at most this many detections after suppression.
    pub max_detections: Option<usize>,
    /// Engine input name; `None` lets the engine use its first input.
    pub input_name: Option<String>,
    /// Output to decode; `None` takes the first one returned.
    pub output_name: Option<String>,
    pub inference_timeout_ms: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::detection()
    }
}

impl PipelineConfig {
    /// 640x640 stretched input, raw `[0, 1]` samples, confidence 0.5, IoU 0.5.
    pub fn detection() -> Self {
        Self {
            mode: PipelineMode::Detection,
            model_width: 640,
            model_height: 640,
            mean: [0.0; 3],
            std: [1.0; 3],
            confidence_threshold: 0.5,
            iou_threshold: 0.5,
            nms_mode: NmsMode::ClassAgnostic,
            max_detections: None,
            input_name: None,
            output_name: None,
            inference_timeout_ms: None,
        }
    }

    /// 224x224 input normalised with the ImageNet mean/std.
    pub fn classification() -> Self {
        Self {
            mode: PipelineMode::Classification,
            model_width: 224,
            model_height: 224,
            mean: IMAGENET_MEAN,
            std: IMAGENET_STD,
            confidence_threshold: 0.0,
            ..Self::detection()
        }
    }

    pub fn with_mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_model_size(mut self, width: u32, height: u32) -> Self {
        self.model_width = width;
        self.model_height = height;
        self
    }

    pub fn with_mean(mut self, mean: [f32; 3]) -> Self {
        self.mean = mean;
        self
    }

    pub fn with_std(mut self, std: [f32; 3]) -> Self {
        self.std = std;
        self
    }

    pub fn with_confidence_threshold(mut self, x: f32) -> Self {
        self.confidence_threshold = x;
        self
    }

    pub fn with_iou_threshold(mut self, x: f32) -> Self {
        self.iou_threshold = x;
        self
    }

    pub fn with_nms_mode(mut self, mode: NmsMode) -> Self {
        self.nms_mode = mode;
        self
    }

    pub fn with_max_detections(mut self, n: usize) -> Self {
        self.max_detections = Some(n);
        self
    }

    pub fn with_input_name(mut self, name: &str) -> Self {
        self.input_name = Some(name.to_string());
        self
    }

    pub fn with_output_name(mut self, name: &str) -> Self {
        self.output_name = Some(name.to_string());
        self
    }

    /// Sub-millisecond timeouts round up to 1 ms.
    pub fn with_inference_timeout(mut self, timeout: Duration) -> Self {
        self.inference_timeout_ms = Some(timeout.as_nanos().div_ceil(1_000_000) as u64);
        self
    }

    pub fn inference_timeout(&self) -> Option<Duration> {
        self.inference_timeout_ms.map(Duration::from_millis)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid pipeline configuration")
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.model_width == 0 || self.model_height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "model input size must be positive, got {}x{}",
                self.model_width, self.model_height
            )));
        }
        if let Some(c) = self.std.iter().position(|s| *s == 0.0 || !s.is_finite()) {
            return Err(PipelineError::InvalidConfig(format!(
                "std[{}] must be finite and non-zero, got {}",
                c, self.std[c]
            )));
        }
        if self.mean.iter().any(|m| !m.is_finite()) {
            return Err(PipelineError::InvalidConfig(format!("mean must be finite, got {:?}", self.mean)));
        }
        for (name, x) in [
            ("confidence_threshold", self.confidence_threshold),
            ("iou_threshold", self.iou_threshold),
        ] {
            if !(0.0..=1.0).contains(&x) {
                return Err(PipelineError::InvalidConfig(format!("{name} must lie in [0, 1], got {x}")));
            }
        }
        if self.inference_timeout_ms == Some(0) {
            return Err(PipelineError::InvalidConfig("inference_timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn to_string(&self) -> String {
        format!("Mode: {}\n\
        Model Input Resolution: {}x{}\n\
        Mean: {:?}\n\
        Std: {:?}\n\
        Confidence Threshold: {}\n\
        IoU Threshold: {} ({})",
                self.mode.as_str(), self.model_width, self.model_height,
                self.mean, self.std, self.confidence_threshold,
                self.iou_threshold, self.nms_mode.as_str())
    }
}
