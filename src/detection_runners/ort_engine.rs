//! ONNX Runtime backend for [`InferenceEngine`].

use std::sync::Arc;
use anyhow::{anyhow, Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use parking_lot::Mutex;
use crate::common::ModelConfig;
use crate::data::{Tensor, Tensors};
use crate::detection_runners::InferenceEngine;

/// CPU ONNX Runtime session. Runs are serialised on the session and executed
/// on tokio's blocking pool so the calling task never blocks.
pub struct OrtEngine {
    session: Arc<Mutex<Session>>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl std::fmt::Debug for OrtEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtEngine")
            .field("inputs", &self.input_names)
            .field("outputs", &self.output_names)
            .finish()
    }
}

impl OrtEngine {
    pub fn new(model: &ModelConfig) -> Result<Self> {
        // load-dynamic resolves the runtime library through ORT_DYLIB_PATH
        if let Some(lib_path) = &model.ort_lib_path {
            std::env::set_var("ORT_DYLIB_PATH", lib_path);
        }

        let session = Self::load_session(&model.weights_path)
            .with_context(|| format!("failed to load ONNX model {}", model.weights_path))?;

        let input_names: Vec<String> = session.inputs.iter().map(|x| x.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|x| x.name.clone()).collect();

        log::info!(
            "Backend: ONNXRuntime | Model: {} | Inputs: {:?} | Outputs: {:?}",
            model.weights_path, input_names, output_names
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_names,
            output_names,
        })
    }

    fn load_session(weights_path: &str) -> Result<Session, ort::Error> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(weights_path)?;
        Ok(session)
    }

    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }

    fn engine_run(session: &Mutex<Session>, input_name: &str, output_names: &[String], input: Tensor) -> Result<Tensors> {
        let shape: Vec<i64> = input.dims().iter().map(|&d| d as i64).collect();
        let value = ort::value::Tensor::from_array((shape, input.into_raw()))?;

        let mut session = session.lock();
        let outputs = session.run(ort::inputs![input_name => value])?;

        let mut ys = Tensors::new();
        for name in output_names.iter() {
            let (shape, data) = outputs[name.as_str()].try_extract_tensor::<f32>()?;
            let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
            ys.push_kv(name, Tensor::from_shape_vec(&dims, data.to_vec())?);
        }
        Ok(ys)
    }
}

impl InferenceEngine for OrtEngine {
    async fn infer(&self, input_name: Option<&str>, input: Tensor) -> Result<Tensors> {
        let input_name = match input_name {
            Some(name) => name.to_string(),
            None => self
                .input_names
                .first()
                .cloned()
                .ok_or_else(|| anyhow!("model declares no inputs"))?,
        };
        let session = Arc::clone(&self.session);
        let output_names = self.output_names.clone();

        tokio::task::spawn_blocking(move || Self::engine_run(&session, &input_name, &output_names, input))
            .await?
    }
}
