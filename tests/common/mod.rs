#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use anyhow::anyhow;
use vision_pipeline::data::{Tensor, Tensors};
use vision_pipeline::InferenceEngine;

/// Engine that answers every request with the same outputs and remembers
/// the input shapes it was given.
pub struct StaticEngine {
    outputs: Tensors,
    seen: Mutex<Vec<(Option<String>, Vec<usize>)>>,
}

impl StaticEngine {
    pub fn new(outputs: Tensors) -> Self {
        Self {
            outputs,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn single(output: Tensor) -> Self {
        Self::new(Tensors::from(output))
    }

    pub fn calls(&self) -> Vec<(Option<String>, Vec<usize>)> {
        self.seen.lock().unwrap().clone()
    }
}

impl InferenceEngine for StaticEngine {
    async fn infer(&self, input_name: Option<&str>, input: Tensor) -> anyhow::Result<Tensors> {
        self.seen
            .lock()
            .unwrap()
            .push((input_name.map(str::to_string), input.dims()));
        Ok(self.outputs.clone())
    }
}

/// Engine whose every run fails.
#[derive(Default)]
pub struct FailingEngine {
    pub calls: AtomicUsize,
}

impl FailingEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InferenceEngine for FailingEngine {
    async fn infer(&self, _input_name: Option<&str>, _input: Tensor) -> anyhow::Result<Tensors> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("execution provider crashed"))
    }
}

/// Engine that takes `delay` before answering.
pub struct SlowEngine {
    pub delay: Duration,
    pub outputs: Tensors,
}

impl InferenceEngine for SlowEngine {
    async fn infer(&self, _input_name: Option<&str>, _input: Tensor) -> anyhow::Result<Tensors> {
        tokio::time::sleep(self.delay).await;
        Ok(self.outputs.clone())
    }
}

/// Packs `(cx, cy, w, h)` boxes and their class scores into the planar
/// `[1, 4 + classes, boxes]` layout, attribute `a` of box `i` at `a * B + i`.
pub fn detection_output(boxes: &[([f32; 4], Vec<f32>)]) -> Tensor {
    let num_boxes = boxes.len();
    let num_classes = boxes.first().map_or(1, |(_, scores)| scores.len());
    let num_attrs = 4 + num_classes;

    let mut data = vec![0.0f32; num_attrs * num_boxes];
    for (i, (geometry, scores)) in boxes.iter().enumerate() {
        assert_eq!(scores.len(), num_classes);
        for (a, v) in geometry.iter().chain(scores.iter()).enumerate() {
            data[a * num_boxes + i] = *v;
        }
    }
    Tensor::from_shape_vec(&[1, num_attrs, num_boxes], data).unwrap()
}

pub fn classification_output(scores: &[f32]) -> Tensor {
    Tensor::from_shape_vec(&[1, scores.len()], scores.to_vec()).unwrap()
}

pub fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}
