use std::sync::Arc;
use std::time::{Duration, Instant};
use anyhow::anyhow;
use crate::common::{ClassificationResult, Detection, LabelTable, PipelineConfig, PixelBuffer, Prediction};
use crate::data::{PipelineError, PipelineMode, PipelineResult, PipelineStage, Tensor, Tensors};
use crate::detection_runners::InferenceEngine;
use crate::processing::{classification, detection, nms, tensor_builder, DecodeGeometry};
use crate::utils;

/// Sequences tensor building, inference and decoding for one model.
///
/// Every call is independent: the only state shared between concurrent
/// invocations is the engine handle and the read-only label table.
/// Dropping a pending call abandons the engine request and publishes nothing.
pub struct Pipeline<E> {
    engine: Arc<E>,
    config: PipelineConfig,
    labels: LabelTable,
}

impl<E> Clone for Pipeline<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            config: self.config.clone(),
            labels: self.labels.clone(),
        }
    }
}

impl<E> std::fmt::Debug for Pipeline<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("labels", &self.labels.len())
            .finish()
    }
}

impl<E: InferenceEngine> Pipeline<E> {
    pub fn new(engine: E, config: PipelineConfig, labels: LabelTable) -> PipelineResult<Self> {
        Self::with_shared_engine(Arc::new(engine), config, labels)
    }

    pub fn with_shared_engine(engine: Arc<E>, config: PipelineConfig, labels: LabelTable) -> PipelineResult<Self> {
        config.validate()?;
        log::info!(
            "{} pipeline ready | Input: {}x{} | Labels: {}",
            config.mode.as_str(), config.model_width, config.model_height, labels.len()
        );
        Ok(Self { engine, config, labels })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Runs the pipeline in its configured mode.
    pub async fn run(&self, image: &PixelBuffer) -> PipelineResult<Prediction> {
        self.forward(self.config.mode, image).await
    }

    pub async fn classify(&self, image: &PixelBuffer) -> PipelineResult<ClassificationResult> {
        self.forward_with(PipelineMode::Classification, image, Self::decode_classification)
            .await
    }

    pub async fn detect(&self, image: &PixelBuffer) -> PipelineResult<Vec<Detection>> {
        self.forward_with(PipelineMode::Detection, image, Self::decode_detections)
            .await
    }

    /// Executes the full pipeline for `mode`.
    pub async fn forward(&self, mode: PipelineMode, image: &PixelBuffer) -> PipelineResult<Prediction> {
        match mode {
            PipelineMode::Classification => self.classify(image).await.map(Prediction::Classification),
            PipelineMode::Detection => self.detect(image).await.map(Prediction::Detections),
        }
    }

    async fn forward_with<T>(
        &self,
        mode: PipelineMode,
        image: &PixelBuffer,
        decode: impl FnOnce(&Self, &Tensor, &PixelBuffer) -> PipelineResult<T>,
    ) -> PipelineResult<T> {
        let mut invocation = Invocation::start(mode);

        invocation.enter(PipelineStage::Preprocessing);
        let input = self.preprocess(image).map_err(|err| invocation.fail(err))?;

        invocation.enter(PipelineStage::AwaitingInference);
        let outputs = self.inference(input).await.map_err(|err| invocation.fail(err))?;

        invocation.enter(PipelineStage::Postprocessing);
        let result = self
            .select_output(outputs)
            .and_then(|output| decode(self, &output, image))
            .map_err(|err| invocation.fail(err))?;

        invocation.enter(PipelineStage::Done);
        Ok(result)
    }

    /// Builds the `[1, 3, H, W]` model input.
    pub fn preprocess(&self, image: &PixelBuffer) -> PipelineResult<Tensor> {
        tensor_builder::build(
            image,
            self.config.model_width,
            self.config.model_height,
            self.config.mean,
            self.config.std,
        )
    }

    /// Hands `input` to the engine, honouring the configured timeout.
    pub async fn inference(&self, input: Tensor) -> PipelineResult<Tensors> {
        let request = self.engine.infer(self.config.input_name.as_deref(), input);
        let outputs = match self.config.inference_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, request)
                .await
                .map_err(|_| PipelineError::Inference(anyhow!("no answer from the engine within {:?}", timeout)))?,
            None => request.await,
        };
        outputs.map_err(PipelineError::Inference)
    }

    fn select_output(&self, mut outputs: Tensors) -> PipelineResult<Tensor> {
        match &self.config.output_name {
            Some(name) => outputs.take(name).ok_or_else(|| {
                PipelineError::shape_mismatch(
                    format!("an output named {:?} among {:?}", name, outputs.names()),
                    &[],
                )
            }),
            None => outputs
                .take_first()
                .ok_or_else(|| PipelineError::shape_mismatch("at least one output tensor", &[])),
        }
    }

    fn decode_classification(&self, output: &Tensor, _image: &PixelBuffer) -> PipelineResult<ClassificationResult> {
        let result = classification::decode(output, &self.labels)?;
        log::debug!("Classified as {} ({:.3})", result.get_label(), result.prob);
        Ok(result)
    }

    fn decode_detections(&self, output: &Tensor, image: &PixelBuffer) -> PipelineResult<Vec<Detection>> {
        let geometry = DecodeGeometry::new(
            image.width(),
            image.height(),
            self.config.model_width,
            self.config.model_height,
        );
        let candidates = detection::decode(output, geometry, self.config.confidence_threshold, &self.labels)?;
        let num_candidates = candidates.len();

        let mut detections = nms::suppress(candidates, self.config.iou_threshold, self.config.nms_mode);
        if let Some(max) = self.config.max_detections {
            detections.truncate(max);
        }

        log::debug!("Kept {} of {} candidate detections", detections.len(), num_candidates);
        Ok(detections)
    }
}

/// Tracks the state of one call for logging and timing.
struct Invocation {
    mode: PipelineMode,
    stage: PipelineStage,
    started: Instant,
    elapsed: Duration,
}

impl Invocation {
    fn start(mode: PipelineMode) -> Self {
        Self {
            mode,
            stage: PipelineStage::Idle,
            started: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    fn enter(&mut self, next: PipelineStage) {
        if self.stage != PipelineStage::Idle {
            self.elapsed = utils::trace("TIME", self.stage.as_str(), self.started, self.elapsed);
        }
        log::debug!("{} pipeline: {} -> {}", self.mode.as_str(), self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        log::debug!("{} pipeline: {} -> {} ({})", self.mode.as_str(), self.stage, PipelineStage::Failed, err);
        self.stage = PipelineStage::Failed;
        err
    }
}
