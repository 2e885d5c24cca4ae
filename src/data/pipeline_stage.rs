/// States a single pipeline invocation moves through.
///
/// `Idle -> Preprocessing -> AwaitingInference -> Postprocessing -> Done`,
/// or `Failed` from any of them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    #[default] Idle,
    Preprocessing,
    AwaitingInference,
    Postprocessing,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Idle => "Idle",
            PipelineStage::Preprocessing => "Preprocessing",
            PipelineStage::AwaitingInference => "AwaitingInference",
            PipelineStage::Postprocessing => "Postprocessing",
            PipelineStage::Done => "Done",
            PipelineStage::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
