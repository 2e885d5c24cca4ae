use crate::common::{ClassificationResult, Detection};

/// Final result of one pipeline invocation.
#[derive(Clone, PartialEq)]
pub enum Prediction {
    Classification(ClassificationResult),
    Detections(Vec<Detection>),
}

impl std::fmt::Debug for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut f = f.debug_struct("Prediction");
        match self {
            Prediction::Classification(x) => {
                f.field("Classification", &x);
            }
            Prediction::Detections(x) => {
                f.field("Detections", &x.len());
                if !x.is_empty() {
                    f.field("Boxes", &x);
                }
            }
        }
        f.finish()
    }
}

impl Prediction {
    pub fn classification(&self) -> Option<&ClassificationResult> {
        match self {
            Prediction::Classification(x) => Some(x),
            Prediction::Detections(_) => None,
        }
    }

    pub fn detections(&self) -> Option<&[Detection]> {
        match self {
            Prediction::Detections(x) => Some(x),
            Prediction::Classification(_) => None,
        }
    }
}
