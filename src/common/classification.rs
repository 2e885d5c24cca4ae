use serde::{Deserialize, Serialize};

/// Winning class of a classification run and its softmax probability.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub class_id: usize,
    /// `None` when the label table has no entry for `class_id`.
    pub name: Option<String>,
    pub prob: f32,
}

impl ClassificationResult {
    pub fn new(class_id: usize, name: Option<String>, prob: f32) -> Self {
        Self { class_id, name, prob }
    }

    pub fn get_label(&self) -> String {
        self.name.clone().unwrap_or("Unknown".to_string())
    }
}
