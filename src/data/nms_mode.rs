use serde::{Deserialize, Serialize};

/// How the suppressor decides which boxes may suppress each other.
///
/// `ClassAgnostic` compares every pair of boxes regardless of class, so two
/// objects of different classes at the same location collapse into one.
/// `PerClass` only lets a box suppress boxes of its own `class_id`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NmsMode {
    #[default] ClassAgnostic,
    PerClass,
}

impl NmsMode {
    pub fn from_str(mode: &str) -> Option<Self> {
        match mode.to_lowercase().as_str() {
            "class_agnostic" | "agnostic" => Some(NmsMode::ClassAgnostic),
            "per_class" | "class" => Some(NmsMode::PerClass),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NmsMode::ClassAgnostic => "class_agnostic",
            NmsMode::PerClass => "per_class",
        }
    }
}
