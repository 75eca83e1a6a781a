use serde::{Serialize, Deserialize};
use super::Millis;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    #[serde(default)]
    pub last_reviewed: Option<Millis>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    /// Manual priority override on a 0-10 scale
    #[serde(default)]
    pub manual_priority: Option<f32>,
    #[serde(default)]
    pub notes: String,
}

fn default_difficulty() -> u8 {
    2
}

impl Topic {
    pub fn new<S: Into<String>>(subject_id: &str, name: S) -> Self {
        Topic {
            id: super::new_id(),
            subject_id: subject_id.to_string(),
            name: name.into(),
            last_reviewed: None,
            review_count: 0,
            difficulty: default_difficulty(),
            manual_priority: None,
            notes: String::new(),
        }
    }

    /// Set difficulty, clamped to 1..=10
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        self
    }

    /// Set the manual priority override, clamped to 0..=10
    pub fn with_manual_priority(mut self, priority: f32) -> Self {
        self.manual_priority = Some(priority.clamp(0.0, 10.0));
        self
    }

    pub fn with_last_reviewed(mut self, at: Millis) -> Self {
        self.last_reviewed = Some(at);
        self
    }

    pub fn with_review_count(mut self, count: u32) -> Self {
        self.review_count = count;
        self
    }
}
