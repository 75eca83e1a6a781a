use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_target_hours")]
    pub target_hours_per_week: f64,
    #[serde(default)]
    pub description: String,
}

fn default_color() -> String {
    "#3498db".to_string()
}

fn default_target_hours() -> f64 {
    10.0
}

impl Subject {
    /// New subject with a fresh id. Negative targets are clamped to zero.
    pub fn new<S: Into<String>>(name: S, target_hours_per_week: f64) -> Self {
        Subject {
            id: super::new_id(),
            name: name.into(),
            color: default_color(),
            target_hours_per_week: target_hours_per_week.max(0.0),
            description: String::new(),
        }
    }

    pub fn with_color<S: Into<String>>(mut self, color: S) -> Self {
        self.color = color.into();
        self
    }

    /// Weekly target in whole minutes, truncated
    pub fn target_minutes(&self) -> i64 {
        (self.target_hours_per_week * 60.0) as i64
    }
}
