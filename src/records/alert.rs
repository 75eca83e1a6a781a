use serde::{Serialize, Deserialize};
use super::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    GradeDrop,
    LowAttendance,
    MissedStudyGoal,
    PerformanceDecline,
    General,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::GradeDrop => "GRADE_DROP",
            AlertType::LowAttendance => "LOW_ATTENDANCE",
            AlertType::MissedStudyGoal => "MISSED_STUDY_GOAL",
            AlertType::PerformanceDecline => "PERFORMANCE_DECLINE",
            AlertType::General => "GENERAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertType,
    #[serde(default)]
    pub subject_id: Option<String>,
    pub message: String,
    pub date: Millis,
    #[serde(default)]
    pub resolved: bool,
    /// 1 = low, 2 = medium, 3 = high
    #[serde(default = "default_severity")]
    pub severity: u8,
}

fn default_severity() -> u8 {
    1
}

impl PerformanceAlert {
    pub fn new<S: Into<String>>(
        kind: AlertType,
        subject_id: Option<&str>,
        message: S,
        severity: u8,
        date: Millis,
    ) -> Self {
        PerformanceAlert {
            id: super::new_id(),
            kind,
            subject_id: subject_id.map(str::to_string),
            message: message.into(),
            date,
            resolved: false,
            severity: severity.clamp(1, 3),
        }
    }

    /// Whether this alert blocks a new one of the same type for the same subject
    pub fn is_open_for(&self, kind: AlertType, subject_id: Option<&str>) -> bool {
        !self.resolved && self.kind == kind && self.subject_id.as_deref() == subject_id
    }
}
