use serde::{Serialize, Deserialize};
use super::{Millis, MINUTE_MS};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    #[serde(default)]
    pub topic: String,
    pub start_time: Millis,
    /// None while the session is still running
    #[serde(default)]
    pub end_time: Option<Millis>,
    #[serde(default)]
    pub duration_minutes: i64,
    #[serde(default)]
    pub notes: String,
}

impl StudySession {
    /// Open session starting at `start_time`
    pub fn started<S: Into<String>>(subject_id: &str, topic: S, start_time: Millis) -> Self {
        StudySession {
            id: super::new_id(),
            subject_id: subject_id.to_string(),
            topic: topic.into(),
            start_time,
            end_time: None,
            duration_minutes: 0,
            notes: String::new(),
        }
    }

    /// Completed session with a known duration
    pub fn completed(subject_id: &str, start_time: Millis, duration_minutes: i64) -> Self {
        StudySession {
            end_time: Some(start_time + duration_minutes * MINUTE_MS),
            duration_minutes,
            ..Self::started(subject_id, "", start_time)
        }
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// Close the session at `end_time`, recording whole elapsed minutes
    pub fn finish(&mut self, end_time: Millis) {
        self.end_time = Some(end_time);
        self.duration_minutes = (end_time - self.start_time) / MINUTE_MS;
    }
}
