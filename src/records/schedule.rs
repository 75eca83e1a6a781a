use serde::{Serialize, Deserialize};

/// One recurring weekly study slot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    pub subject_id: String,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    /// Zero-padded 24-hour "HH:mm"
    pub start_time: String,
    pub duration_minutes: u32,
    #[serde(default = "default_true")]
    pub recurring: bool,
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Format minutes past midnight as "HH:mm"
pub fn format_hhmm(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// Parse "HH:mm" into minutes past midnight
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.trim().split_once(':')?;
    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

impl ScheduleItem {
    pub fn new(subject_id: &str, day_of_week: u8, hour: u32, minute: u32, duration_minutes: u32) -> Self {
        ScheduleItem {
            id: super::new_id(),
            subject_id: subject_id.to_string(),
            day_of_week: day_of_week % 7,
            start_time: format_hhmm(hour, minute),
            duration_minutes: duration_minutes.max(1),
            recurring: true,
            topic: String::new(),
            enabled: true,
        }
    }

    pub fn with_topic<S: Into<String>>(mut self, topic: S) -> Self {
        self.topic = topic.into();
        self
    }

    /// Start as minutes past midnight, None if the stored time is malformed
    pub fn start_minute(&self) -> Option<u32> {
        parse_hhmm(&self.start_time)
    }

    /// Same day and overlapping half-open intervals
    pub fn conflicts_with(&self, other: &ScheduleItem) -> bool {
        if self.day_of_week != other.day_of_week {
            return false;
        }
        match (self.start_minute(), other.start_minute()) {
            (Some(a), Some(b)) => {
                let (a, b) = (u64::from(a), u64::from(b));
                a < b + u64::from(other.duration_minutes) && b < a + u64::from(self.duration_minutes)
            }
            _ => false,
        }
    }
}
