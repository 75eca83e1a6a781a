//! Record types persisted by the repository.
//!
//! Field names on disk are camelCase. Missing fields take their documented defaults
//! and unknown fields are ignored, so older and newer data files both load.

pub mod alert;
pub mod grade;
pub mod profile;
pub mod schedule;
pub mod session;
pub mod subject;
pub mod topic;

pub use alert::{AlertType, PerformanceAlert};
pub use grade::Grade;
pub use profile::{UserProfile, UserSession};
pub use schedule::ScheduleItem;
pub use session::StudySession;
pub use subject::Subject;
pub use topic::Topic;

/// Milliseconds since the Unix epoch.
pub type Millis = i64;

pub const MINUTE_MS: Millis = 60_000;
pub const DAY_MS: Millis = 24 * 60 * 60 * 1000;

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> Millis {
    chrono::Utc::now().timestamp_millis()
}

/// Fresh random record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
