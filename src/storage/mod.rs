pub mod store;

pub use store::Repository;

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use crate::records::{Grade, PerformanceAlert, ScheduleItem, StudySession, Subject, Topic};

/// A record kind stored as one JSON array file in the data directory.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// File name inside the data directory
    const FILE_NAME: &'static str;
    /// Short name used in logs
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// In-memory collection backing this record kind
    fn collection(repo: &Repository) -> &RwLock<Vec<Self>>;
}

impl Record for Subject {
    const FILE_NAME: &'static str = "subjects.json";
    const KIND: &'static str = "subject";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(repo: &Repository) -> &RwLock<Vec<Self>> {
        &repo.subjects
    }
}

impl Record for Topic {
    const FILE_NAME: &'static str = "topics.json";
    const KIND: &'static str = "topic";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(repo: &Repository) -> &RwLock<Vec<Self>> {
        &repo.topics
    }
}

impl Record for StudySession {
    const FILE_NAME: &'static str = "study_sessions.json";
    const KIND: &'static str = "study_session";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(repo: &Repository) -> &RwLock<Vec<Self>> {
        &repo.study_sessions
    }
}

impl Record for Grade {
    const FILE_NAME: &'static str = "grades.json";
    const KIND: &'static str = "grade";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(repo: &Repository) -> &RwLock<Vec<Self>> {
        &repo.grades
    }
}

impl Record for ScheduleItem {
    const FILE_NAME: &'static str = "schedule_items.json";
    const KIND: &'static str = "schedule_item";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(repo: &Repository) -> &RwLock<Vec<Self>> {
        &repo.schedule_items
    }
}

impl Record for PerformanceAlert {
    const FILE_NAME: &'static str = "alerts.json";
    const KIND: &'static str = "alert";

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(repo: &Repository) -> &RwLock<Vec<Self>> {
        &repo.alerts
    }
}
