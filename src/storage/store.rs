use std::fs;
use std::path::{Path, PathBuf};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};

use super::Record;
use crate::error::StudyError;
use crate::metrics::Metrics;
use crate::records::{
    Grade, PerformanceAlert, ScheduleItem, StudySession, Subject, Topic, UserProfile, UserSession,
};

const PROFILE_FILE: &str = "user_profile.json";
const SESSION_FILE: &str = "user_session.json";

/// File-backed store for every record collection.
///
/// The in-memory collections are the source of truth for the life of the process.
/// Each mutation rewrites the affected collection file; a failed write is logged and
/// counted but never surfaced, so callers keep working against memory.
pub struct Repository {
    data_dir: PathBuf,
    pub(super) subjects: RwLock<Vec<Subject>>,
    pub(super) topics: RwLock<Vec<Topic>>,
    pub(super) study_sessions: RwLock<Vec<StudySession>>,
    pub(super) grades: RwLock<Vec<Grade>>,
    pub(super) schedule_items: RwLock<Vec<ScheduleItem>>,
    pub(super) alerts: RwLock<Vec<PerformanceAlert>>,
    profile: RwLock<Option<UserProfile>>,
    session: RwLock<UserSession>,
    metrics: Metrics,
}

impl Repository {
    /// Open (creating if needed) the data directory and load every collection
    pub fn open<P: Into<PathBuf>>(data_dir: P) -> Result<Self, StudyError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .map_err(|e| StudyError::new(
                format!("Failed to create data directory: {}", e),
                "io"
            ).with_context(format!("path: {:?}", data_dir)))?;

        let repo = Repository {
            data_dir,
            subjects: RwLock::new(Vec::new()),
            topics: RwLock::new(Vec::new()),
            study_sessions: RwLock::new(Vec::new()),
            grades: RwLock::new(Vec::new()),
            schedule_items: RwLock::new(Vec::new()),
            alerts: RwLock::new(Vec::new()),
            profile: RwLock::new(None),
            session: RwLock::new(UserSession::default()),
            metrics: Metrics::new(),
        };
        repo.reload();
        tracing::info!(path = ?repo.data_dir, "Repository opened");
        Ok(repo)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Replace in-memory state with what is on disk
    pub fn reload(&self) {
        self.load_into::<Subject>();
        self.load_into::<Topic>();
        self.load_into::<StudySession>();
        self.load_into::<Grade>();
        self.load_into::<ScheduleItem>();
        self.load_into::<PerformanceAlert>();
        *self.profile.write() = load_single(&self.data_dir.join(PROFILE_FILE));
        *self.session.write() = load_single(&self.data_dir.join(SESSION_FILE)).unwrap_or_default();
    }

    /// Write every collection and the profile/session pair.
    /// Unlike per-mutation saves this reports the first failure.
    pub fn save_all(&self) -> Result<(), StudyError> {
        self.write_collection::<Subject>()?;
        self.write_collection::<Topic>()?;
        self.write_collection::<StudySession>()?;
        self.write_collection::<Grade>()?;
        self.write_collection::<ScheduleItem>()?;
        self.write_collection::<PerformanceAlert>()?;
        save_single(&self.data_dir.join(PROFILE_FILE), self.profile.read().as_ref())?;
        let session = self.session.read().clone();
        save_single(&self.data_dir.join(SESSION_FILE), Some(&session))?;
        Ok(())
    }

    // ===== Collection operations =====

    /// Snapshot of a whole collection
    pub fn list<T: Record>(&self) -> Vec<T> {
        T::collection(self).read().clone()
    }

    pub fn find<T: Record>(&self, id: &str) -> Option<T> {
        T::collection(self).read().iter().find(|r| r.id() == id).cloned()
    }

    pub fn add<T: Record>(&self, item: T) {
        T::collection(self).write().push(item);
        self.persist::<T>();
    }

    /// Append several records with a single save
    pub fn add_all<T: Record>(&self, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        T::collection(self).write().extend(items);
        self.persist::<T>();
    }

    /// Replace the record with the same id. Returns false (and writes nothing)
    /// when no such record exists.
    pub fn update<T: Record>(&self, item: T) -> bool {
        let id = item.id().to_string();
        let replaced = {
            let mut items = T::collection(self).write();
            match items.iter_mut().find(|r| r.id() == id) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.persist::<T>();
        } else {
            crate::logging::log_not_found(T::KIND, &id);
        }
        replaced
    }

    /// Mutate the record with `id` in place and persist it.
    /// Returns the updated record, or None when the id is unknown.
    pub fn modify<T, F>(&self, id: &str, f: F) -> Option<T>
    where
        T: Record,
        F: FnOnce(&mut T),
    {
        let updated = {
            let mut items = T::collection(self).write();
            items.iter_mut().find(|r| r.id() == id).map(|record| {
                f(record);
                record.clone()
            })
        };
        match updated {
            Some(record) => {
                self.persist::<T>();
                Some(record)
            }
            None => {
                crate::logging::log_not_found(T::KIND, id);
                None
            }
        }
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete<T: Record>(&self, id: &str) -> bool {
        self.delete_where::<T, _>(|r| r.id() == id) > 0
    }

    /// Remove every record matching `pred`, returning how many were removed
    pub fn delete_where<T, F>(&self, pred: F) -> usize
    where
        T: Record,
        F: Fn(&T) -> bool,
    {
        let removed = {
            let mut items = T::collection(self).write();
            let before = items.len();
            items.retain(|r| !pred(r));
            before - items.len()
        };
        if removed > 0 {
            self.persist::<T>();
        }
        removed
    }

    /// Delete a subject together with its topics and schedule items
    pub fn delete_subject(&self, id: &str) -> bool {
        if !self.delete::<Subject>(id) {
            crate::logging::log_not_found(Subject::KIND, id);
            return false;
        }
        let topics = self.delete_where::<Topic, _>(|t| t.subject_id == id);
        let slots = self.delete_where::<ScheduleItem, _>(|s| s.subject_id == id);
        tracing::debug!(subject_id = id, topics = topics, schedule_items = slots, "Subject deleted");
        true
    }

    // ===== Profile & session =====

    pub fn get_profile(&self) -> Option<UserProfile> {
        self.profile.read().clone()
    }

    pub fn save_profile(&self, profile: UserProfile) {
        *self.profile.write() = Some(profile.clone());
        if let Err(e) = save_single(&self.data_dir.join(PROFILE_FILE), Some(&profile)) {
            self.swallow(PROFILE_FILE, e);
        }
    }

    pub fn get_session(&self) -> UserSession {
        self.session.read().clone()
    }

    pub fn save_session(&self, session: UserSession) {
        *self.session.write() = session.clone();
        if let Err(e) = save_single(&self.data_dir.join(SESSION_FILE), Some(&session)) {
            self.swallow(SESSION_FILE, e);
        }
    }

    /// Reset to a logged-out session and remove the session file
    pub fn clear_session(&self) {
        *self.session.write() = UserSession::default();
        if let Err(e) = save_single::<UserSession>(&self.data_dir.join(SESSION_FILE), None) {
            self.swallow(SESSION_FILE, e);
        }
    }

    // ===== Internals =====

    fn load_into<T: Record>(&self) {
        let items = load_collection::<T>(&self.data_dir.join(T::FILE_NAME));
        *T::collection(self).write() = items;
    }

    fn write_collection<T: Record>(&self) -> Result<(), StudyError> {
        let items = T::collection(self).read();
        write_json(&self.data_dir.join(T::FILE_NAME), &*items)
    }

    fn persist<T: Record>(&self) {
        if let Err(e) = self.write_collection::<T>() {
            self.swallow(T::FILE_NAME, e);
        }
    }

    fn swallow(&self, file: &str, error: StudyError) {
        self.metrics.record_persistence_failure();
        tracing::error!(file = file, error = %error, "Failed to persist data, keeping in-memory state");
    }
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    match fs::read_to_string(path) {
        Ok(data) if data.trim().is_empty() => Vec::new(),
        Ok(data) => match serde_json::from_str::<Vec<T>>(&data) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    path = ?path,
                    error = %e,
                    "Failed to parse data file, starting empty"
                );
                Vec::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            tracing::warn!(
                path = ?path,
                error = %e,
                "Failed to read data file, starting empty"
            );
            Vec::new()
        }
    }
}

fn load_single<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Failed to read data file");
            return None;
        }
    };
    if data.trim().is_empty() {
        return None;
    }
    serde_json::from_str(&data)
        .map_err(|e| tracing::warn!(path = ?path, error = %e, "Failed to parse data file"))
        .ok()
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StudyError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| StudyError::new(
            format!("Failed to serialize data: {}", e),
            "json_serialize"
        ))?;

    fs::write(path, json)
        .map_err(|e| StudyError::new(
            format!("Failed to write data file: {}", e),
            "io"
        ).with_context(format!("path: {:?}", path)))
}

/// Write a single-object file, or delete it when `value` is None
fn save_single<T: Serialize>(path: &Path, value: Option<&T>) -> Result<(), StudyError> {
    match value {
        Some(value) => write_json(path, value),
        None => match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StudyError::from(e).with_context(format!("path: {:?}", path))),
        },
    }
}
