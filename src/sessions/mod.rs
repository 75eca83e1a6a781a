//! Study time tracking: live sessions, manual entries and statistics.

use std::sync::Arc;
use chrono::{Datelike, Local, TimeZone};
use parking_lot::Mutex;
use serde::{Serialize, Deserialize};

use crate::records::{now_millis, Millis, StudySession};
use crate::storage::Repository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyStatistics {
    pub total_minutes: i64,
    pub total_sessions: usize,
    /// Whole minutes, rounded down
    pub average_session_length: i64,
    /// 0 = Sunday .. 6 = Saturday
    pub most_active_day: Option<u8>,
}

fn in_range(start_time: Millis, from: Option<Millis>, to: Option<Millis>) -> bool {
    start_time >= from.unwrap_or(Millis::MIN) && start_time <= to.unwrap_or(Millis::MAX)
}

/// Summary over completed sessions. Ties for the busiest weekday go to the
/// weekday seen first.
pub fn statistics_for<Tz: TimeZone>(sessions: &[StudySession], tz: &Tz) -> StudyStatistics {
    let completed: Vec<&StudySession> = sessions.iter().filter(|s| s.is_completed()).collect();
    let total_minutes: i64 = completed.iter().map(|s| s.duration_minutes).sum();
    let average_session_length = if completed.is_empty() {
        0
    } else {
        total_minutes / completed.len() as i64
    };

    let mut by_day: Vec<(u8, usize)> = Vec::new();
    for session in &completed {
        let Some(started) = tz.timestamp_millis_opt(session.start_time).single() else {
            continue;
        };
        let day = started.weekday().num_days_from_sunday() as u8;
        match by_day.iter_mut().find(|(d, _)| *d == day) {
            Some((_, n)) => *n += 1,
            None => by_day.push((day, 1)),
        }
    }
    let most_active_day = by_day
        .iter()
        .fold(None::<(u8, usize)>, |best, &(day, n)| match best {
            Some((_, top)) if top >= n => best,
            _ => Some((day, n)),
        })
        .map(|(day, _)| day);

    StudyStatistics {
        total_minutes,
        total_sessions: completed.len(),
        average_session_length,
        most_active_day,
    }
}

/// Tracks at most one running session at a time.
pub struct TimeTracker {
    repo: Arc<Repository>,
    active: Mutex<Option<StudySession>>,
}

impl TimeTracker {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self {
            repo,
            active: Mutex::new(None),
        }
    }

    /// Start a session now, ending any session already running
    pub fn start_session(&self, subject_id: &str, topic: &str) -> StudySession {
        self.start_session_at(subject_id, topic, now_millis())
    }

    pub fn start_session_at(&self, subject_id: &str, topic: &str, now: Millis) -> StudySession {
        if self.active.lock().is_some() {
            self.end_session_at(None, now);
        }

        let session = StudySession::started(subject_id, topic, now);
        self.repo.add(session.clone());
        *self.active.lock() = Some(session.clone());
        tracing::info!(session_id = %session.id, subject_id = subject_id, "Study session started");
        session
    }

    /// End `session_id`, or the active session when None.
    /// Returns the ended session; None when there was nothing open to end.
    pub fn end_session(&self, session_id: Option<&str>) -> Option<StudySession> {
        self.end_session_at(session_id, now_millis())
    }

    pub fn end_session_at(&self, session_id: Option<&str>, now: Millis) -> Option<StudySession> {
        let target = match session_id {
            Some(id) => self.repo.find::<StudySession>(id),
            None => self.active.lock().clone(),
        }?;
        if !target.is_active() {
            return None;
        }

        let ended = self.repo.modify::<StudySession, _>(&target.id, |s| s.finish(now))?;
        {
            let mut active = self.active.lock();
            if active.as_ref().is_some_and(|a| a.id == ended.id) {
                *active = None;
            }
        }
        self.repo.metrics().record_session_completed();
        tracing::info!(
            session_id = %ended.id,
            duration_minutes = ended.duration_minutes,
            "Study session ended"
        );
        Some(ended)
    }

    pub fn active_session(&self) -> Option<StudySession> {
        self.active.lock().clone()
    }

    /// Record a finished session after the fact
    pub fn add_manual_session(
        &self,
        subject_id: &str,
        start_time: Millis,
        duration_minutes: i64,
        topic: &str,
        notes: &str,
    ) -> StudySession {
        let mut session = StudySession::completed(subject_id, start_time, duration_minutes.max(0));
        session.topic = topic.to_string();
        session.notes = notes.to_string();
        self.repo.add(session.clone());
        self.repo.metrics().record_session_completed();
        session
    }

    /// Completed minutes for a subject with start time inside the inclusive range
    pub fn total_study_time(&self, subject_id: &str, from: Option<Millis>, to: Option<Millis>) -> i64 {
        self.repo
            .list::<StudySession>()
            .iter()
            .filter(|s| s.subject_id == subject_id && s.is_completed())
            .filter(|s| in_range(s.start_time, from, to))
            .map(|s| s.duration_minutes)
            .sum()
    }

    /// Sessions matching the filters, newest first
    pub fn sessions(&self, subject_id: Option<&str>, from: Option<Millis>, to: Option<Millis>) -> Vec<StudySession> {
        let mut sessions: Vec<StudySession> = self
            .repo
            .list::<StudySession>()
            .into_iter()
            .filter(|s| subject_id.map_or(true, |id| s.subject_id == id))
            .filter(|s| in_range(s.start_time, from, to))
            .collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions
    }

    pub fn statistics(&self, subject_id: Option<&str>) -> StudyStatistics {
        statistics_for(&self.sessions(subject_id, None, None), &Local)
    }
}
