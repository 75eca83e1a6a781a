//! Adaptive weekly schedule generation.
//!
//! Harder subjects get longer sessions, morning slots and first pick of days.
//! Sessions are spread over the week with at most two per day.

pub mod slots;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{Local, TimeZone, Timelike};
use rand::Rng;

use crate::progress::ProgressTracker;
use crate::records::{ScheduleItem, StudySession, Subject, Topic};
use crate::storage::Repository;
use slots::{WeekGrid, DAY_ORDER};

/// Difficulty assumed for subjects without topics
pub const DEFAULT_SUBJECT_DIFFICULTY: f64 = 5.0;
pub const MIN_SESSIONS_PER_SUBJECT: i64 = 1;
pub const MAX_SESSIONS_PER_SUBJECT: i64 = 4;

/// Mean topic difficulty of a subject
pub fn subject_difficulty(subject_id: &str, topics: &[Topic]) -> f64 {
    let (sum, count) = topics
        .iter()
        .filter(|t| t.subject_id == subject_id)
        .fold((0.0, 0usize), |(sum, count), t| (sum + f64::from(t.difficulty), count + 1));
    if count == 0 {
        DEFAULT_SUBJECT_DIFFICULTY
    } else {
        sum / count as f64
    }
}

/// Session length in minutes for a subject of the given difficulty
pub fn session_duration(difficulty: f64) -> u32 {
    if difficulty >= 7.0 {
        90
    } else if difficulty >= 4.0 {
        60
    } else {
        45
    }
}

/// Weekly session count: target minutes over session length, kept within 1..=4
pub fn sessions_per_week(subject: &Subject, duration: u32) -> usize {
    (subject.target_minutes() / i64::from(duration))
        .clamp(MIN_SESSIONS_PER_SUBJECT, MAX_SESSIONS_PER_SUBJECT) as usize
}

/// Completed minutes against a whole-minute target, capped at 100.
/// A target under one minute gives 0.
pub fn whole_minute_completion(completed_minutes: i64, target_minutes: i64) -> f64 {
    if target_minutes <= 0 {
        return 0.0;
    }
    (completed_minutes as f64 / target_minutes as f64 * 100.0).min(100.0)
}

struct Planned<'a> {
    subject: &'a Subject,
    difficulty: f64,
    duration: u32,
    topic_index: usize,
}

/// Build a conflict-free weekly plan. `rng` only matters when a day's preferred
/// hours are exhausted.
pub fn generate_schedule<R: Rng + ?Sized>(
    subjects: &[Subject],
    topics: &[Topic],
    rng: &mut R,
) -> Vec<ScheduleItem> {
    if subjects.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(&Subject, f64)> = subjects
        .iter()
        .map(|s| (s, subject_difficulty(&s.id, topics)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let work: Vec<Planned> = ranked
        .iter()
        .flat_map(|&(subject, difficulty)| {
            let duration = session_duration(difficulty);
            (0..sessions_per_week(subject, duration)).map(move |topic_index| Planned {
                subject,
                difficulty,
                duration,
                topic_index,
            })
        })
        .collect();

    let mut topic_labels: HashMap<&str, Vec<&Topic>> = HashMap::new();
    for topic in topics {
        topic_labels.entry(topic.subject_id.as_str()).or_default().push(topic);
    }
    for labels in topic_labels.values_mut() {
        labels.sort_by(|a, b| b.difficulty.cmp(&a.difficulty));
    }

    let mut grid = WeekGrid::new();
    let mut schedule = Vec::with_capacity(work.len());
    let mut day_index = 0usize;

    for entry in &work {
        for attempt in 0..DAY_ORDER.len() {
            let day = DAY_ORDER[(day_index + attempt) % DAY_ORDER.len()];
            if !grid.has_room(day) {
                continue;
            }
            let Some(hour) = grid.find_available_slot(day, entry.duration, entry.difficulty, rng) else {
                continue;
            };

            let label = topic_labels
                .get(entry.subject.id.as_str())
                .filter(|labels| !labels.is_empty())
                .map(|labels| labels[entry.topic_index % labels.len()].name.clone())
                .unwrap_or_default();

            grid.place(day, hour, entry.duration);
            schedule.push(ScheduleItem::new(&entry.subject.id, day, hour, 0, entry.duration).with_topic(label));
            day_index = (day_index + 2) % DAY_ORDER.len();
            break;
        }
    }

    crate::logging::log_schedule_generated(subjects.len(), schedule.len(), work.len());

    schedule.sort_by(|a, b| {
        a.day_of_week
            .cmp(&b.day_of_week)
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
    schedule
}

/// Most common start hours per subject among completed sessions, up to three
pub fn time_patterns<Tz: TimeZone>(sessions: &[StudySession], tz: &Tz) -> HashMap<String, Vec<u32>> {
    let mut counts: HashMap<String, Vec<(u32, usize)>> = HashMap::new();
    for session in sessions.iter().filter(|s| s.is_completed()) {
        let Some(started) = tz.timestamp_millis_opt(session.start_time).single() else {
            continue;
        };
        let hour = started.hour();
        let hours = counts.entry(session.subject_id.clone()).or_default();
        match hours.iter_mut().find(|(h, _)| *h == hour) {
            Some((_, n)) => *n += 1,
            None => hours.push((hour, 1)),
        }
    }

    counts
        .into_iter()
        .map(|(subject_id, mut hours)| {
            hours.sort_by(|a, b| b.1.cmp(&a.1));
            (subject_id, hours.into_iter().take(3).map(|(h, _)| h).collect())
        })
        .collect()
}

pub struct ScheduleGenerator {
    repo: Arc<Repository>,
}

impl ScheduleGenerator {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    pub fn generate_adaptive_schedule(&self) -> Vec<ScheduleItem> {
        self.generate_adaptive_schedule_with(&mut rand::thread_rng())
    }

    pub fn generate_adaptive_schedule_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ScheduleItem> {
        let schedule = generate_schedule(&self.repo.list::<Subject>(), &self.repo.list::<Topic>(), rng);
        self.repo.metrics().record_schedule_generated();
        schedule
    }

    /// Replace every stored schedule item with a freshly generated plan.
    /// Manual edits to the schedule are lost.
    pub fn update_schedule_from_patterns(&self) -> Vec<ScheduleItem> {
        self.update_schedule_with(&mut rand::thread_rng())
    }

    pub fn update_schedule_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ScheduleItem> {
        let schedule = self.generate_adaptive_schedule_with(rng);
        let removed = self.repo.delete_where::<ScheduleItem, _>(|_| true);
        self.repo.add_all(schedule.clone());
        tracing::info!(removed = removed, added = schedule.len(), "Schedule replaced");
        schedule
    }

    /// Enabled items for `day` (0 = Sunday) in start-time order
    pub fn get_schedule_for_day(&self, day: u8) -> Vec<ScheduleItem> {
        let mut items: Vec<ScheduleItem> = self
            .repo
            .list::<ScheduleItem>()
            .into_iter()
            .filter(|item| item.day_of_week == day && item.enabled)
            .collect();
        items.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        items
    }

    /// Completion percentage per subject id, measured against the target
    /// truncated to whole minutes
    pub fn get_subject_progress(&self) -> HashMap<String, f64> {
        let tracker = ProgressTracker::new(Arc::clone(&self.repo));
        let now = Local::now();
        self.repo
            .list::<Subject>()
            .iter()
            .map(|subject| {
                let progress = tracker.subject_progress_at(&subject.id, &now);
                let completion = whole_minute_completion(progress.total_minutes, subject.target_minutes());
                (subject.id.clone(), completion)
            })
            .collect()
    }

    pub fn study_time_patterns(&self) -> HashMap<String, Vec<u32>> {
        time_patterns(&self.repo.list::<StudySession>(), &Local)
    }
}
