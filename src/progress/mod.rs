//! Study-goal progress per subject, computed from completed sessions.

use std::sync::Arc;
use chrono::{DateTime, Datelike, Duration, Local, TimeZone};
use serde::{Serialize, Deserialize};

use crate::records::{Millis, StudySession, Subject};
use crate::storage::Repository;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyData {
    pub week_start: Millis,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectProgress {
    pub subject_id: String,
    pub completion_percentage: f64,
    pub total_minutes: i64,
    pub this_week_minutes: i64,
    /// Oldest week first
    pub weekly_trends: Vec<WeeklyData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatistics {
    pub total_study_minutes: i64,
    pub average_completion: f64,
    pub improving_subjects: usize,
    pub total_subjects: usize,
}

pub const DEFAULT_TREND_WEEKS: usize = 4;
pub const DEFAULT_WEAK_THRESHOLD: f64 = 50.0;

/// Completed minutes against the weekly target, capped at 100.
/// Counts all-time minutes, not just the current week. Zero target gives 0.
pub fn completion_percentage(completed_minutes: i64, target_hours_per_week: f64) -> f64 {
    let target_minutes = target_hours_per_week * 60.0;
    if target_minutes <= 0.0 {
        return 0.0;
    }
    (completed_minutes as f64 / target_minutes * 100.0).min(100.0)
}

/// Monday 00:00 of the week containing `now`, in `now`'s timezone
pub fn week_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let monday = now.date_naive() - Duration::days(i64::from(now.weekday().num_days_from_monday()));
    let Some(midnight) = monday.and_hms_opt(0, 0, 0) else {
        return now.clone();
    };
    let tz = now.timezone();
    tz.from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

fn completed_for<'a>(
    sessions: &'a [StudySession],
    subject_id: &'a str,
) -> impl Iterator<Item = &'a StudySession> + 'a {
    sessions
        .iter()
        .filter(move |s| s.subject_id == subject_id && s.is_completed())
}

/// Minutes per week for the last `weeks` weeks, oldest first
pub fn weekly_minutes<Tz: TimeZone>(
    sessions: &[StudySession],
    subject_id: &str,
    weeks: usize,
    now: &DateTime<Tz>,
) -> Vec<WeeklyData> {
    let current = week_start(now);
    let mut trends: Vec<WeeklyData> = (0..weeks)
        .map(|offset| {
            let start = current.clone() - Duration::weeks(offset as i64);
            let from = start.timestamp_millis();
            let to = (start + Duration::weeks(1)).timestamp_millis();
            let minutes = completed_for(sessions, subject_id)
                .filter(|s| s.start_time >= from && s.start_time < to)
                .map(|s| s.duration_minutes)
                .sum();
            WeeklyData { week_start: from, minutes }
        })
        .collect();
    trends.reverse();
    trends
}

fn progress_for<Tz: TimeZone>(
    subject: &Subject,
    sessions: &[StudySession],
    now: &DateTime<Tz>,
) -> SubjectProgress {
    let total_minutes: i64 = completed_for(sessions, &subject.id)
        .map(|s| s.duration_minutes)
        .sum();
    let week_from = week_start(now).timestamp_millis();
    let this_week_minutes = completed_for(sessions, &subject.id)
        .filter(|s| s.start_time >= week_from)
        .map(|s| s.duration_minutes)
        .sum();

    SubjectProgress {
        subject_id: subject.id.clone(),
        completion_percentage: completion_percentage(total_minutes, subject.target_hours_per_week),
        total_minutes,
        this_week_minutes,
        weekly_trends: weekly_minutes(sessions, &subject.id, DEFAULT_TREND_WEEKS, now),
    }
}

pub struct ProgressTracker {
    repo: Arc<Repository>,
}

impl ProgressTracker {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    pub fn subject_progress(&self, subject_id: &str) -> SubjectProgress {
        self.subject_progress_at(subject_id, &Local::now())
    }

    /// Progress for one subject. Unknown subjects report all zeros.
    pub fn subject_progress_at<Tz: TimeZone>(&self, subject_id: &str, now: &DateTime<Tz>) -> SubjectProgress {
        match self.repo.find::<Subject>(subject_id) {
            Some(subject) => progress_for(&subject, &self.repo.list::<StudySession>(), now),
            None => SubjectProgress {
                subject_id: subject_id.to_string(),
                completion_percentage: 0.0,
                total_minutes: 0,
                this_week_minutes: 0,
                weekly_trends: Vec::new(),
            },
        }
    }

    pub fn all_subject_progress(&self) -> Vec<SubjectProgress> {
        self.all_subject_progress_at(&Local::now())
    }

    pub fn all_subject_progress_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<SubjectProgress> {
        let sessions = self.repo.list::<StudySession>();
        self.repo
            .list::<Subject>()
            .iter()
            .map(|subject| progress_for(subject, &sessions, now))
            .collect()
    }

    pub fn weekly_trends(&self, subject_id: &str, weeks: usize) -> Vec<WeeklyData> {
        weekly_minutes(&self.repo.list::<StudySession>(), subject_id, weeks, &Local::now())
    }

    /// Subjects whose completion is below `threshold` percent
    pub fn identify_weak_areas(&self, threshold: f64) -> Vec<String> {
        self.all_subject_progress()
            .into_iter()
            .filter(|p| p.completion_percentage < threshold)
            .map(|p| p.subject_id)
            .collect()
    }

    pub fn overall_statistics(&self) -> OverallStatistics {
        overall_statistics(&self.all_subject_progress())
    }
}

/// Aggregate over per-subject progress. A subject is improving when its most
/// recent week has more minutes than the week before.
pub fn overall_statistics(progress: &[SubjectProgress]) -> OverallStatistics {
    let total_study_minutes = progress.iter().map(|p| p.total_minutes).sum();
    let average_completion = if progress.is_empty() {
        0.0
    } else {
        progress.iter().map(|p| p.completion_percentage).sum::<f64>() / progress.len() as f64
    };
    let improving_subjects = progress
        .iter()
        .filter(|p| match p.weekly_trends.as_slice() {
            [.., previous, last] => last.minutes > previous.minutes,
            _ => false,
        })
        .count();

    OverallStatistics {
        total_study_minutes,
        average_completion,
        improving_subjects,
        total_subjects: progress.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(150, 5.0), 50.0);
        assert_eq!(completion_percentage(900, 5.0), 100.0);
        assert_eq!(completion_percentage(120, 0.0), 0.0);
    }

    #[test]
    fn test_week_start_is_monday_midnight() {
        // 2024-05-16 is a Thursday
        let start = week_start(&at(2024, 5, 16, 15));
        assert_eq!(start, at(2024, 5, 13, 0));
        // Sunday belongs to the week that started the previous Monday
        assert_eq!(week_start(&at(2024, 5, 19, 23)), at(2024, 5, 13, 0));
    }

    #[test]
    fn test_weekly_minutes_oldest_first() {
        let now = at(2024, 5, 16, 12);
        let this_week = at(2024, 5, 14, 9).timestamp_millis();
        let last_week = at(2024, 5, 8, 9).timestamp_millis();
        let sessions = vec![
            StudySession::completed("math", this_week, 40),
            StudySession::completed("math", last_week, 25),
            StudySession::completed("art", this_week, 90),
            StudySession::started("math", "", this_week),
        ];

        let weeks = weekly_minutes(&sessions, "math", 3, &now);
        let minutes: Vec<i64> = weeks.iter().map(|w| w.minutes).collect();
        assert_eq!(minutes, vec![0, 25, 40]);
        assert_eq!(weeks[2].week_start, at(2024, 5, 13, 0).timestamp_millis());
    }

    #[test]
    fn test_overall_statistics_counts_improving() {
        let progress = vec![
            SubjectProgress {
                subject_id: "a".into(),
                completion_percentage: 40.0,
                total_minutes: 100,
                this_week_minutes: 60,
                weekly_trends: vec![
                    WeeklyData { week_start: 0, minutes: 40 },
                    WeeklyData { week_start: 1, minutes: 60 },
                ],
            },
            SubjectProgress {
                subject_id: "b".into(),
                completion_percentage: 80.0,
                total_minutes: 50,
                this_week_minutes: 0,
                weekly_trends: vec![WeeklyData { week_start: 0, minutes: 50 }],
            },
        ];
        let stats = overall_statistics(&progress);
        assert_eq!(stats.total_study_minutes, 150);
        assert_eq!(stats.average_completion, 60.0);
        assert_eq!(stats.improving_subjects, 1);
        assert_eq!(stats.total_subjects, 2);
    }
}
