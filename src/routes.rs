//! Command surface used by front ends and the CLI.
//!
//! Commands return `Result<T, String>` so any host can forward the message as-is.

use chrono::{Datelike, Local};
use serde::Serialize;

use crate::error::StudyError;
use crate::metrics::MetricsSnapshot;
use crate::performance::{GradeDataPoint, HistoricalComparison, SubjectPerformance, DEFAULT_TREND_LIMIT};
use crate::progress::{OverallStatistics, SubjectProgress, WeeklyData, DEFAULT_TREND_WEEKS, DEFAULT_WEAK_THRESHOLD};
use crate::records::{Grade, Millis, PerformanceAlert, ScheduleItem, StudySession, Subject, Topic, UserProfile};
use crate::review::TopicSuggestion;
use crate::sessions::StudyStatistics;
use crate::state::app::AppState;

/// Suggestions shown on the dashboard
const DASHBOARD_SUGGESTIONS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub user_name: Option<String>,
    pub unresolved_alerts: Vec<PerformanceAlert>,
    pub suggestions: Vec<TopicSuggestion>,
    pub today_schedule: Vec<ScheduleItem>,
    pub overall: OverallStatistics,
    pub metrics: MetricsSnapshot,
}

/// Today's weekday, 0 = Sunday
pub fn today() -> u8 {
    Local::now().weekday().num_days_from_sunday() as u8
}

pub fn get_dashboard(state: &AppState) -> DashboardSnapshot {
    dashboard_for_day(state, today())
}

pub fn dashboard_for_day(state: &AppState, day: u8) -> DashboardSnapshot {
    let limit = state.config.suggestion_limit.min(DASHBOARD_SUGGESTIONS);
    DashboardSnapshot {
        user_name: state.auth.current_user().map(|u| u.name),
        unresolved_alerts: state.alerts.unresolved_alerts(),
        suggestions: state.prioritizer.suggest_topics(None, limit),
        today_schedule: state.scheduler.get_schedule_for_day(day),
        overall: state.progress.overall_statistics(),
        metrics: state.repo.metrics().snapshot(),
    }
}

/// Alert check plus a first schedule when none exists yet
pub fn run_startup_tasks(state: &AppState) -> Vec<PerformanceAlert> {
    let raised = state.alerts.check_and_generate_alerts();
    if state.repo.list::<ScheduleItem>().is_empty() {
        let items = state.scheduler.update_schedule_from_patterns();
        tracing::info!(items = items.len(), "Generated initial schedule");
    }
    raised
}

pub fn login(state: &AppState, email: String, password: String) -> Result<UserProfile, String> {
    state.auth.login(&email, &password).map_err(|e| e.to_string())
}

pub fn register(state: &AppState, name: String, email: String, password: String) -> Result<UserProfile, String> {
    state.auth.register(&name, &email, &password).map_err(|e| e.to_string())
}

pub fn logout(state: &AppState) {
    state.auth.logout();
}

pub fn add_subject(state: &AppState, name: String, target_hours_per_week: f64, color: Option<String>) -> Result<Subject, String> {
    if name.trim().is_empty() {
        return Err(StudyError::new("Subject name must not be blank", "validation").to_string());
    }
    let mut subject = Subject::new(name.trim(), target_hours_per_week);
    if let Some(color) = color {
        subject = subject.with_color(color);
    }
    state.repo.add(subject.clone());
    Ok(subject)
}

/// Removes the subject with its topics and schedule items
pub fn delete_subject(state: &AppState, subject_id: String) -> bool {
    state.repo.delete_subject(&subject_id)
}

pub fn add_topic(state: &AppState, subject_id: String, name: String, difficulty: u8) -> Result<Topic, String> {
    if state.repo.find::<Subject>(&subject_id).is_none() {
        return Err(StudyError::new("Subject not found", "validation")
            .with_context(format!("subject_id: {}", subject_id))
            .to_string());
    }
    let topic = Topic::new(&subject_id, name).with_difficulty(difficulty);
    state.repo.add(topic.clone());
    Ok(topic)
}

pub fn get_review_suggestions(state: &AppState, subject_id: Option<String>) -> Vec<TopicSuggestion> {
    state
        .prioritizer
        .suggest_topics(subject_id.as_deref(), state.config.suggestion_limit)
}

pub fn mark_topic_reviewed(state: &AppState, topic_id: String) -> Option<Topic> {
    state.prioritizer.mark_reviewed(&topic_id)
}

pub fn skip_topic(state: &AppState, topic_id: String) -> Option<Topic> {
    state.prioritizer.skip_topic(&topic_id)
}

pub fn get_topics_by_difficulty(state: &AppState, subject_id: Option<String>, difficulty: u8) -> Vec<Topic> {
    state.prioritizer.topics_by_difficulty(subject_id.as_deref(), difficulty)
}

/// Store a grade, then re-run the alert check. Returns the grade and any new alerts.
pub fn record_grade(
    state: &AppState,
    subject_id: String,
    kind: String,
    score: f64,
    max_score: f64,
    date: Millis,
    category: Option<String>,
) -> Result<(Grade, Vec<PerformanceAlert>), String> {
    let mut grade = Grade::new(&subject_id, kind, score, max_score, date).map_err(|e| e.to_string())?;
    if let Some(category) = category {
        grade = grade.with_category(category);
    }
    state.repo.add(grade.clone());
    Ok((grade, state.alerts.check_and_generate_alerts()))
}

pub fn get_alerts(state: &AppState) -> Vec<PerformanceAlert> {
    state.alerts.unresolved_alerts()
}

pub fn resolve_alert(state: &AppState, alert_id: String) -> bool {
    state.alerts.resolve_alert(&alert_id)
}

pub fn regenerate_schedule(state: &AppState) -> Vec<ScheduleItem> {
    state.scheduler.update_schedule_from_patterns()
}

/// Start tracking a session and arm the break reminder.
/// Must be called from within a Tokio runtime.
pub fn start_study_session(state: &AppState, subject_id: String, topic: String) -> StudySession {
    let session = state.tracker.start_session(&subject_id, &topic);
    let message = state.timers.reminder.break_message();
    state.timers.reminder.start_monitoring(&session, move || {
        tracing::info!(message = %message, "Break reminder");
    });
    session
}

pub fn end_study_session(state: &AppState) -> Option<StudySession> {
    state.timers.reminder.stop_monitoring();
    state.tracker.end_session(None)
}

pub fn get_subject_progress(state: &AppState, subject_id: String) -> SubjectProgress {
    state.progress.subject_progress(&subject_id)
}

pub fn get_weekly_trends(state: &AppState, subject_id: String, weeks: Option<usize>) -> Vec<WeeklyData> {
    state
        .progress
        .weekly_trends(&subject_id, weeks.unwrap_or(DEFAULT_TREND_WEEKS))
}

/// Subjects under half of their study goal
pub fn get_weak_areas(state: &AppState) -> Vec<String> {
    state.progress.identify_weak_areas(DEFAULT_WEAK_THRESHOLD)
}

pub fn get_grade_trends(state: &AppState, subject_id: String, limit: Option<usize>) -> Vec<GradeDataPoint> {
    state
        .performance
        .grade_trends(&subject_id, limit.unwrap_or(DEFAULT_TREND_LIMIT))
}

pub fn get_historical_comparison(state: &AppState, subject_id: String) -> Option<HistoricalComparison> {
    state.performance.compare_with_historical(&subject_id)
}

pub fn get_subject_performance(state: &AppState) -> Vec<SubjectPerformance> {
    state.performance.all_subject_performance()
}

/// Most common start hours per subject id
pub fn get_study_time_patterns(state: &AppState) -> std::collections::HashMap<String, Vec<u32>> {
    state.scheduler.study_time_patterns()
}

pub fn get_study_statistics(state: &AppState, subject_id: Option<String>) -> StudyStatistics {
    state.tracker.statistics(subject_id.as_deref())
}

pub fn add_manual_session(
    state: &AppState,
    subject_id: String,
    start_time: Millis,
    duration_minutes: i64,
    topic: String,
    notes: String,
) -> StudySession {
    state
        .tracker
        .add_manual_session(&subject_id, start_time, duration_minutes, &topic, &notes)
}
