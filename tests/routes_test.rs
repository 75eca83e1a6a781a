mod common;

use std::time::Duration;

use smartstudy_lib::config::AppConfig;
use smartstudy_lib::records::{AlertType, Grade, ScheduleItem, StudySession, Topic};
use smartstudy_lib::routes;
use smartstudy_lib::state::AppState;

use common::temp_repo;

fn app() -> (tempfile::TempDir, AppState) {
    let (dir, repo) = temp_repo();
    (dir, AppState::with_repository(AppConfig::default(), repo))
}

#[test]
fn test_startup_builds_schedule_and_alerts() {
    let (_dir, state) = app();
    let math = routes::add_subject(&state, "Math".into(), 3.0, None).unwrap();
    routes::add_topic(&state, math.id.clone(), "Algebra".into(), 8).unwrap();

    let raised = routes::run_startup_tasks(&state);
    assert_eq!(raised.len(), 1);
    assert_eq!(raised[0].kind, AlertType::MissedStudyGoal);
    assert_eq!(state.repo.list::<ScheduleItem>().len(), 2);

    // A second start leaves the existing schedule alone
    let before: Vec<String> = state.repo.list::<ScheduleItem>().into_iter().map(|i| i.id).collect();
    assert!(routes::run_startup_tasks(&state).is_empty());
    let after: Vec<String> = state.repo.list::<ScheduleItem>().into_iter().map(|i| i.id).collect();
    assert_eq!(before, after);
}

#[test]
fn test_dashboard_snapshot() {
    let (_dir, state) = app();
    let math = routes::add_subject(&state, "Math".into(), 3.0, Some("#ff0000".into())).unwrap();
    assert_eq!(math.color, "#ff0000");
    for name in ["A", "B", "C", "D", "E", "F"] {
        state.repo.add(Topic::new(&math.id, name));
    }
    state.repo.add(ScheduleItem::new(&math.id, 4, 9, 0, 60));
    routes::login(&state, "student@smartstudy.local".into(), "studysmart".into()).unwrap();

    let snapshot = routes::dashboard_for_day(&state, 4);
    assert_eq!(snapshot.user_name.as_deref(), Some("Study Buddy"));
    assert_eq!(snapshot.suggestions.len(), 5);
    assert_eq!(snapshot.today_schedule.len(), 1);
    assert_eq!(snapshot.overall.total_subjects, 1);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("unresolvedAlerts").is_some());
    assert!(json.get("todaySchedule").is_some());
}

#[test]
fn test_invalid_input_is_rejected() {
    let (_dir, state) = app();
    assert!(routes::add_subject(&state, "  ".into(), 3.0, None).is_err());
    assert!(routes::add_topic(&state, "missing".into(), "Orphan".into(), 3).is_err());
    assert!(routes::record_grade(&state, "math".into(), "Quiz".into(), -1.0, 100.0, 0, None).is_err());
    assert!(routes::login(&state, "nobody@example.com".into(), "studysmart".into()).is_err());
}

#[test]
fn test_recording_grades_raises_alerts() {
    let (_dir, state) = app();
    let math = routes::add_subject(&state, "Math".into(), 0.0, None).unwrap();
    routes::record_grade(&state, math.id.clone(), "Quiz".into(), 95.0, 100.0, 1_000, None).unwrap();
    let (grade, raised) = routes::record_grade(
        &state,
        math.id.clone(),
        "Quiz".into(),
        60.0,
        100.0,
        2_000,
        Some("Algebra".into()),
    )
    .unwrap();
    assert_eq!(grade.category, "Algebra");
    assert_eq!(state.repo.find::<Grade>(&grade.id).unwrap().category, "Algebra");
    assert!(raised.iter().any(|a| a.kind == AlertType::GradeDrop && a.severity == 3));

    let open = routes::get_alerts(&state);
    assert!(!open.is_empty());
    assert!(routes::resolve_alert(&state, open[0].id.clone()));
}

#[test]
fn test_delete_subject_cascades() {
    let (_dir, state) = app();
    let math = routes::add_subject(&state, "Math".into(), 3.0, None).unwrap();
    let topic = routes::add_topic(&state, math.id.clone(), "Algebra".into(), 5).unwrap();
    routes::regenerate_schedule(&state);
    assert!(!state.repo.list::<ScheduleItem>().is_empty());

    assert!(routes::delete_subject(&state, math.id.clone()));
    assert!(state.repo.find::<Topic>(&topic.id).is_none());
    assert!(state.repo.list::<ScheduleItem>().is_empty());
    assert!(!routes::delete_subject(&state, math.id));
}

#[tokio::test(start_paused = true)]
async fn test_study_session_arms_break_reminder() {
    let (_dir, state) = app();
    let session = routes::start_study_session(&state, "math".into(), "Limits".into());
    assert!(state.timers.reminder.is_monitoring());

    tokio::time::sleep(Duration::from_secs(26 * 60)).await;
    assert!(!state.timers.reminder.is_monitoring());

    let ended = routes::end_study_session(&state).unwrap();
    assert_eq!(ended.id, session.id);
    assert!(state.repo.find::<StudySession>(&session.id).unwrap().is_completed());
}

#[tokio::test(start_paused = true)]
async fn test_focus_timer_from_config() {
    let (_dir, state) = app();
    state.timers.focus.start_default();
    assert_eq!(state.timers.focus.formatted_time(), "25:00");
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(state.timers.focus.formatted_time(), "24:59");
    state.timers.shutdown();
    assert!(!state.timers.focus.is_active());
}

#[test]
fn test_progress_queries() {
    let (_dir, state) = app();
    let math = routes::add_subject(&state, "Math".into(), 1.0, None).unwrap();
    let art = routes::add_subject(&state, "Art".into(), 10.0, None).unwrap();
    let now = chrono::Utc::now().timestamp_millis();
    routes::add_manual_session(&state, math.id.clone(), now - 60_000 * 60, 60, "Limits".into(), String::new());

    assert_eq!(routes::get_subject_progress(&state, math.id.clone()).completion_percentage, 100.0);
    assert_eq!(routes::get_weak_areas(&state), vec![art.id.clone()]);
    assert_eq!(routes::get_weekly_trends(&state, math.id.clone(), None).len(), 4);
    assert_eq!(routes::get_study_statistics(&state, Some(math.id.clone())).total_minutes, 60);
    assert_eq!(routes::get_study_time_patterns(&state)[&math.id].len(), 1);
    assert!(routes::get_grade_trends(&state, math.id.clone(), None).is_empty());
    assert!(routes::get_historical_comparison(&state, math.id).is_none());
    assert_eq!(routes::get_subject_performance(&state).len(), 2);
}
