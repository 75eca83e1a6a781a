mod common;

use smartstudy_lib::alerts::AlertEngine;
use smartstudy_lib::records::{AlertType, Grade, PerformanceAlert, StudySession, Subject};

use common::{temp_repo, DAY_MS, NOW};

fn add_grades(repo: &smartstudy_lib::storage::Repository, subject_id: &str, scores: &[f64]) {
    for (i, &score) in scores.iter().enumerate() {
        let date = NOW - (scores.len() - i) as i64 * DAY_MS;
        repo.add(Grade::new(subject_id, "Quiz", score, 100.0, date).unwrap());
    }
}

/// Subject whose study goal is already met, so only grade checks fire
fn on_track_subject(repo: &smartstudy_lib::storage::Repository, name: &str) -> Subject {
    let subject = Subject::new(name, 1.0);
    repo.add(subject.clone());
    repo.add(StudySession::completed(&subject.id, NOW - DAY_MS, 60));
    subject
}

fn kinds(alerts: &[PerformanceAlert]) -> Vec<AlertType> {
    alerts.iter().map(|a| a.kind).collect()
}

#[test]
fn test_rising_grades_raise_nothing() {
    let (_dir, repo) = temp_repo();
    let math = on_track_subject(&repo, "Math");
    add_grades(&repo, &math.id, &[70.0, 90.0]);

    let raised = AlertEngine::new(repo).check_and_generate_alerts_at(NOW);
    assert!(raised.is_empty());
}

#[test]
fn test_twenty_point_drop_is_medium() {
    let (_dir, repo) = temp_repo();
    let math = on_track_subject(&repo, "Math");
    add_grades(&repo, &math.id, &[90.0, 70.0]);

    let raised = AlertEngine::new(repo).check_and_generate_alerts_at(NOW);
    assert_eq!(kinds(&raised), vec![AlertType::GradeDrop]);
    assert_eq!(raised[0].severity, 2);
    assert_eq!(raised[0].subject_id.as_deref(), Some(math.id.as_str()));
    assert!(raised[0].message.contains("20.0%"));
    assert!(raised[0].message.contains("Math"));
}

#[test]
fn test_steep_drop_is_high() {
    let (_dir, repo) = temp_repo();
    let math = on_track_subject(&repo, "Math");
    add_grades(&repo, &math.id, &[80.0, 82.0, 55.0]);

    let raised = AlertEngine::new(repo).check_and_generate_alerts_at(NOW);
    let drop = raised.iter().find(|a| a.kind == AlertType::GradeDrop).unwrap();
    assert_eq!(drop.severity, 3);
}

#[test]
fn test_checks_are_idempotent() {
    let (_dir, repo) = temp_repo();
    let math = on_track_subject(&repo, "Math");
    add_grades(&repo, &math.id, &[90.0, 70.0]);
    let engine = AlertEngine::new(repo.clone());

    assert_eq!(engine.check_and_generate_alerts_at(NOW).len(), 1);
    assert!(engine.check_and_generate_alerts_at(NOW).is_empty());
    assert_eq!(repo.list::<PerformanceAlert>().len(), 1);
    assert_eq!(repo.metrics().snapshot().alerts_raised, 1);
}

#[test]
fn test_resolved_alert_can_be_raised_again() {
    let (_dir, repo) = temp_repo();
    let math = on_track_subject(&repo, "Math");
    add_grades(&repo, &math.id, &[90.0, 70.0]);
    let engine = AlertEngine::new(repo.clone());

    let first = engine.check_and_generate_alerts_at(NOW).remove(0);
    assert!(engine.resolve_alert(&first.id));
    assert!(!engine.resolve_alert(&first.id), "second resolve changes nothing");
    assert!(!engine.resolve_alert("missing"));
    assert_eq!(engine.unresolved_count(), 0);

    assert_eq!(engine.check_and_generate_alerts_at(NOW).len(), 1);
    assert_eq!(engine.unresolved_count(), 1);
}

#[test]
fn test_declining_trend() {
    let (_dir, repo) = temp_repo();
    let math = on_track_subject(&repo, "Math");
    add_grades(&repo, &math.id, &[90.0, 88.0, 60.0, 62.0, 61.0]);

    let raised = AlertEngine::new(repo).check_and_generate_alerts_at(NOW);
    assert_eq!(kinds(&raised), vec![AlertType::PerformanceDecline]);
    assert_eq!(raised[0].severity, 2);
}

#[test]
fn test_missed_study_goal() {
    let (_dir, repo) = temp_repo();
    let history = Subject::new("History", 10.0);
    repo.add(history.clone());
    // 120 of 600 target minutes
    repo.add(StudySession::completed(&history.id, NOW - DAY_MS, 120));

    let engine = AlertEngine::new(repo);
    let raised = engine.check_and_generate_alerts_at(NOW);
    assert_eq!(kinds(&raised), vec![AlertType::MissedStudyGoal]);
    assert!(raised[0].message.contains("20.0%"));
    assert_eq!(engine.alerts_by_severity(2).len(), 1);
    assert!(engine.alerts_by_severity(3).is_empty());
}

#[test]
fn test_unresolved_alerts_newest_first() {
    let (_dir, repo) = temp_repo();
    let math = Subject::new("Math", 10.0);
    repo.add(math.clone());
    add_grades(&repo, &math.id, &[90.0, 70.0]);
    let engine = AlertEngine::new(repo);

    engine.check_and_generate_alerts_at(NOW);
    let alerts = engine.unresolved_alerts();
    assert_eq!(alerts.len(), 2);
    assert!(alerts.windows(2).all(|w| w[0].date >= w[1].date));
}
