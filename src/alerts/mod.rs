//! Performance alerts raised from grade trends and study-goal progress.
//!
//! Every pass checks for an unresolved alert of the same type and subject before
//! inserting, so repeated checks without new data add nothing.

use std::sync::Arc;

use crate::performance::{GradeDataPoint, PerformanceMonitor, PerformanceTrend};
use crate::progress::ProgressTracker;
use crate::records::{now_millis, AlertType, Millis, PerformanceAlert, Subject};
use crate::storage::Repository;

/// Grade points inspected by the drop check
const DROP_WINDOW: usize = 3;
/// Percentage-point fall that raises an alert
const DROP_THRESHOLD: f64 = 10.0;
/// Falls beyond this are high severity
const SEVERE_DROP: f64 = 20.0;
const MISSED_GOAL_THRESHOLD: f64 = 50.0;

/// Fall from the second-to-last to the last point, when it exceeds the threshold
pub fn grade_drop(points: &[GradeDataPoint]) -> Option<f64> {
    let [.., previous, recent] = points else {
        return None;
    };
    let drop = previous.score - recent.score;
    (drop > DROP_THRESHOLD).then_some(drop)
}

pub fn drop_severity(drop: f64) -> u8 {
    if drop > SEVERE_DROP {
        3
    } else {
        2
    }
}

pub struct AlertEngine {
    repo: Arc<Repository>,
    performance: PerformanceMonitor,
    progress: ProgressTracker,
}

impl AlertEngine {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self {
            performance: PerformanceMonitor::new(Arc::clone(&repo)),
            progress: ProgressTracker::new(Arc::clone(&repo)),
            repo,
        }
    }

    /// Run every check and return the alerts that were inserted
    pub fn check_and_generate_alerts(&self) -> Vec<PerformanceAlert> {
        self.check_and_generate_alerts_at(now_millis())
    }

    pub fn check_and_generate_alerts_at(&self, now: Millis) -> Vec<PerformanceAlert> {
        let subjects = self.repo.list::<Subject>();
        let mut raised = Vec::new();
        raised.extend(self.check_grade_drops(&subjects, now));
        raised.extend(self.check_missed_study_goals(&subjects, now));
        raised.extend(self.check_performance_decline(&subjects, now));
        tracing::debug!(subjects = subjects.len(), raised = raised.len(), "Alert check finished");
        raised
    }

    fn check_grade_drops(&self, subjects: &[Subject], now: Millis) -> Vec<PerformanceAlert> {
        subjects
            .iter()
            .filter_map(|subject| {
                let points = self.performance.grade_trends(&subject.id, DROP_WINDOW);
                let drop = grade_drop(&points)?;
                self.raise_once(
                    AlertType::GradeDrop,
                    &subject.id,
                    format!(
                        "Grade dropped by {:.1}% in {}. Consider reviewing recent topics and seeking help.",
                        drop, subject.name
                    ),
                    drop_severity(drop),
                    now,
                )
            })
            .collect()
    }

    fn check_missed_study_goals(&self, subjects: &[Subject], now: Millis) -> Vec<PerformanceAlert> {
        self.progress
            .all_subject_progress()
            .into_iter()
            .filter(|p| p.completion_percentage < MISSED_GOAL_THRESHOLD)
            .filter_map(|progress| {
                let subject = subjects.iter().find(|s| s.id == progress.subject_id)?;
                self.raise_once(
                    AlertType::MissedStudyGoal,
                    &subject.id,
                    format!(
                        "Study goal completion is {:.1}% for {}. Consider adjusting your schedule.",
                        progress.completion_percentage, subject.name
                    ),
                    2,
                    now,
                )
            })
            .collect()
    }

    fn check_performance_decline(&self, subjects: &[Subject], now: Millis) -> Vec<PerformanceAlert> {
        subjects
            .iter()
            .filter(|subject| self.performance.performance_trend(&subject.id) == PerformanceTrend::Declining)
            .filter_map(|subject| {
                self.raise_once(
                    AlertType::PerformanceDecline,
                    &subject.id,
                    format!(
                        "Performance trend is declining in {}. Review recent topics and consider additional study time.",
                        subject.name
                    ),
                    2,
                    now,
                )
            })
            .collect()
    }

    /// Insert an alert unless an unresolved one of the same type and subject exists
    fn raise_once(
        &self,
        kind: AlertType,
        subject_id: &str,
        message: String,
        severity: u8,
        now: Millis,
    ) -> Option<PerformanceAlert> {
        let exists = self
            .repo
            .list::<PerformanceAlert>()
            .iter()
            .any(|a| a.is_open_for(kind, Some(subject_id)));
        if exists {
            return None;
        }

        let alert = PerformanceAlert::new(kind, Some(subject_id), message, severity, now);
        self.repo.add(alert.clone());
        self.repo.metrics().record_alert_raised();
        crate::logging::log_alert_raised(kind.as_str(), Some(subject_id), alert.severity);
        Some(alert)
    }

    /// Unresolved alerts, newest first
    pub fn unresolved_alerts(&self) -> Vec<PerformanceAlert> {
        let mut alerts: Vec<PerformanceAlert> = self
            .repo
            .list::<PerformanceAlert>()
            .into_iter()
            .filter(|a| !a.resolved)
            .collect();
        alerts.sort_by(|a, b| b.date.cmp(&a.date));
        alerts
    }

    pub fn alerts_by_severity(&self, severity: u8) -> Vec<PerformanceAlert> {
        self.unresolved_alerts()
            .into_iter()
            .filter(|a| a.severity == severity)
            .collect()
    }

    pub fn unresolved_count(&self) -> usize {
        self.repo
            .list::<PerformanceAlert>()
            .iter()
            .filter(|a| !a.resolved)
            .count()
    }

    /// Mark an alert resolved. Returns true only when an unresolved alert was
    /// found and changed; unknown or already-resolved ids are a no-op.
    pub fn resolve_alert(&self, alert_id: &str) -> bool {
        let open = self
            .repo
            .find::<PerformanceAlert>(alert_id)
            .is_some_and(|a| !a.resolved);
        if !open {
            return false;
        }
        self.repo
            .modify::<PerformanceAlert, _>(alert_id, |a| a.resolved = true)
            .is_some()
    }
}
