//! Grade analysis: averages, recent grade windows and trend detection.

use std::sync::Arc;
use chrono::{DateTime, Local, Months, TimeZone};
use serde::{Serialize, Deserialize};

use crate::records::{Grade, Millis, Subject};
use crate::storage::Repository;

/// Grades considered when detecting a trend
const TREND_WINDOW: usize = 5;
/// Mean change (percentage points) beyond which a trend is reported
const TREND_THRESHOLD: f64 = 5.0;
pub const DEFAULT_TREND_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDataPoint {
    pub date: Millis,
    /// Percentage of max score
    pub score: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PerformanceTrend {
    Improving,
    Stable,
    Declining,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalComparison {
    pub current_average: f64,
    pub previous_average: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPerformance {
    pub subject_id: String,
    pub average_grade: Option<f64>,
    pub status: PerformanceTrend,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// The last `limit` grades of a subject in date order, as percentages
pub fn grade_points(grades: &[Grade], subject_id: &str, limit: usize) -> Vec<GradeDataPoint> {
    let mut relevant: Vec<&Grade> = grades.iter().filter(|g| g.subject_id == subject_id).collect();
    relevant.sort_by_key(|g| g.date);
    let skip = relevant.len().saturating_sub(limit);
    relevant
        .into_iter()
        .skip(skip)
        .map(|g| GradeDataPoint {
            date: g.date,
            score: g.percentage(),
            kind: g.kind.clone(),
        })
        .collect()
}

/// Compare the mean of the last three points against the mean of the first two.
/// With fewer than five points the two windows overlap; that is intended.
pub fn trend_from_points(points: &[GradeDataPoint]) -> PerformanceTrend {
    if points.len() < 2 {
        return PerformanceTrend::Stable;
    }
    let recent_from = points.len().saturating_sub(3);
    let recent = mean(points[recent_from..].iter().map(|p| p.score)).unwrap_or(0.0);
    let earlier = mean(points.iter().take(2).map(|p| p.score)).unwrap_or(0.0);
    let change = recent - earlier;

    if change > TREND_THRESHOLD {
        PerformanceTrend::Improving
    } else if change < -TREND_THRESHOLD {
        PerformanceTrend::Declining
    } else {
        PerformanceTrend::Stable
    }
}

pub struct PerformanceMonitor {
    repo: Arc<Repository>,
}

impl PerformanceMonitor {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    fn grades_for(&self, subject_id: &str) -> Vec<Grade> {
        self.repo
            .list::<Grade>()
            .into_iter()
            .filter(|g| g.subject_id == subject_id)
            .collect()
    }

    /// Mean percentage over every grade, None without grades
    pub fn average_grade(&self, subject_id: &str) -> Option<f64> {
        mean(self.grades_for(subject_id).iter().map(Grade::percentage))
    }

    pub fn grade_trends(&self, subject_id: &str, limit: usize) -> Vec<GradeDataPoint> {
        grade_points(&self.repo.list::<Grade>(), subject_id, limit)
    }

    pub fn performance_trend(&self, subject_id: &str) -> PerformanceTrend {
        trend_from_points(&self.grade_trends(subject_id, TREND_WINDOW))
    }

    pub fn compare_with_historical(&self, subject_id: &str) -> Option<HistoricalComparison> {
        self.compare_with_historical_at(subject_id, &Local::now())
    }

    /// Average of grades from the last month against everything older.
    /// None when either side is empty.
    pub fn compare_with_historical_at<Tz: TimeZone>(
        &self,
        subject_id: &str,
        now: &DateTime<Tz>,
    ) -> Option<HistoricalComparison> {
        let grades = self.grades_for(subject_id);
        if grades.len() < 2 {
            return None;
        }
        let cutoff = now.clone().checked_sub_months(Months::new(1))?.timestamp_millis();

        let current_average = mean(grades.iter().filter(|g| g.date >= cutoff).map(Grade::percentage))?;
        let previous_average = mean(grades.iter().filter(|g| g.date < cutoff).map(Grade::percentage))?;

        Some(HistoricalComparison {
            current_average,
            previous_average,
            change: current_average - previous_average,
        })
    }

    pub fn all_subject_performance(&self) -> Vec<SubjectPerformance> {
        self.repo
            .list::<Subject>()
            .iter()
            .map(|subject| SubjectPerformance {
                subject_id: subject.id.clone(),
                average_grade: self.average_grade(&subject.id),
                status: self.performance_trend(&subject.id),
            })
            .collect()
    }
}
