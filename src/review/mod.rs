//! Review prioritizer: ranks topics by how urgently they need another look.

use std::cmp::Ordering;
use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::records::{now_millis, Millis, Topic, DAY_MS};
use crate::storage::Repository;

/// Days-since-review values are capped at this many days when scoring
const MAX_COUNTED_DAYS: i64 = 30;
/// Review counts above this no longer lower the score
const MAX_COUNTED_REVIEWS: u32 = 10;
const NEVER_REVIEWED_BONUS: f64 = 50.0;
/// How far a skip pushes the next review
pub const SKIP_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSuggestion {
    pub topic: Topic,
    pub priority_score: f64,
    /// None when the topic has never been reviewed
    pub days_since_review: Option<i64>,
}

/// Where a topic stands relative to `now`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAge {
    Never,
    Days(i64),
    /// Last review lies in the future (skipped); hidden from suggestions
    Deferred,
}

pub fn review_age(topic: &Topic, now: Millis) -> ReviewAge {
    match topic.last_reviewed {
        None => ReviewAge::Never,
        Some(at) if at > now => ReviewAge::Deferred,
        Some(at) => ReviewAge::Days((now - at) / DAY_MS),
    }
}

/// Urgency score; higher means review sooner.
/// A manual priority replaces the computed score entirely.
pub fn review_score(topic: &Topic, age: ReviewAge) -> f64 {
    if let Some(priority) = topic.manual_priority {
        return f64::from(priority) * 10.0;
    }

    let days = match age {
        ReviewAge::Never => MAX_COUNTED_DAYS,
        ReviewAge::Days(d) => d.min(MAX_COUNTED_DAYS),
        ReviewAge::Deferred => 0,
    };

    let mut score = days as f64 * 2.0;
    score += f64::from(MAX_COUNTED_REVIEWS - topic.review_count.min(MAX_COUNTED_REVIEWS)) * 1.5;
    score += f64::from(topic.difficulty);
    if age == ReviewAge::Never {
        score += NEVER_REVIEWED_BONUS;
    }
    score
}

/// Rank `topics` at time `now`. Ties keep input order.
pub fn rank_topics(topics: &[Topic], now: Millis, limit: usize) -> Vec<TopicSuggestion> {
    let mut suggestions: Vec<TopicSuggestion> = topics
        .iter()
        .filter_map(|topic| {
            let age = review_age(topic, now);
            let days_since_review = match age {
                ReviewAge::Deferred => return None,
                ReviewAge::Never => None,
                ReviewAge::Days(d) => Some(d),
            };
            Some(TopicSuggestion {
                topic: topic.clone(),
                priority_score: review_score(topic, age),
                days_since_review,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.priority_score.partial_cmp(&a.priority_score).unwrap_or(Ordering::Equal)
    });
    suggestions.truncate(limit);
    suggestions
}

pub struct ReviewPrioritizer {
    repo: Arc<Repository>,
}

impl ReviewPrioritizer {
    pub fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    fn topics_for(&self, subject_id: Option<&str>) -> Vec<Topic> {
        let topics = self.repo.list::<Topic>();
        match subject_id {
            Some(id) => topics.into_iter().filter(|t| t.subject_id == id).collect(),
            None => topics,
        }
    }

    /// Topics most in need of review, optionally for one subject
    pub fn suggest_topics(&self, subject_id: Option<&str>, limit: usize) -> Vec<TopicSuggestion> {
        self.suggest_topics_at(subject_id, limit, now_millis())
    }

    pub fn suggest_topics_at(
        &self,
        subject_id: Option<&str>,
        limit: usize,
        now: Millis,
    ) -> Vec<TopicSuggestion> {
        rank_topics(&self.topics_for(subject_id), now, limit)
    }

    /// Record a review now. None when the topic does not exist.
    pub fn mark_reviewed(&self, topic_id: &str) -> Option<Topic> {
        self.mark_reviewed_at(topic_id, now_millis())
    }

    pub fn mark_reviewed_at(&self, topic_id: &str, now: Millis) -> Option<Topic> {
        let updated = self.repo.modify::<Topic, _>(topic_id, |topic| {
            topic.last_reviewed = Some(now);
            topic.review_count = topic.review_count.saturating_add(1);
        })?;
        self.repo.metrics().record_review_marked();
        tracing::debug!(topic_id = topic_id, review_count = updated.review_count, "Topic reviewed");
        Some(updated)
    }

    /// Hide a topic from suggestions for a week. Review count is untouched.
    pub fn skip_topic(&self, topic_id: &str) -> Option<Topic> {
        self.skip_topic_at(topic_id, now_millis())
    }

    pub fn skip_topic_at(&self, topic_id: &str, now: Millis) -> Option<Topic> {
        let updated = self.repo.modify::<Topic, _>(topic_id, |topic| {
            topic.last_reviewed = Some(now + SKIP_DAYS * DAY_MS);
        })?;
        self.repo.metrics().record_topic_skipped();
        tracing::debug!(topic_id = topic_id, "Topic skipped");
        Some(updated)
    }

    pub fn topics_by_difficulty(&self, subject_id: Option<&str>, difficulty: u8) -> Vec<Topic> {
        self.topics_for(subject_id)
            .into_iter()
            .filter(|t| t.difficulty == difficulty)
            .collect()
    }
}
