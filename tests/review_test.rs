mod common;

use smartstudy_lib::records::Topic;
use smartstudy_lib::review::ReviewPrioritizer;

use common::{temp_repo, DAY_MS, NOW};

#[test]
fn test_suggestions_rank_stale_topics_first() {
    let (_dir, repo) = temp_repo();
    let fresh = Topic::new("math", "Limits").with_last_reviewed(NOW - DAY_MS).with_review_count(5);
    let stale = Topic::new("math", "Series").with_last_reviewed(NOW - 20 * DAY_MS).with_review_count(5);
    let never = Topic::new("math", "Proofs");
    repo.add_all(vec![fresh.clone(), stale.clone(), never.clone()]);

    let prioritizer = ReviewPrioritizer::new(repo);
    let ranked = prioritizer.suggest_topics_at(None, 10, NOW);
    let ids: Vec<&str> = ranked.iter().map(|s| s.topic.id.as_str()).collect();
    assert_eq!(ids, vec![never.id.as_str(), stale.id.as_str(), fresh.id.as_str()]);
    assert_eq!(ranked[0].days_since_review, None);
    assert_eq!(ranked[1].days_since_review, Some(20));
}

#[test]
fn test_limit_and_subject_filter() {
    let (_dir, repo) = temp_repo();
    repo.add_all(vec![
        Topic::new("math", "A"),
        Topic::new("math", "B"),
        Topic::new("art", "C"),
    ]);
    let prioritizer = ReviewPrioritizer::new(repo);

    assert_eq!(prioritizer.suggest_topics_at(None, 2, NOW).len(), 2);
    let art = prioritizer.suggest_topics_at(Some("art"), 10, NOW);
    assert_eq!(art.len(), 1);
    assert_eq!(art[0].topic.name, "C");
    assert!(prioritizer.suggest_topics_at(None, 0, NOW).is_empty());
}

#[test]
fn test_mark_reviewed_updates_and_persists() {
    let (dir, repo) = temp_repo();
    let topic = Topic::new("math", "Integrals").with_review_count(2);
    repo.add(topic.clone());

    let prioritizer = ReviewPrioritizer::new(repo.clone());
    let updated = prioritizer.mark_reviewed_at(&topic.id, NOW).unwrap();
    assert_eq!(updated.review_count, 3);
    assert_eq!(updated.last_reviewed, Some(NOW));
    assert_eq!(repo.metrics().snapshot().reviews_marked, 1);

    let listed = prioritizer.suggest_topics_at(None, 10, NOW);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].topic.id, topic.id);
    assert_eq!(listed[0].days_since_review, Some(0));

    let reopened = smartstudy_lib::storage::Repository::open(dir.path()).unwrap();
    let stored = reopened.find::<Topic>(&topic.id).unwrap();
    assert_eq!(stored.review_count, 3);
}

#[test]
fn test_mark_reviewed_saturates_review_count() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("topics.json"),
        r#"[{"id":"t","subjectId":"s","name":"Limits","reviewCount":4294967295}]"#,
    )
    .unwrap();
    let repo = std::sync::Arc::new(smartstudy_lib::storage::Repository::open(dir.path()).unwrap());

    let updated = ReviewPrioritizer::new(repo.clone()).mark_reviewed_at("t", NOW).unwrap();
    assert_eq!(updated.review_count, u32::MAX);
    assert_eq!(updated.last_reviewed, Some(NOW));
    assert_eq!(repo.find::<Topic>("t").unwrap().review_count, u32::MAX);
}

#[test]
fn test_unknown_topic_is_a_no_op() {
    let (_dir, repo) = temp_repo();
    let prioritizer = ReviewPrioritizer::new(repo.clone());
    assert!(prioritizer.mark_reviewed_at("missing", NOW).is_none());
    assert!(prioritizer.skip_topic_at("missing", NOW).is_none());
    assert_eq!(repo.metrics().snapshot().reviews_marked, 0);
}

#[test]
fn test_skipped_topic_hidden_for_a_week() {
    let (_dir, repo) = temp_repo();
    let topic = Topic::new("math", "Vectors").with_review_count(4);
    repo.add(topic.clone());
    let prioritizer = ReviewPrioritizer::new(repo);

    let skipped = prioritizer.skip_topic_at(&topic.id, NOW).unwrap();
    assert_eq!(skipped.review_count, 4);
    assert_eq!(skipped.last_reviewed, Some(NOW + 7 * DAY_MS));

    assert!(prioritizer.suggest_topics_at(None, 10, NOW + 6 * DAY_MS).is_empty());
    let back = prioritizer.suggest_topics_at(None, 10, NOW + 7 * DAY_MS);
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].days_since_review, Some(0));
}

#[test]
fn test_manual_priority_overrides_score() {
    let (_dir, repo) = temp_repo();
    let pinned = Topic::new("math", "Pinned")
        .with_manual_priority(9.0)
        .with_last_reviewed(NOW)
        .with_review_count(10);
    let stale = Topic::new("math", "Stale").with_last_reviewed(NOW - 30 * DAY_MS);
    repo.add_all(vec![stale, pinned.clone()]);

    let ranked = ReviewPrioritizer::new(repo).suggest_topics_at(None, 10, NOW);
    assert_eq!(ranked[0].topic.id, pinned.id);
    assert_eq!(ranked[0].priority_score, 90.0);
}

#[test]
fn test_topics_by_difficulty() {
    let (_dir, repo) = temp_repo();
    repo.add_all(vec![
        Topic::new("math", "Easy").with_difficulty(2),
        Topic::new("math", "Hard").with_difficulty(8),
        Topic::new("art", "Also hard").with_difficulty(8),
    ]);
    let prioritizer = ReviewPrioritizer::new(repo);
    assert_eq!(prioritizer.topics_by_difficulty(None, 8).len(), 2);
    assert_eq!(prioritizer.topics_by_difficulty(Some("math"), 8).len(), 1);
}
