//! Integration tests for the log store.
//!
//! Covers per-pair partitioning, most-recent-first retrieval bounded by the
//! rule's sample window, and collection drops.

mod common;

use sqlx::PgPool;

use common::{consumer, log_at, provider, repos, rule_for};
use qosmon_core::identity::SystemIdentity;
use qosmon_db::LogRepo;

// ---------------------------------------------------------------------------
// Last-N retrieval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_n_with_fewer_logs_returns_all_newest_first(pool: PgPool) {
    let (_, logs) = repos(pool);
    let rule = rule_for(provider(), consumer(), 5);

    // Inserted out of order; retrieval must sort by timestamp.
    for (second, rt) in [(2, 20.0), (1, 10.0), (3, 30.0)] {
        logs.insert_log(&log_at(second, rt), &provider(), &consumer())
            .await
            .unwrap();
    }

    let recent = logs.get_last_n_logs(&rule).await.unwrap();

    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0], log_at(3, 30.0));
    assert_eq!(recent[1], log_at(2, 20.0));
    assert_eq!(recent[2], log_at(1, 10.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_n_is_bounded_by_sample_window(pool: PgPool) {
    let (_, logs) = repos(pool);
    let rule = rule_for(provider(), consumer(), 2);

    for second in 1..=6 {
        logs.insert_log(&log_at(second, f64::from(second)), &provider(), &consumer())
            .await
            .unwrap();
    }

    let recent = logs.get_last_n_logs(&rule).await.unwrap();

    let stamps: Vec<u32> = recent
        .iter()
        .map(|l| chrono::Timelike::second(&l.timestamp))
        .collect();
    assert_eq!(stamps, vec![6, 5]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn last_n_on_empty_pair_returns_nothing(pool: PgPool) {
    let (_, logs) = repos(pool);
    let rule = rule_for(provider(), consumer(), 5);

    assert!(logs.get_last_n_logs(&rule).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn logs_are_partitioned_per_ordered_pair(pool: PgPool) {
    let (_, logs) = repos(pool);
    let other = SystemIdentity::new("node-2", "ftt");

    logs.insert_log(&log_at(1, 10.0), &provider(), &consumer())
        .await
        .unwrap();
    logs.insert_log(&log_at(2, 20.0), &provider(), &other)
        .await
        .unwrap();
    logs.insert_log(&log_at(3, 30.0), &consumer(), &provider())
        .await
        .unwrap();

    assert_eq!(logs.count_logs(&provider(), &consumer()).await.unwrap(), 1);
    assert_eq!(logs.count_logs(&provider(), &other).await.unwrap(), 1);
    assert_eq!(logs.count_logs(&consumer(), &provider()).await.unwrap(), 1);

    let mut names: Vec<String> = logs
        .list_collections()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["nodefttswitchftt", "switchfttnode-2ftt", "switchfttnodeftt"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn collection_is_created_once(pool: PgPool) {
    let (_, logs) = repos(pool);

    for second in 1..=3 {
        logs.insert_log(&log_at(second, 10.0), &provider(), &consumer())
            .await
            .unwrap();
    }

    let collections = logs.list_collections().await.unwrap();
    assert_eq!(collections.len(), 1);
    assert_eq!(
        collections[0].name,
        LogRepo::collection_name(&provider(), &consumer())
    );
}

// ---------------------------------------------------------------------------
// Collection drops
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_collection_drops_all_samples(pool: PgPool) {
    let (_, logs) = repos(pool);
    logs.insert_log(&log_at(1, 10.0), &provider(), &consumer())
        .await
        .unwrap();
    logs.insert_log(&log_at(2, 10.0), &provider(), &consumer())
        .await
        .unwrap();

    assert!(logs.delete_collection(&provider(), &consumer()).await.unwrap());
    assert_eq!(logs.count_logs(&provider(), &consumer()).await.unwrap(), 0);
    assert!(logs.list_collections().await.unwrap().is_empty());

    // Dropping again is a no-op.
    assert!(!logs.delete_collection(&provider(), &consumer()).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_after_drop_starts_a_fresh_collection(pool: PgPool) {
    let (_, logs) = repos(pool);
    let rule = rule_for(provider(), consumer(), 10);
    logs.insert_log(&log_at(1, 10.0), &provider(), &consumer())
        .await
        .unwrap();
    logs.delete_collection(&provider(), &consumer()).await.unwrap();

    logs.insert_log(&log_at(2, 20.0), &provider(), &consumer())
        .await
        .unwrap();

    assert_eq!(logs.get_last_n_logs(&rule).await.unwrap(), vec![log_at(2, 20.0)]);
}
