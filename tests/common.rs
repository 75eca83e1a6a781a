#![allow(dead_code)]

use std::sync::Arc;
use smartstudy_lib::storage::Repository;
use tempfile::TempDir;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
/// 2023-11-14T22:13:20Z
pub const NOW: i64 = 1_700_000_000_000;

/// Fresh repository in a temporary directory. Keep the TempDir alive for the
/// duration of the test.
pub fn temp_repo() -> (TempDir, Arc<Repository>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let repo = Repository::open(dir.path()).expect("open repository");
    (dir, Arc::new(repo))
}
