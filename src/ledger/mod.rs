// src/ledger/mod.rs

//! Ledger of accepted-submission records.
//!
//! The ledger is the only state shared across reconciliation cycles. All
//! mutation goes through `insert_if_absent` / `update_status` /
//! `delete_all_for_contest`, each atomic on its own; the tracker never needs
//! multi-record transactions.
//!
//! `insert_if_absent` is the concurrency contract: the uniqueness of the
//! natural key (`contest_id`, `team_name`, `problem_code`) is enforced by
//! the implementation, not by callers catching duplicate-key errors.

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BalloonStatus, SubmissionRecord};

// Re-export for convenience
pub use local::LocalLedger;

/// Trait for submission record stores.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Look up a record by its natural key.
    async fn find_by_key(
        &self,
        contest_id: &str,
        team_name: &str,
        problem_code: &str,
    ) -> Result<Option<SubmissionRecord>>;

    /// Insert a record unless its natural key already exists.
    ///
    /// Returns `true` when the record was inserted, `false` when an entry
    /// under the same key was already present (the existing entry is left
    /// untouched either way).
    async fn insert_if_absent(&self, record: SubmissionRecord) -> Result<bool>;

    /// Overwrite the balloon status of a record scoped to `contest_id`.
    ///
    /// Idempotent; fails with `AppError::NotFound` when `record_id` does not
    /// resolve within the contest.
    async fn update_status(
        &self,
        record_id: &str,
        contest_id: &str,
        status: BalloonStatus,
    ) -> Result<SubmissionRecord>;

    /// Delete every record under `contest_id`, returning how many were removed.
    async fn delete_all_for_contest(&self, contest_id: &str) -> Result<usize>;

    /// List a contest's records, waiting balloons first, newest first within
    /// each status.
    async fn list_for_contest(&self, contest_id: &str) -> Result<Vec<SubmissionRecord>>;
}
