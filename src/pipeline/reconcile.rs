// src/pipeline/reconcile.rs

//! Reconciliation of parsed candidates into the ledger.
//!
//! First detected acceptance wins: once a (contest, team, problem) triple is
//! in the ledger, later sightings of the same triple are no-ops and never
//! overwrite its `time`. That makes a reconcile pass safe to re-run against
//! the same or overlapping candidate sets.

use std::sync::Arc;

use crate::ledger::Ledger;
use crate::models::{SubmissionCandidate, SubmissionRecord};

/// Summary of a reconcile pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Records inserted this pass
    pub new_count: usize,
    /// Candidates whose triple was already in the ledger
    pub existing_count: usize,
    /// Candidates skipped because of a ledger failure
    pub failed_count: usize,
}

impl ReconcileOutcome {
    /// Total candidates processed.
    pub fn total(&self) -> usize {
        self.new_count + self.existing_count + self.failed_count
    }
}

/// Merges submission candidates into the ledger for one contest.
pub struct Reconciler {
    ledger: Arc<dyn Ledger>,
}

impl Reconciler {
    /// Create a reconciler over the given ledger.
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    /// Reconcile candidates into the ledger under `contest_id`, in input order.
    ///
    /// Ingestion is best-effort per record: a ledger failure on one candidate
    /// is logged and counted, never aborting the rest of the batch. An insert
    /// that loses a race to an identical concurrent insert counts as existing.
    pub async fn reconcile(
        &self,
        candidates: &[SubmissionCandidate],
        contest_id: &str,
    ) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for candidate in candidates {
            match self
                .ledger
                .find_by_key(contest_id, &candidate.team_name, &candidate.problem_code)
                .await
            {
                Ok(Some(_)) => outcome.existing_count += 1,
                Ok(None) => {
                    let record = SubmissionRecord::new(
                        contest_id,
                        candidate.team_name.clone(),
                        candidate.problem_code.clone(),
                        candidate.time.clone(),
                    );
                    match self.ledger.insert_if_absent(record).await {
                        Ok(true) => outcome.new_count += 1,
                        Ok(false) => outcome.existing_count += 1,
                        Err(error) => {
                            outcome.failed_count += 1;
                            log::warn!(
                                "Failed to insert {}/{} for contest {}: {}",
                                candidate.team_name,
                                candidate.problem_code,
                                contest_id,
                                error
                            );
                        }
                    }
                }
                Err(error) => {
                    outcome.failed_count += 1;
                    log::warn!(
                        "Ledger lookup failed for {}/{} in contest {}: {}",
                        candidate.team_name,
                        candidate.problem_code,
                        contest_id,
                        error
                    );
                }
            }
        }

        outcome
    }
}
