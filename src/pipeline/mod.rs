// src/pipeline/mod.rs

//! Ingestion pipeline: reconciliation and periodic polling.
//!
//! - `Reconciler`: merge parsed candidates into the ledger
//! - `Poller`: schedule fetch → parse → reconcile cycles

mod poller;
mod reconcile;

pub use poller::{ContestTarget, CycleOutcome, Poller};
pub use reconcile::{ReconcileOutcome, Reconciler};
