// src/pipeline/poller.rs

//! Periodic standings polling.
//!
//! One poller drives fetch → parse → reconcile cycles for a single contest.
//! Exactly one cycle is in flight at any time: scheduled ticks and manual
//! triggers share an idle-only gate, and a trigger arriving while a cycle
//! runs is dropped rather than queued. The poller owns the active contest
//! target (url + derived id); nothing else holds contest scope.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::Config;
use crate::pipeline::{ReconcileOutcome, Reconciler};
use crate::services::{StandingsParser, StandingsSource};
use crate::utils::contest_id_for_url;

/// Contest the poller is currently tracking.
#[derive(Debug, Clone)]
pub struct ContestTarget {
    /// Standings page URL
    pub url: String,
    /// Ledger scope derived from the URL
    pub contest_id: String,
}

impl ContestTarget {
    /// Build a target for a standings URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let contest_id = contest_id_for_url(&url);
        Self { url, contest_id }
    }
}

/// Summary of one fetch → parse → reconcile cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// Contest the cycle ran against
    pub contest_id: String,
    /// Candidates the parser extracted
    pub candidate_count: usize,
    /// Reconciliation counts
    pub reconcile: ReconcileOutcome,
    /// Whether the fetch failed (cycle skipped, retried next tick)
    pub fetch_failed: bool,
}

/// Handle to the scheduled tick loop.
struct LoopHandle {
    shutdown: watch::Sender<bool>,
    _task: JoinHandle<()>,
}

/// Periodic scheduler for ingestion cycles.
pub struct Poller {
    inner: Arc<PollerInner>,
    loop_handle: Mutex<Option<LoopHandle>>,
    interval: Mutex<Option<Duration>>,
}

/// Cycle state shared with the tick loop task.
struct PollerInner {
    source: Arc<dyn StandingsSource>,
    parser: StandingsParser,
    reconciler: Reconciler,
    ledger: Arc<dyn Ledger>,
    target: RwLock<ContestTarget>,
    cycle_gate: Mutex<()>,
}

impl Poller {
    /// Create a poller targeting the configured contest URL.
    pub fn new(
        config: &Config,
        source: Arc<dyn StandingsSource>,
        ledger: Arc<dyn Ledger>,
    ) -> Result<Self> {
        let inner = PollerInner {
            source,
            parser: StandingsParser::new(&config.standings)?,
            reconciler: Reconciler::new(Arc::clone(&ledger)),
            ledger,
            target: RwLock::new(ContestTarget::new(&config.poller.contest_url)),
            cycle_gate: Mutex::new(()),
        };

        Ok(Self {
            inner: Arc::new(inner),
            loop_handle: Mutex::new(None),
            interval: Mutex::new(None),
        })
    }

    /// The contest currently being tracked.
    pub async fn target(&self) -> ContestTarget {
        self.inner.target.read().await.clone()
    }

    /// Begin periodic scheduling: one cycle immediately, then one per interval.
    ///
    /// Restarts the schedule if one is already running.
    pub async fn start(&self, interval: Duration) {
        self.stop().await;
        *self.interval.lock().await = Some(interval);

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Shutdown wins over a tick that became due at the same time.
                    biased;
                    _ = shutdown_rx.changed() => break,
                    // First tick fires immediately.
                    _ = ticker.tick() => {
                        inner.run_cycle_if_idle().await;
                    }
                }
            }
        });

        *self.loop_handle.lock().await = Some(LoopHandle {
            shutdown,
            _task: task,
        });
    }

    /// Cancel future scheduled ticks.
    ///
    /// A cycle already in flight finishes on its own; only the schedule stops.
    pub async fn stop(&self) {
        if let Some(handle) = self.loop_handle.lock().await.take() {
            let _ = handle.shutdown.send(true);
        }
    }

    /// Request an immediate cycle.
    ///
    /// Subject to the same idle-only gate as scheduled ticks: returns `None`
    /// without running anything when a cycle is already in flight.
    pub async fn trigger_now(&self) -> Option<CycleOutcome> {
        self.inner.run_cycle_if_idle().await
    }

    /// Switch the poller to a different contest URL.
    ///
    /// Waits for any in-flight cycle, clears ledger records already stored
    /// under the new contest id (stale data from a prior run against the
    /// same URL), swaps the target, and restarts the schedule if it was
    /// running. Other contests' records are never touched.
    pub async fn switch_contest(&self, contest_url: &str) -> Result<usize> {
        let new_target = ContestTarget::new(contest_url);

        let removed = {
            // Hold the cycle gate so no cycle sees a half-switched target.
            let _guard = self.inner.cycle_gate.lock().await;
            let removed = self
                .inner
                .ledger
                .delete_all_for_contest(&new_target.contest_id)
                .await?;
            *self.inner.target.write().await = new_target.clone();
            removed
        };

        log::info!(
            "Switched to contest {} ({}), {} stale records cleared",
            new_target.contest_id,
            new_target.url,
            removed
        );

        let was_running = self.loop_handle.lock().await.is_some();
        if was_running {
            let interval = *self.interval.lock().await;
            if let Some(interval) = interval {
                self.start(interval).await;
            }
        }

        Ok(removed)
    }
}

impl PollerInner {
    /// Run one cycle unless another is already in flight.
    async fn run_cycle_if_idle(&self) -> Option<CycleOutcome> {
        let Ok(_guard) = self.cycle_gate.try_lock() else {
            log::debug!("Cycle already in flight, dropping trigger");
            return None;
        };
        Some(self.run_cycle().await)
    }

    /// One fetch → parse → reconcile pass against the current target.
    async fn run_cycle(&self) -> CycleOutcome {
        let target = self.target.read().await.clone();
        let mut outcome = CycleOutcome {
            contest_id: target.contest_id.clone(),
            ..CycleOutcome::default()
        };

        let markup = match self.source.fetch(&target.url).await {
            Ok(markup) => markup,
            Err(error) => {
                log::warn!("Standings fetch failed for {}: {}", target.url, error);
                outcome.fetch_failed = true;
                return outcome;
            }
        };

        let candidates = self.parser.parse(&markup);
        outcome.candidate_count = candidates.len();
        outcome.reconcile = self
            .reconciler
            .reconcile(&candidates, &target.contest_id)
            .await;

        log::info!(
            "Cycle for contest {}: {} candidates, {} new, {} existing, {} failed",
            target.contest_id,
            outcome.candidate_count,
            outcome.reconcile.new_count,
            outcome.reconcile.existing_count,
            outcome.reconcile.failed_count
        );
        outcome
    }
}
