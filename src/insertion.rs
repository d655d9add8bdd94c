//! Adding filtered fixtures to the tracked-match list
//!
//! Prefers the store's bulk-replace setter (one atomic append, no
//! partial-failure window). When only single-item mutation exists, falls
//! back to a guarded one-at-a-time loop: stage, add, then positively
//! confirm the list grew before advancing, with a hard per-step timeout so
//! a stuck add can never block the batch. The staging fields are shared
//! inside the host store, so concurrent invocations are refused outright.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::constants::insertion::{WAIT_MAX_MS, WAIT_STEP_MS};
use crate::data_fetcher::models::RawFixture;
use crate::error::AppError;
use crate::game_state::{MatchStore, TrackedMatch};
use crate::team_registry::TeamRegistry;

/// Outcome of one `add_fixtures` batch.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InsertionReport {
    pub added: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Result of a bounded condition wait.
#[derive(Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Completed,
    TimedOut,
}

/// Polls `condition` at `step` intervals until it holds or `max_wait`
/// elapses. Bounded by construction; never blocks forever.
pub async fn wait_until(
    mut condition: impl FnMut() -> bool,
    step: Duration,
    max_wait: Duration,
) -> WaitOutcome {
    let deadline = tokio::time::Instant::now() + max_wait;
    loop {
        if condition() {
            return WaitOutcome::Completed;
        }
        if tokio::time::Instant::now() >= deadline {
            return WaitOutcome::TimedOut;
        }
        tokio::time::sleep(step).await;
    }
}

pub struct InsertionController<S: MatchStore> {
    store: Arc<S>,
    registry: Arc<TeamRegistry>,
    // Guards the store's shared staging fields; try_lock so a concurrent
    // batch is refused instead of queued behind an unknown wait
    guard: Mutex<()>,
    wait_step: Duration,
    wait_max: Duration,
}

impl<S: MatchStore> InsertionController<S> {
    pub fn new(store: Arc<S>, registry: Arc<TeamRegistry>) -> Self {
        Self {
            store,
            registry,
            guard: Mutex::new(()),
            wait_step: Duration::from_millis(WAIT_STEP_MS),
            wait_max: Duration::from_millis(WAIT_MAX_MS),
        }
    }

    /// Overrides the sequential-path wait bounds. For tests.
    pub fn with_wait_bounds(mut self, step: Duration, max: Duration) -> Self {
        self.wait_step = step;
        self.wait_max = max;
        self
    }

    /// Adds the candidate fixtures to the tracked-match list, deduplicating
    /// by unordered canonical team pair against existing entries and within
    /// the batch itself. Returns `AppError::InsertionBusy` when another
    /// batch is still in flight.
    #[instrument(skip(self, candidates), fields(candidate_count = candidates.len()))]
    pub async fn add_fixtures(
        &self,
        candidates: &[RawFixture],
    ) -> Result<InsertionReport, AppError> {
        let _guard = self.guard.try_lock().map_err(|_| AppError::InsertionBusy)?;

        let existing = self.store.tracked_matches();
        let mut report = InsertionReport::default();
        let mut unique: Vec<TrackedMatch> = Vec::new();

        for candidate in candidates {
            let home = self.canonical_or_raw(&candidate.home);
            let away = self.canonical_or_raw(&candidate.away);

            let duplicate = existing.iter().any(|m| m.involves_pair(&home, &away))
                || unique.iter().any(|m| m.involves_pair(&home, &away));
            if duplicate {
                debug!("Skipping duplicate candidate {home} vs {away}");
                report.duplicates += 1;
                continue;
            }

            unique.push(TrackedMatch {
                id: candidate.provider_id.clone(),
                home,
                away,
                // Start from the score the provider already reports so
                // goals scored before tracking began are not re-credited
                home_goals: candidate.home_score.unwrap_or(0).max(0) as u32,
                away_goals: candidate.away_score.unwrap_or(0).max(0) as u32,
                start_time: candidate.time.clone(),
            });
        }

        if unique.is_empty() {
            info!("No new matches to add ({} duplicates)", report.duplicates);
            return Ok(report);
        }

        // Fast path: one atomic append via the bulk setter
        let mut combined = existing.clone();
        combined.extend(unique.iter().cloned());
        if self.store.replace_all(combined) {
            info!(
                "Bulk-appended {} matches ({} duplicates skipped)",
                unique.len(),
                report.duplicates
            );
            report.added = unique.len();
            return Ok(report);
        }

        // Guarded sequential fallback, strictly in input order
        for tracked in unique {
            let before = self.store.tracked_matches().len();
            self.store.stage_teams(&tracked.home, &tracked.away);
            self.store.add_staged();

            let outcome = wait_until(
                || self.store.tracked_matches().len() > before,
                self.wait_step,
                self.wait_max,
            )
            .await;

            match outcome {
                WaitOutcome::Completed => report.added += 1,
                WaitOutcome::TimedOut => {
                    warn!(
                        "{}",
                        AppError::insertion_timeout(
                            &tracked.home,
                            &tracked.away,
                            self.wait_max.as_millis() as u64
                        )
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            "Sequential insertion done: {} added, {} duplicates, {} failed",
            report.added, report.duplicates, report.failed
        );
        Ok(report)
    }

    fn canonical_or_raw(&self, raw: &str) -> String {
        self.registry
            .resolve(raw)
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string())
    }
}
