//! Shared test doubles for the engine's external collaborators
//!
//! Lives in the library (not `tests/`) so both unit modules and
//! integration tests can drive the insertion controller and the poller
//! against a deterministic store.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::game_state::{MatchStore, TeamSide, TrackedMatch};

/// In-memory [`MatchStore`] with switchable capabilities: bulk replace can
/// be enabled or disabled, and staged adds can be dropped on the floor to
/// exercise the insertion timeout path.
#[derive(Default)]
pub struct InMemoryStore {
    matches: Mutex<Vec<TrackedMatch>>,
    staged: Mutex<Option<(String, String)>>,
    supports_bulk: bool,
    drop_adds: AtomicBool,
    next_id: AtomicU32,
}

impl InMemoryStore {
    /// A store that only exposes the single-add path.
    pub fn sequential_only() -> Self {
        Self::default()
    }

    /// A store with the bulk-replace setter available.
    pub fn with_bulk_support() -> Self {
        Self {
            supports_bulk: true,
            ..Default::default()
        }
    }

    /// When set, `add_staged` silently does nothing, so a staged add never
    /// becomes visible and the controller's per-step timeout fires.
    pub fn set_drop_adds(&self, drop: bool) {
        self.drop_adds.store(drop, Ordering::SeqCst);
    }

    /// Currently staged team names, if any. For asserting staging order.
    pub fn staged_teams(&self) -> Option<(String, String)> {
        self.staged.lock().unwrap().clone()
    }
}

impl MatchStore for InMemoryStore {
    fn tracked_matches(&self) -> Vec<TrackedMatch> {
        self.matches.lock().unwrap().clone()
    }

    fn stage_teams(&self, home: &str, away: &str) {
        *self.staged.lock().unwrap() = Some((home.to_string(), away.to_string()));
    }

    fn add_staged(&self) {
        if self.drop_adds.load(Ordering::SeqCst) {
            return;
        }
        let staged = self.staged.lock().unwrap().take();
        if let Some((home, away)) = staged {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.matches.lock().unwrap().push(TrackedMatch {
                id: format!("local-{id}"),
                home,
                away,
                home_goals: 0,
                away_goals: 0,
                start_time: None,
            });
        }
    }

    fn replace_all(&self, matches: Vec<TrackedMatch>) -> bool {
        if !self.supports_bulk {
            return false;
        }
        *self.matches.lock().unwrap() = matches;
        true
    }

    fn increment_goals(&self, match_id: &str, side: TeamSide) {
        let mut matches = self.matches.lock().unwrap();
        if let Some(tracked) = matches.iter_mut().find(|m| m.id == match_id) {
            match side {
                TeamSide::Home => tracked.home_goals += 1,
                TeamSide::Away => tracked.away_goals += 1,
            }
        }
    }
}

/// Collects emitted deltas for assertions.
#[derive(Default)]
pub struct RecordingSink {
    deltas: Mutex<Vec<crate::game_state::GoalDelta>>,
}

impl RecordingSink {
    pub fn recorded(&self) -> Vec<crate::game_state::GoalDelta> {
        self.deltas.lock().unwrap().clone()
    }
}

impl crate::game_state::DeltaSink for RecordingSink {
    fn apply(&self, delta: &crate::game_state::GoalDelta) {
        self.deltas.lock().unwrap().push(delta.clone());
    }
}
