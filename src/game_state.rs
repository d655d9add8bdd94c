//! The local game-state store as the engine sees it
//!
//! The store itself (persistence, screens, history) lives outside this
//! crate. The engine only reads the tracked-match list and proposes goal
//! deltas through the operations modeled here; it never mutates the store's
//! internal representation directly.

use tracing::trace;

/// Which side of a match a goal is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSide {
    Home,
    Away,
}

/// A fixture the user is tracking in their local session. Goal counts are
/// monotonically non-decreasing for the lifetime of a polling session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedMatch {
    /// Provider-specific fixture id; the join key for score polling.
    pub id: String,
    pub home: String,
    pub away: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub start_time: Option<String>,
}

impl TrackedMatch {
    pub fn total_goals(&self) -> u32 {
        self.home_goals + self.away_goals
    }

    /// Unordered team-pair equality: a home/away swap is the same match.
    pub fn involves_pair(&self, a: &str, b: &str) -> bool {
        (self.home == a && self.away == b) || (self.home == b && self.away == a)
    }

    pub fn goals_for(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Home => self.home_goals,
            TeamSide::Away => self.away_goals,
        }
    }
}

/// Operations the external game-state store exposes to the engine.
///
/// `replace_all` is the optional bulk-replace setter: a store that does not
/// support it returns false without touching anything, and the insertion
/// controller falls back to the guarded sequential path built on
/// `stage_teams` + `add_staged`. The staging fields are shared state inside
/// the host store, which is why the sequential path must not be reentrant.
pub trait MatchStore: Send + Sync {
    /// Current tracked-match list.
    fn tracked_matches(&self) -> Vec<TrackedMatch>;

    /// Stages home/away names for the next single-add operation.
    fn stage_teams(&self, home: &str, away: &str);

    /// Triggers the host's single-match-add using the staged names. The
    /// addition may land asynchronously; callers confirm it by observing
    /// the tracked-match list grow.
    fn add_staged(&self);

    /// Atomically replaces the tracked-match list. Returns false when the
    /// host exposes no bulk setter; the list is then unchanged.
    fn replace_all(&self, matches: Vec<TrackedMatch>) -> bool {
        let _ = matches;
        false
    }

    /// Credits one goal to one side of a tracked match.
    fn increment_goals(&self, match_id: &str, side: TeamSide);
}

/// A positive goal-count increase detected between two polling cycles,
/// attributed to one side of one tracked match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalDelta {
    pub match_id: String,
    pub side: TeamSide,
    /// How many goals the side gained since the last observation. Always
    /// at least 1.
    pub amount: u32,
}

/// Receives deltas emitted by the live score poller.
pub trait DeltaSink: Send + Sync {
    fn apply(&self, delta: &GoalDelta);
}

/// Applies deltas to a [`MatchStore`] through its per-team increment
/// operation, one increment per goal.
pub struct StoreDeltaSink<S: MatchStore> {
    store: std::sync::Arc<S>,
}

impl<S: MatchStore> StoreDeltaSink<S> {
    pub fn new(store: std::sync::Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: MatchStore> DeltaSink for StoreDeltaSink<S> {
    fn apply(&self, delta: &GoalDelta) {
        trace!(
            "Applying delta: match {} {:?} +{}",
            delta.match_id, delta.side, delta.amount
        );
        for _ in 0..delta.amount {
            self.store.increment_goals(&delta.match_id, delta.side);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(home: &str, away: &str) -> TrackedMatch {
        TrackedMatch {
            id: "m-1".to_string(),
            home: home.to_string(),
            away: away.to_string(),
            home_goals: 0,
            away_goals: 0,
            start_time: None,
        }
    }

    #[test]
    fn test_pair_equality_ignores_order() {
        let m = tracked("Bayern München", "Borussia Dortmund");
        assert!(m.involves_pair("Bayern München", "Borussia Dortmund"));
        assert!(m.involves_pair("Borussia Dortmund", "Bayern München"));
        assert!(!m.involves_pair("Bayern München", "RB Leipzig"));
    }

    #[test]
    fn test_store_sink_applies_per_goal() {
        use crate::testing_utils::InMemoryStore;
        use std::sync::Arc;

        let store = Arc::new(InMemoryStore::with_bulk_support());
        store.replace_all(vec![tracked("Bayern München", "Borussia Dortmund")]);

        let sink = StoreDeltaSink::new(Arc::clone(&store));
        sink.apply(&GoalDelta {
            match_id: "m-1".to_string(),
            side: TeamSide::Home,
            amount: 2,
        });

        let matches = store.tracked_matches();
        assert_eq!(matches[0].home_goals, 2);
        assert_eq!(matches[0].away_goals, 0);
    }
}
