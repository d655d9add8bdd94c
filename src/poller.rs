//! Live score polling and monotonic reconciliation
//!
//! On a fixed interval the poller re-fetches scores for all configured
//! leagues, compares each tracked fixture's observed goal total against an
//! in-memory snapshot from the previous cycle, and emits one positive
//! per-team delta per observed increase. Totals never regress: a delta is
//! emitted only when the new total exceeds both the snapshot and what the
//! tracked match already records, so flaky feeds can neither double-credit
//! a goal nor lower a count.

use chrono::Local;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::LeagueEndpoint;
use crate::constants::polling::INTERVAL_SECONDS;
use crate::data_fetcher::{fetch_scores, probe_connectivity};
use crate::data_fetcher::models::RawFixture;
use crate::game_state::{DeltaSink, GoalDelta, MatchStore, TeamSide, TrackedMatch};

/// Supplies the league list for each cycle. Re-read every cycle so
/// preference changes take effect without restarting the poller.
pub trait LeagueSource: Send + Sync {
    fn leagues(&self) -> Vec<LeagueEndpoint>;
}

impl LeagueSource for Vec<LeagueEndpoint> {
    fn leagues(&self) -> Vec<LeagueEndpoint> {
        self.clone()
    }
}

impl LeagueSource for crate::config::Config {
    fn leagues(&self) -> Vec<LeagueEndpoint> {
        self.leagues.clone()
    }
}

/// Computes the deltas one cycle's observations justify and updates the
/// snapshot. Pure with respect to I/O; the poller task wraps it.
///
/// For every fixture whose provider id matches a tracked match:
/// - a missing snapshot entry is seeded from the tracked match's recorded
///   total, so the first cycle after start never re-credits old goals
/// - deltas fire only when the observed total exceeds both the snapshot
///   and the recorded total
/// - the snapshot is always overwritten with the latest observation, so an
///   intra-cycle regression is not re-emitted when the feed recovers
pub fn reconcile_cycle(
    fixtures: &[RawFixture],
    tracked: &[TrackedMatch],
    snapshot: &mut HashMap<String, i32>,
) -> Vec<GoalDelta> {
    let tracked_by_id: HashMap<&str, &TrackedMatch> =
        tracked.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut deltas = Vec::new();

    for fixture in fixtures {
        let Some(tracked_match) = tracked_by_id.get(fixture.provider_id.as_str()) else {
            continue;
        };
        let Some(total) = fixture.total_goals() else {
            debug!(
                "Fixture {} has an incomplete score pair, skipping",
                fixture.provider_id
            );
            continue;
        };

        let recorded_total = tracked_match.total_goals() as i32;
        let baseline = snapshot
            .get(&fixture.provider_id)
            .copied()
            .unwrap_or(recorded_total);

        if total > baseline && total > recorded_total {
            for (side, reported) in [
                (TeamSide::Home, fixture.home_score.unwrap_or(0)),
                (TeamSide::Away, fixture.away_score.unwrap_or(0)),
            ] {
                let recorded = tracked_match.goals_for(side) as i32;
                if reported > recorded {
                    deltas.push(GoalDelta {
                        match_id: fixture.provider_id.clone(),
                        side,
                        amount: (reported - recorded) as u32,
                    });
                }
            }
        } else if total < baseline {
            // Noisy upstream data, not a real regression; dropped silently
            debug!(
                "Fixture {} total regressed {} -> {}, ignoring",
                fixture.provider_id, baseline, total
            );
        }

        snapshot.insert(fixture.provider_id.clone(), total);
    }

    deltas
}

/// Handle for a running polling session. Stopping is idempotent; dropping
/// the handle also stops the session. The shared liveness token is checked
/// before results are applied, so a fetch already in flight when the
/// session stops has its results discarded.
pub struct PollHandle {
    live: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            info!("Live score polling stopped");
        }
        self.task.abort();
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct LiveScorePoller<S: MatchStore + 'static> {
    client: Client,
    api_domain: String,
    leagues: Arc<dyn LeagueSource>,
    store: Arc<S>,
    sink: Arc<dyn DeltaSink>,
    interval: Duration,
    // Weak so a dropped handle does not pin the token; the upgrade plus
    // liveness check below decides whether a session is still running
    active: Mutex<Weak<AtomicBool>>,
}

impl<S: MatchStore + 'static> LiveScorePoller<S> {
    pub fn new(
        client: Client,
        api_domain: impl Into<String>,
        leagues: Arc<dyn LeagueSource>,
        store: Arc<S>,
        sink: Arc<dyn DeltaSink>,
    ) -> Self {
        Self {
            client,
            api_domain: api_domain.into(),
            leagues,
            store,
            sink,
            interval: Duration::from_secs(INTERVAL_SECONDS),
            active: Mutex::new(Weak::new()),
        }
    }

    /// Overrides the cycle interval. For tests.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Starts a polling session: one immediate cycle, then repeating
    /// cycles at the configured interval until the handle is stopped.
    ///
    /// At most one session per poller: while a previous session is still
    /// live this is a no-op and returns `None`, so the same observed goals
    /// can never be credited through two concurrent snapshots.
    pub fn start(&self) -> Option<PollHandle> {
        let Ok(mut active) = self.active.try_lock() else {
            // A concurrent start() already holds the slot
            return None;
        };
        if let Some(token) = active.upgrade() {
            if token.load(Ordering::SeqCst) {
                debug!("Polling session already live, ignoring start()");
                return None;
            }
        }

        let live = Arc::new(AtomicBool::new(true));
        let client = self.client.clone();
        let api_domain = self.api_domain.clone();
        let leagues = Arc::clone(&self.leagues);
        let store = Arc::clone(&self.store);
        let sink = Arc::clone(&self.sink);
        let token = Arc::clone(&live);
        let interval = self.interval;

        info!("Live score polling started (every {:?})", interval);
        let task = tokio::spawn(async move {
            // Snapshot lives and dies with this session
            let mut snapshot: HashMap<String, i32> = HashMap::new();
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if !token.load(Ordering::SeqCst) {
                    break;
                }
                run_cycle(
                    &client,
                    &api_domain,
                    leagues.as_ref(),
                    store.as_ref(),
                    sink.as_ref(),
                    &mut snapshot,
                    &token,
                )
                .await;
            }
        });

        *active = Arc::downgrade(&live);
        Some(PollHandle { live, task })
    }
}

/// One fetch cycle. Every failure mode is absorbed here: a failed probe or
/// fetch means "no update this cycle", never a dead interval.
async fn run_cycle<S: MatchStore>(
    client: &Client,
    api_domain: &str,
    leagues: &dyn LeagueSource,
    store: &S,
    sink: &dyn DeltaSink,
    snapshot: &mut HashMap<String, i32>,
    token: &AtomicBool,
) {
    if !probe_connectivity(client, api_domain).await {
        debug!("Connectivity probe failed, skipping cycle");
        return;
    }

    let leagues = leagues.leagues();
    if leagues.is_empty() {
        debug!("No leagues configured, skipping cycle");
        return;
    }

    let date = Local::now().format("%Y-%m-%d").to_string();
    let fixtures = match fetch_scores(client, api_domain, &leagues, &date).await {
        Ok(fixtures) => fixtures,
        Err(e) => {
            warn!("Score fetch failed, no update this cycle: {e}");
            return;
        }
    };

    // The session may have been stopped while the fetch was in flight
    if !token.load(Ordering::SeqCst) {
        debug!("Polling stopped mid-fetch, discarding results");
        return;
    }

    let tracked = store.tracked_matches();
    let deltas = reconcile_cycle(&fixtures, &tracked, snapshot);
    if !deltas.is_empty() {
        info!("Cycle produced {} goal deltas", deltas.len());
    }
    for delta in &deltas {
        sink.apply(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(id: &str, home_goals: u32, away_goals: u32) -> TrackedMatch {
        TrackedMatch {
            id: id.to_string(),
            home: "Bayern München".to_string(),
            away: "Borussia Dortmund".to_string(),
            home_goals,
            away_goals,
            start_time: None,
        }
    }

    fn observed(id: &str, home: i32, away: i32) -> RawFixture {
        RawFixture {
            provider_id: id.to_string(),
            home: "Bayern".to_string(),
            away: "BVB".to_string(),
            date: None,
            time: None,
            home_score: Some(home),
            away_score: Some(away),
            league_code: "bl1".to_string(),
        }
    }

    #[test]
    fn test_home_increase_emits_exactly_one_home_delta() {
        let mut snapshot = HashMap::from([("m-1".to_string(), 1)]);
        let tracked = vec![tracked("m-1", 1, 0)];

        let deltas = reconcile_cycle(&[observed("m-1", 2, 0)], &tracked, &mut snapshot);

        assert_eq!(
            deltas,
            vec![GoalDelta {
                match_id: "m-1".to_string(),
                side: TeamSide::Home,
                amount: 1,
            }]
        );
        assert_eq!(snapshot["m-1"], 2);
    }

    #[test]
    fn test_identical_cycles_emit_once() {
        let mut snapshot = HashMap::new();
        let tracked = vec![tracked("m-1", 0, 0)];

        let first = reconcile_cycle(&[observed("m-1", 1, 0)], &tracked, &mut snapshot);
        assert_eq!(first.len(), 1);

        // Tracked state not yet updated (store applies asynchronously), but
        // the snapshot alone must prevent re-emission
        let second = reconcile_cycle(&[observed("m-1", 1, 0)], &tracked, &mut snapshot);
        assert!(second.is_empty());
    }

    #[test]
    fn test_first_observation_seeds_from_recorded_total() {
        // Match added mid-game at 2:0; first cycle reports the same score
        let mut snapshot = HashMap::new();
        let tracked = vec![tracked("m-1", 2, 0)];

        let deltas = reconcile_cycle(&[observed("m-1", 2, 0)], &tracked, &mut snapshot);
        assert!(deltas.is_empty(), "pre-tracking goals must not be credited");
        assert_eq!(snapshot["m-1"], 2);
    }

    #[test]
    fn test_regression_dropped_and_not_reemitted() {
        let mut snapshot = HashMap::from([("m-1".to_string(), 2)]);
        let tracked = vec![tracked("m-1", 2, 0)];

        // Flaky feed reports 1:0 for a cycle
        let deltas = reconcile_cycle(&[observed("m-1", 1, 0)], &tracked, &mut snapshot);
        assert!(deltas.is_empty());
        assert_eq!(snapshot["m-1"], 1, "snapshot always takes the latest observation");

        // Feed recovers to the recorded score: still nothing to emit,
        // because the total does not exceed the recorded total
        let deltas = reconcile_cycle(&[observed("m-1", 2, 0)], &tracked, &mut snapshot);
        assert!(deltas.is_empty());
        assert_eq!(snapshot["m-1"], 2);
    }

    #[test]
    fn test_both_sides_can_increase_in_one_cycle() {
        let mut snapshot = HashMap::from([("m-1".to_string(), 0)]);
        let tracked = vec![tracked("m-1", 0, 0)];

        let deltas = reconcile_cycle(&[observed("m-1", 2, 1)], &tracked, &mut snapshot);
        assert_eq!(deltas.len(), 2);
        assert!(deltas.contains(&GoalDelta {
            match_id: "m-1".to_string(),
            side: TeamSide::Home,
            amount: 2,
        }));
        assert!(deltas.contains(&GoalDelta {
            match_id: "m-1".to_string(),
            side: TeamSide::Away,
            amount: 1,
        }));
    }

    #[test]
    fn test_untracked_and_incomplete_fixtures_ignored() {
        let mut snapshot = HashMap::new();
        let tracked = vec![tracked("m-1", 0, 0)];

        let mut incomplete = observed("m-1", 3, 0);
        incomplete.away_score = None;

        let deltas = reconcile_cycle(
            &[incomplete, observed("m-99", 5, 5)],
            &tracked,
            &mut snapshot,
        );
        assert!(deltas.is_empty());
        assert!(!snapshot.contains_key("m-1"));
        assert!(!snapshot.contains_key("m-99"));
    }

    #[test]
    fn test_sink_sees_one_home_callback_and_no_away_callback() {
        use crate::testing_utils::RecordingSink;

        let mut snapshot = HashMap::from([("m-1".to_string(), 1)]);
        let tracked = vec![tracked("m-1", 1, 0)];
        let sink = RecordingSink::default();

        for delta in reconcile_cycle(&[observed("m-1", 2, 0)], &tracked, &mut snapshot) {
            sink.apply(&delta);
        }

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].side, TeamSide::Home);
        assert_eq!(recorded[0].amount, 1);
    }

    #[tokio::test]
    async fn test_second_start_is_noop_while_session_live() {
        use crate::data_fetcher::http_client::create_test_http_client;
        use crate::testing_utils::{InMemoryStore, RecordingSink};

        let store = Arc::new(InMemoryStore::with_bulk_support());
        let sink = Arc::new(RecordingSink::default());
        // Unroutable endpoint: cycles fail the probe and apply nothing
        let poller = LiveScorePoller::new(
            create_test_http_client(),
            "http://127.0.0.1:9",
            Arc::new(vec![LeagueEndpoint::new("Bundesliga", "bl1")]),
            store,
            sink,
        )
        .with_interval(Duration::from_millis(50));

        let first = poller.start().expect("first start opens a session");
        assert!(
            poller.start().is_none(),
            "a live session must make start() a no-op"
        );
        assert!(first.is_live());

        first.stop();
        let second = poller.start().expect("stopping frees the session slot");
        second.stop();
    }

    #[test]
    fn test_config_supplies_its_league_list() {
        let config = crate::config::Config {
            leagues: vec![LeagueEndpoint::new("Bundesliga", "bl1")],
            ..Default::default()
        };
        let source: &dyn LeagueSource = &config;
        assert_eq!(
            source.leagues(),
            vec![LeagueEndpoint::new("Bundesliga", "bl1")]
        );
    }

    #[test]
    fn test_monotonic_totals_across_random_observations() {
        // Applying every emitted delta must keep recorded totals
        // non-decreasing no matter how the feed jitters
        let mut snapshot = HashMap::new();
        let mut state = tracked("m-1", 0, 0);
        let observations = [
            (0, 0),
            (1, 0),
            (1, 0),
            (0, 0), // regression
            (1, 1),
            (1, 0), // regression
            (2, 1),
        ];

        let mut last_total = state.total_goals();
        for (home, away) in observations {
            let deltas = reconcile_cycle(
                &[observed("m-1", home, away)],
                std::slice::from_ref(&state),
                &mut snapshot,
            );
            for delta in deltas {
                match delta.side {
                    TeamSide::Home => state.home_goals += delta.amount,
                    TeamSide::Away => state.away_goals += delta.amount,
                }
            }
            assert!(state.total_goals() >= last_total);
            last_total = state.total_goals();
        }
        assert_eq!((state.home_goals, state.away_goals), (2, 1));
    }
}
