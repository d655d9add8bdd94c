//! End-to-end reconciliation: fetch -> filter -> insert -> poll against a
//! mock provider, asserting monotonic goal merging across the whole chain.

use std::sync::Arc;
use std::time::Duration;

use matchsync::config::LeagueEndpoint;
use matchsync::data_fetcher::http_client::create_http_client_with_timeout;
use matchsync::data_fetcher::{fetch_fixtures, fetch_scores};
use matchsync::filter::{FixtureWindow, TeamMembership, filter_fixtures};
use matchsync::game_state::{MatchStore, StoreDeltaSink};
use matchsync::insertion::InsertionController;
use matchsync::poller::{LiveScorePoller, reconcile_cycle};
use matchsync::team_registry::TeamRegistry;
use matchsync::testing_utils::InMemoryStore;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client() -> reqwest::Client {
    create_http_client_with_timeout(5).expect("failed to build test client")
}

fn match_body(id: &str, home: &str, away: &str, home_score: i32, away_score: i32) -> serde_json::Value {
    json!({
        "matchId": id,
        "homeTeam": { "name": home },
        "awayTeam": { "name": away },
        "date": chrono::Local::now().format("%Y-%m-%d").to_string(),
        "time": "15:30",
        "score": { "home": home_score, "away": away_score }
    })
}

async fn mount_head_probe(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_chain_applies_live_goal_increments() {
    let server = MockServer::start().await;
    mount_head_probe(&server).await;

    // The first fixtures request (used to build the tracked list) reports
    // 1:0; every later request reports 2:1
    Mock::given(method("GET"))
        .and(path("/v1/fixtures"))
        .and(query_param("league", "bl1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [match_body("m-1", "FC Bayern München", "Borussia Dortmund", 1, 0)]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/fixtures"))
        .and(query_param("league", "bl1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [match_body("m-1", "Bayern", "BVB", 2, 1)]
        })))
        .mount(&server)
        .await;

    let leagues = vec![LeagueEndpoint::new("Bundesliga", "bl1")];
    let client = test_client();
    let registry = Arc::new(TeamRegistry::bundled());
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();

    // Fetch and filter
    let outcome = fetch_fixtures(&client, &server.uri(), &leagues, &date)
        .await
        .unwrap();
    let membership = TeamMembership::from_roster(&outcome.teams, &registry);
    let kept = filter_fixtures(
        &outcome.all_fixtures(),
        &leagues,
        &FixtureWindow::default(),
        &membership,
        &registry,
    );
    assert_eq!(kept.len(), 1);

    // Insert: tracked match seeded at the already-reported 1:0
    let store = Arc::new(InMemoryStore::with_bulk_support());
    let controller = InsertionController::new(Arc::clone(&store), Arc::clone(&registry));
    let report = controller.add_fixtures(&kept).await.unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(store.tracked_matches()[0].home_goals, 1);

    // Poll: later responses report 2:1, so exactly one home and one away
    // goal get credited, regardless of how many cycles run
    let sink = Arc::new(StoreDeltaSink::new(Arc::clone(&store)));
    let poller = LiveScorePoller::new(
        client,
        server.uri(),
        Arc::new(leagues),
        Arc::clone(&store),
        sink,
    )
    .with_interval(Duration::from_millis(50));

    let handle = poller.start().expect("first start opens a session");
    tokio::time::sleep(Duration::from_millis(400)).await;
    handle.stop();
    // stop is idempotent
    handle.stop();
    assert!(!handle.is_live());

    let tracked = store.tracked_matches();
    assert_eq!(tracked[0].home_goals, 2);
    assert_eq!(tracked[0].away_goals, 1);
}

#[tokio::test]
async fn test_restarting_a_live_session_never_double_credits() {
    let server = MockServer::start().await;
    mount_head_probe(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/fixtures"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [match_body("m-1", "Bayern", "BVB", 2, 0)]
        })))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryStore::with_bulk_support());
    store.replace_all(vec![matchsync::game_state::TrackedMatch {
        id: "m-1".to_string(),
        home: "Bayern München".to_string(),
        away: "Borussia Dortmund".to_string(),
        home_goals: 0,
        away_goals: 0,
        start_time: None,
    }]);

    let sink = Arc::new(StoreDeltaSink::new(Arc::clone(&store)));
    let poller = LiveScorePoller::new(
        test_client(),
        server.uri(),
        Arc::new(vec![LeagueEndpoint::new("Bundesliga", "bl1")]),
        Arc::clone(&store),
        sink,
    )
    .with_interval(Duration::from_millis(50));

    // A second start while the session is live must not spawn a second
    // snapshot over the same feed
    let handle = poller.start().expect("first start opens a session");
    assert!(poller.start().is_none());

    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.stop();

    let tracked = store.tracked_matches();
    assert_eq!(
        (tracked[0].home_goals, tracked[0].away_goals),
        (2, 0),
        "the two observed goals must be credited exactly once"
    );
}

#[tokio::test]
async fn test_cycle_with_one_failing_league_of_six() {
    let server = MockServer::start().await;
    mount_head_probe(&server).await;

    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    let codes = ["l1", "l2", "l3", "l4", "l5", "l6"];
    for (i, code) in codes.iter().enumerate() {
        if *code == "l2" {
            Mock::given(method("GET"))
                .and(path("/v1/fixtures"))
                .and(query_param("league", *code))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;
            continue;
        }
        Mock::given(method("GET"))
            .and(path("/v1/fixtures"))
            .and(query_param("league", *code))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [match_body(&format!("m-{i}"), "Home", "Away", 1, 0)]
            })))
            .mount(&server)
            .await;
    }

    let leagues: Vec<LeagueEndpoint> = codes
        .iter()
        .map(|code| LeagueEndpoint::new(format!("League {code}"), *code))
        .collect();

    let fixtures = fetch_scores(&test_client(), &server.uri(), &leagues, &date)
        .await
        .unwrap();
    assert_eq!(fixtures.len(), 5, "five of six leagues delivered");

    // Deltas are computed from the leagues that did respond
    let tracked: Vec<_> = fixtures
        .iter()
        .map(|f| matchsync::game_state::TrackedMatch {
            id: f.provider_id.clone(),
            home: f.home.clone(),
            away: f.away.clone(),
            home_goals: 0,
            away_goals: 0,
            start_time: None,
        })
        .collect();
    let mut snapshot = std::collections::HashMap::new();
    for t in &tracked {
        snapshot.insert(t.id.clone(), 0);
    }
    let deltas = reconcile_cycle(&fixtures, &tracked, &mut snapshot);
    assert_eq!(deltas.len(), 5);
    assert!(deltas.iter().all(|d| d.amount == 1));
}

#[tokio::test]
async fn test_stopping_discards_results_and_interval() {
    let server = MockServer::start().await;
    mount_head_probe(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/fixtures"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [match_body("m-1", "Bayern", "BVB", 5, 0)]
        })))
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryStore::with_bulk_support());
    store.replace_all(vec![matchsync::game_state::TrackedMatch {
        id: "m-1".to_string(),
        home: "Bayern München".to_string(),
        away: "Borussia Dortmund".to_string(),
        home_goals: 0,
        away_goals: 0,
        start_time: None,
    }]);

    let sink = Arc::new(StoreDeltaSink::new(Arc::clone(&store)));
    let poller = LiveScorePoller::new(
        test_client(),
        server.uri(),
        Arc::new(vec![LeagueEndpoint::new("Bundesliga", "bl1")]),
        Arc::clone(&store),
        sink,
    )
    .with_interval(Duration::from_millis(50));

    // Stop before the first cycle can apply anything
    let handle = poller.start().expect("first start opens a session");
    handle.stop();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let tracked = store.tracked_matches();
    assert_eq!(
        (tracked[0].home_goals, tracked[0].away_goals),
        (0, 0),
        "a stopped session must not apply in-flight results"
    );
}
