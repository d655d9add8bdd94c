// src/main.rs
mod asset_cache;
mod cli;
mod config;
mod constants;
mod data_fetcher;
mod error;
mod filter;
mod game_state;
mod insertion;
mod logging;
mod poller;
mod team_registry;
mod testing_utils;

use chrono::Local;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use cli::Args;
use config::Config;
use data_fetcher::{fetch_fixtures, http_client::create_http_client_with_timeout};
use error::AppError;
use filter::{FixtureWindow, TeamMembership, filter_fixtures};
use game_state::{MatchStore, StoreDeltaSink};
use insertion::InsertionController;
use poller::LiveScorePoller;
use team_registry::TeamRegistry;
use testing_utils::InMemoryStore;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let (log_file_path, _guard) = logging::setup_logging(&args).await?;
    info!("Logging to {log_file_path}");

    let config = Config::load().await?;
    if config.leagues.is_empty() {
        return Err(AppError::config_error(
            "No leagues configured; add [[leagues]] entries to the config file",
        ));
    }

    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let registry = Arc::new(TeamRegistry::bundled());

    let date = args
        .date
        .clone()
        .unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string());

    let outcome = fetch_fixtures(&client, &config.api_domain, &config.leagues, &date).await?;
    let membership = TeamMembership::from_roster(&outcome.teams, &registry);

    let window = FixtureWindow {
        date_range: None,
        time_range: match (args.from_time.clone(), args.to_time.clone()) {
            (Some(from), Some(to)) => Some((from, to)),
            _ => None,
        },
    };

    let fixtures = outcome.all_fixtures();
    let kept = filter_fixtures(&fixtures, &config.leagues, &window, &membership, &registry);

    if kept.is_empty() {
        println!("No fixtures matched the configured leagues on {date}");
        return Ok(());
    }

    println!("Fixtures for {date}:");
    for fixture in &kept {
        let time = fixture.time.as_deref().unwrap_or("--:--");
        println!("  {time}  {} vs {}  [{}]", fixture.home, fixture.away, fixture.league_code);
    }

    if !args.poll {
        return Ok(());
    }

    // Track the filtered fixtures in an in-memory session and poll their
    // scores until interrupted
    let store = Arc::new(InMemoryStore::with_bulk_support());
    let controller = InsertionController::new(Arc::clone(&store), Arc::clone(&registry));
    let report = controller.add_fixtures(&kept).await?;
    info!(
        "Tracking {} matches ({} duplicates skipped, {} failed)",
        report.added, report.duplicates, report.failed
    );

    let sink = Arc::new(StoreDeltaSink::new(Arc::clone(&store)));
    let api_domain = config.api_domain.clone();
    let poller = LiveScorePoller::new(
        client,
        api_domain,
        Arc::new(config),
        Arc::clone(&store),
        sink,
    );

    // The poller is freshly built, so this is always the first session
    if let Some(handle) = poller.start() {
        println!("Polling live scores, press Ctrl-C to stop...");
        tokio::signal::ctrl_c().await?;
        handle.stop();
    }

    println!("Final scores:");
    for tracked in store.tracked_matches() {
        println!(
            "  {} {} - {} {}",
            tracked.home, tracked.home_goals, tracked.away_goals, tracked.away
        );
    }

    Ok(())
}
