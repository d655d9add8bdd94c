//! matchsync - external sports-data reconciliation engine
//!
//! Takes messy, heterogeneous team names and live match feeds from an
//! external provider and reconciles them against locally tracked matches:
//! canonical team identity resolution, fixture join/filtering, batch
//! insertion, and monotonic live score polling.
//!
//! # Examples
//!
//! ```rust,no_run
//! use matchsync::config::Config;
//! use matchsync::data_fetcher::{fetch_fixtures, http_client::create_http_client_with_timeout};
//! use matchsync::error::AppError;
//! use matchsync::filter::{FixtureWindow, TeamMembership, filter_fixtures};
//! use matchsync::team_registry::TeamRegistry;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
//!     let registry = TeamRegistry::bundled();
//!
//!     let outcome =
//!         fetch_fixtures(&client, &config.api_domain, &config.leagues, "2026-08-29").await?;
//!     let membership = TeamMembership::from_roster(&outcome.teams, &registry);
//!     let kept = filter_fixtures(
//!         &outcome.all_fixtures(),
//!         &config.leagues,
//!         &FixtureWindow::default(),
//!         &membership,
//!         &registry,
//!     );
//!
//!     for fixture in kept {
//!         println!("{} vs {}", fixture.home, fixture.away);
//!     }
//!     Ok(())
//! }
//! ```

pub mod asset_cache;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod filter;
pub mod game_state;
pub mod insertion;
pub mod poller;
pub mod team_registry;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use config::{Config, LeagueEndpoint};
pub use data_fetcher::{FetchOutcome, LeagueTeam, RawFixture, fetch_fixtures};
pub use error::AppError;
pub use filter::{FixtureWindow, TeamMembership, filter_fixtures, time_to_minutes};
pub use game_state::{DeltaSink, GoalDelta, MatchStore, StoreDeltaSink, TeamSide, TrackedMatch};
pub use insertion::{InsertionController, InsertionReport};
pub use poller::{LiveScorePoller, PollHandle, reconcile_cycle};
pub use team_registry::{TeamRegistry, normalize};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
