//! Fetching and simplifying fixture data from the external provider
//!
//! The provider is treated as untrusted and partially unreliable: every
//! field access tolerates absence, individual league failures are skipped,
//! and only a cycle where every league fails surfaces an error.

pub mod fetcher;
pub mod fetch_utils;
pub mod http_client;
pub mod models;

pub use fetcher::{FetchOutcome, fetch_fixtures, fetch_scores, probe_connectivity};
pub use models::{FixturesResponse, LeagueTeam, ProviderMatch, RawFixture};
