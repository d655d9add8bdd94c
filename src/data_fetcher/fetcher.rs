//! Per-league fixture fetching and simplification.

use futures::future::join_all;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::asset_cache::cache_crest_uri;
use crate::config::LeagueEndpoint;
use crate::constants::polling::PROBE_TIMEOUT_SECONDS;
use crate::data_fetcher::fetch_utils::fetch;
use crate::data_fetcher::models::{FixturesResponse, LeagueTeam, ProviderTeam, RawFixture};
use crate::error::AppError;

/// Everything one fetch cycle produced: fixtures grouped by the league feed
/// they arrived on, plus the deduplicated team roster used to build league
/// membership. Crest URIs were already cached as a side effect.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub fixtures_by_league: HashMap<String, Vec<RawFixture>>,
    pub teams: Vec<LeagueTeam>,
}

impl FetchOutcome {
    /// All fixtures of the cycle in one list, league grouping flattened.
    pub fn all_fixtures(&self) -> Vec<RawFixture> {
        self.fixtures_by_league
            .values()
            .flat_map(|fixtures| fixtures.iter().cloned())
            .collect()
    }
}

fn fixtures_url(api_domain: &str, provider_code: &str, date: &str) -> String {
    format!("{api_domain}/v1/fixtures?league={provider_code}&date={date}")
}

/// Fetches fixtures for every configured league in parallel.
///
/// Individual league failures are logged and skipped so one flaky feed does
/// not abort the cycle. Only when every league fails does the caller get an
/// error, so "no fixtures today" and "feed down" stay distinguishable.
#[instrument(skip(client, leagues))]
pub async fn fetch_fixtures(
    client: &Client,
    api_domain: &str,
    leagues: &[LeagueEndpoint],
    date: &str,
) -> Result<FetchOutcome, AppError> {
    if leagues.is_empty() {
        debug!("No leagues configured, nothing to fetch");
        return Ok(FetchOutcome::default());
    }

    let fetch_futures = leagues.iter().map(|league| {
        let url = fixtures_url(api_domain, &league.provider_code, date);
        async move {
            let result = fetch::<FixturesResponse>(client, &url).await;
            (league, result)
        }
    });

    // All requests go out together to make use of the connection pool
    let results = join_all(fetch_futures).await;

    let mut outcome = FetchOutcome::default();
    let mut seen_teams: HashSet<LeagueTeam> = HashSet::new();
    let mut successful_fetches = 0usize;
    let mut failed_fetches = 0usize;

    for (league, result) in results {
        match result {
            Ok(response) => {
                successful_fetches += 1;
                let mut fixtures = Vec::with_capacity(response.matches.len());
                for provider_match in &response.matches {
                    cache_team_crest(&provider_match.home_team).await;
                    cache_team_crest(&provider_match.away_team).await;

                    let Some(fixture) = provider_match.simplify(&league.provider_code) else {
                        debug!(
                            "Skipping unusable match record in league {}",
                            league.provider_code
                        );
                        continue;
                    };
                    for name in [&fixture.home, &fixture.away] {
                        let entry = LeagueTeam {
                            name: name.clone(),
                            league_code: league.provider_code.clone(),
                        };
                        if seen_teams.insert(entry.clone()) {
                            outcome.teams.push(entry);
                        }
                    }
                    fixtures.push(fixture);
                }
                outcome
                    .fixtures_by_league
                    .insert(league.provider_code.clone(), fixtures);
            }
            Err(e) => {
                failed_fetches += 1;
                warn!(
                    "Failed to fetch fixtures for league {} ({}): {}",
                    league.name, league.provider_code, e
                );
            }
        }
    }

    info!(
        "Fixture fetch completed for {}: {} leagues ok, {} failed, {} teams seen",
        date,
        successful_fetches,
        failed_fetches,
        outcome.teams.len()
    );

    if successful_fetches == 0 {
        return Err(AppError::all_leagues_failed(leagues.len(), date));
    }

    Ok(outcome)
}

/// Fetches current scores for all configured leagues and returns the
/// flattened fixture list. Used by the live score poller, which only needs
/// provider ids and score pairs.
pub async fn fetch_scores(
    client: &Client,
    api_domain: &str,
    leagues: &[LeagueEndpoint],
    date: &str,
) -> Result<Vec<RawFixture>, AppError> {
    let outcome = fetch_fixtures(client, api_domain, leagues, date).await?;
    Ok(outcome.all_fixtures())
}

/// Lightweight connectivity probe against the provider domain. Returns
/// false on any error; callers treat that as "skip this cycle".
pub async fn probe_connectivity(client: &Client, api_domain: &str) -> bool {
    match client
        .head(api_domain)
        .timeout(Duration::from_secs(PROBE_TIMEOUT_SECONDS))
        .send()
        .await
    {
        Ok(response) => {
            debug!("Connectivity probe status: {}", response.status());
            true
        }
        Err(e) => {
            debug!("Connectivity probe failed: {e}");
            false
        }
    }
}

async fn cache_team_crest(team: &ProviderTeam) {
    let label = team.display_label();
    if label.is_empty() {
        return;
    }
    if let Some(uri) = &team.crest_url {
        cache_crest_uri(label.to_string(), uri.clone()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_url_shape() {
        assert_eq!(
            fixtures_url("https://api.example.com", "bl1", "2026-08-29"),
            "https://api.example.com/v1/fixtures?league=bl1&date=2026-08-29"
        );
    }

    #[tokio::test]
    async fn test_empty_league_list_is_not_an_error() {
        let client = crate::data_fetcher::http_client::create_test_http_client();
        let outcome = fetch_fixtures(&client, "https://api.example.com", &[], "2026-08-29")
            .await
            .unwrap();
        assert!(outcome.fixtures_by_league.is_empty());
        assert!(outcome.teams.is_empty());
    }
}
