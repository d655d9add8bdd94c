use serde::{Deserialize, Serialize};

/// One team as the provider reports it. Every field is optional because
/// feeds differ in which of them they populate.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderTeam {
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    #[serde(rename = "crestUrl", default)]
    pub crest_url: Option<String>,
}

impl ProviderTeam {
    /// Ordered field-extraction chain for the display label: the first
    /// non-empty of `displayName`, `name`, `shortName`. Total; yields an
    /// empty string when the record carries no usable label.
    pub fn display_label(&self) -> &str {
        [
            self.display_name.as_deref(),
            self.name.as_deref(),
            self.short_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|label| !label.is_empty())
        .unwrap_or("")
    }
}

/// Score pair as reported; absent halves mean "not yet reported".
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderScore {
    #[serde(default)]
    pub home: Option<i32>,
    #[serde(default)]
    pub away: Option<i32>,
}

/// One fixture as received from the provider.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderMatch {
    #[serde(rename = "matchId", default)]
    pub match_id: Option<String>,
    #[serde(rename = "homeTeam", default)]
    pub home_team: ProviderTeam,
    #[serde(rename = "awayTeam", default)]
    pub away_team: ProviderTeam,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub score: Option<ProviderScore>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "leagueCode", default)]
    pub league_code: Option<String>,
}

/// Response envelope for one league+date fixtures request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FixturesResponse {
    #[serde(default)]
    pub matches: Vec<ProviderMatch>,
}

/// The simplified fixture record the reconciliation engine works with.
/// Ephemeral; lives only for the current fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFixture {
    pub provider_id: String,
    pub home: String,
    pub away: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub league_code: String,
}

impl RawFixture {
    /// Total of both reported scores, or `None` when either half is
    /// missing. The poller only reconciles totals it fully observed.
    pub fn total_goals(&self) -> Option<i32> {
        Some(self.home_score? + self.away_score?)
    }
}

/// A team name together with the league feed it was seen in. The fetcher
/// emits these deduplicated; the filter engine builds its membership index
/// from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeagueTeam {
    pub name: String,
    pub league_code: String,
}

impl ProviderMatch {
    /// Extracts the simplified record, or `None` when the match carries no
    /// provider id or no usable team labels. The fixture's own league tag
    /// is ignored in favor of the feed it arrived on.
    pub fn simplify(&self, league_code: &str) -> Option<RawFixture> {
        let provider_id = self.match_id.as_deref()?.trim();
        if provider_id.is_empty() {
            return None;
        }
        let home = self.home_team.display_label();
        let away = self.away_team.display_label();
        if home.is_empty() || away.is_empty() {
            return None;
        }
        let score = self.score.clone().unwrap_or_default();
        Some(RawFixture {
            provider_id: provider_id.to_string(),
            home: home.to_string(),
            away: away.to_string(),
            date: self.date.clone(),
            time: self.time.clone(),
            home_score: score.home,
            away_score: score.away,
            league_code: league_code.to_string(),
        })
    }
}
