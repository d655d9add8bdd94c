//! Joining fetched fixtures against user selections
//!
//! Filtering is conjunctive: a fixture survives only if its date is inside
//! the selected date range, its kickoff time is inside the selected time
//! range, and both of its teams resolve into one of the selected leagues.
//! League membership comes from the fetch cycle's team roster, not from the
//! fixture's own league tag, because one competition body can span several
//! provider feeds.

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::LeagueEndpoint;
use crate::constants::INVALID_MINUTES;
use crate::data_fetcher::models::{LeagueTeam, RawFixture};
use crate::team_registry::TeamRegistry;

/// Inclusive date and kickoff-time window. `None` on either axis means no
/// constraint on that axis.
#[derive(Debug, Clone, Default)]
pub struct FixtureWindow {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Kickoff window as "HH:MM" strings, compared in minutes since
    /// midnight.
    pub time_range: Option<(String, String)>,
}

/// Canonical team name to the set of league codes the team was seen in
/// during the current fetch cycle.
#[derive(Debug, Default)]
pub struct TeamMembership {
    leagues_by_team: HashMap<String, HashSet<String>>,
}

impl TeamMembership {
    /// Builds membership from the fetcher's roster. Names that resolve to
    /// no canonical identity are dropped; their fixtures will fail the join
    /// later, which is the intended handling of a resolution miss.
    pub fn from_roster(roster: &[LeagueTeam], registry: &TeamRegistry) -> Self {
        let mut leagues_by_team: HashMap<String, HashSet<String>> = HashMap::new();
        for entry in roster {
            let Some(canonical) = registry.resolve(&entry.name) else {
                debug!("Roster name {:?} resolved to no known club", entry.name);
                continue;
            };
            leagues_by_team
                .entry(canonical.to_string())
                .or_default()
                .insert(entry.league_code.clone());
        }
        Self { leagues_by_team }
    }

    /// League codes a canonical team was seen in, if any.
    pub fn leagues_of(&self, canonical: &str) -> Option<&HashSet<String>> {
        self.leagues_by_team.get(canonical)
    }
}

/// Converts a kickoff time string to minutes since midnight.
///
/// Anything that is not a strict `HH:MM` with hours 00-23 and minutes 00-59
/// yields the invalid sentinel, which no valid comparison window contains.
/// Fields must be exactly two digits, so `1:5` and signed forms like
/// `+1:30` (which `i32::from_str` would otherwise accept) are rejected.
pub fn time_to_minutes(time: &str) -> i32 {
    let Some((hours, minutes)) = time.trim().split_once(':') else {
        return INVALID_MINUTES;
    };
    let (Some(hours), Some(minutes)) = (two_digit_field(hours), two_digit_field(minutes)) else {
        return INVALID_MINUTES;
    };
    if hours > 23 || minutes > 59 {
        return INVALID_MINUTES;
    }
    hours * 60 + minutes
}

fn two_digit_field(field: &str) -> Option<i32> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Intersects fetched fixtures with selected leagues and the date/time
/// window. Resolution misses and malformed dates or times exclude the
/// fixture rather than failing the join.
pub fn filter_fixtures(
    fixtures: &[RawFixture],
    selected_leagues: &[LeagueEndpoint],
    window: &FixtureWindow,
    membership: &TeamMembership,
    registry: &TeamRegistry,
) -> Vec<RawFixture> {
    let selected_codes: HashSet<&str> = selected_leagues
        .iter()
        .map(|league| league.provider_code.as_str())
        .collect();

    fixtures
        .iter()
        .filter(|fixture| date_in_range(fixture, window))
        .filter(|fixture| time_in_range(fixture, window))
        .filter(|fixture| {
            team_in_selected_leagues(&fixture.home, &selected_codes, membership, registry)
                && team_in_selected_leagues(&fixture.away, &selected_codes, membership, registry)
        })
        .cloned()
        .collect()
}

fn date_in_range(fixture: &RawFixture, window: &FixtureWindow) -> bool {
    let Some((start, end)) = window.date_range else {
        return true;
    };
    let Some(date) = fixture
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    else {
        // A fixture whose date cannot be established cannot satisfy a
        // date constraint
        return false;
    };
    start <= date && date <= end
}

fn time_in_range(fixture: &RawFixture, window: &FixtureWindow) -> bool {
    let Some((range_start, range_end)) = &window.time_range else {
        return true;
    };
    let kickoff = fixture
        .time
        .as_deref()
        .map(time_to_minutes)
        .unwrap_or(INVALID_MINUTES);
    if kickoff == INVALID_MINUTES {
        return false;
    }
    let start = time_to_minutes(range_start);
    let end = time_to_minutes(range_end);
    if start == INVALID_MINUTES || end == INVALID_MINUTES {
        // A window the user managed to make unparseable constrains nothing
        return true;
    }
    start <= kickoff && kickoff <= end
}

fn team_in_selected_leagues(
    raw_name: &str,
    selected_codes: &HashSet<&str>,
    membership: &TeamMembership,
    registry: &TeamRegistry,
) -> bool {
    let Some(canonical) = registry.resolve(raw_name) else {
        debug!("Excluding fixture: {raw_name:?} resolved to no known club");
        return false;
    };
    let Some(leagues) = membership.leagues_of(canonical) else {
        return false;
    };
    leagues.iter().any(|code| selected_codes.contains(code.as_str()))
}
