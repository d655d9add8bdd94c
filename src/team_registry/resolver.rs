//! Raw-name to canonical-identity resolution.

use std::collections::HashMap;
use tracing::{debug, trace};

use super::aliases::{CANONICAL_TEAMS, TEAM_ALIASES, TEAM_CRESTS};
use super::normalizer::normalize;
use crate::constants::PLACEHOLDER_CREST;

/// Resolves raw provider spellings to canonical team identities.
///
/// Lookup stages run in strict priority order, first hit wins:
/// 1. exact case-insensitive match against the canonical registry
/// 2. alias-table lookup
/// 3. normalized input against the plain canonical names
/// 4. normalized input against the normalized canonical names
/// 5. substring containment in either direction (weakest, last)
///
/// Stage 5 is a known imprecision: when one club's name is contained in
/// another's, the first canonical entry in registry order wins and ties are
/// not disambiguated. This mirrors how short abbreviations behave in the
/// feeds and is deliberate; fixing it needs a product-level call on
/// acceptable false positives.
pub struct TeamRegistry {
    canonical: Vec<String>,
    exact: HashMap<String, String>,
    aliases: HashMap<String, String>,
    cleaned: HashMap<String, String>,
    crests: HashMap<String, String>,
}

impl TeamRegistry {
    /// Builds a registry from the bundled alias and crest tables.
    pub fn bundled() -> Self {
        Self::new(
            CANONICAL_TEAMS.iter().map(|s| s.to_string()).collect(),
            TEAM_ALIASES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            TEAM_CRESTS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Builds a registry from injected tables. Alias keys are lowercased;
    /// every alias value should name a canonical entry.
    pub fn new(
        canonical: Vec<String>,
        aliases: HashMap<String, String>,
        crests: HashMap<String, String>,
    ) -> Self {
        let exact = canonical
            .iter()
            .map(|name| (name.to_lowercase(), name.clone()))
            .collect();
        let cleaned = canonical
            .iter()
            .map(|name| (normalize(name), name.clone()))
            .collect();
        let aliases = aliases
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self {
            canonical,
            exact,
            aliases,
            cleaned,
            crests,
        }
    }

    /// Resolves a raw team name to its canonical identity, or `None` when
    /// no stage matches. Empty input short-circuits before the substring
    /// stage so it cannot match every canonical entry.
    pub fn resolve(&self, raw: &str) -> Option<&str> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();

        if let Some(name) = self.exact.get(&lower) {
            trace!("Resolved {raw:?} by exact match");
            return Some(name);
        }

        if let Some(name) = self.aliases.get(&lower) {
            trace!("Resolved {raw:?} via alias table");
            return Some(name);
        }

        let key = normalize(trimmed);
        if !key.is_empty() {
            if let Some(name) = self.exact.get(&key) {
                trace!("Resolved {raw:?} by normalized input against plain names");
                return Some(name);
            }
            if let Some(name) = self.cleaned.get(&key) {
                trace!("Resolved {raw:?} by normalized input against cleaned names");
                return Some(name);
            }
        }

        // Weakest fallback: containment either direction, registry order
        for name in &self.canonical {
            let name_lower = name.to_lowercase();
            if name_lower.contains(&lower) || lower.contains(&name_lower) {
                debug!("Resolved {raw:?} to {name:?} by substring fallback");
                return Some(name);
            }
        }

        debug!("No canonical identity for raw team name {raw:?}");
        None
    }

    /// Resolves a raw name to its crest URI, falling back to the
    /// placeholder crest when the club is unknown or has no crest entry.
    pub fn resolve_crest(&self, raw: &str) -> &str {
        self.resolve(raw)
            .and_then(|name| self.crests.get(name))
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_CREST)
    }

    /// All canonical names in registry order.
    pub fn canonical_names(&self) -> &[String] {
        &self.canonical
    }
}

impl Default for TeamRegistry {
    fn default() -> Self {
        Self::bundled()
    }
}
