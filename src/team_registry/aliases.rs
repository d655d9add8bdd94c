//! Static canonical-name, alias and crest tables.
//!
//! Pure data, loaded once at process start. The tables are keyed the way the
//! provider feeds actually spell clubs; additions here need no code changes
//! elsewhere. Alias keys are matched case-insensitively by the resolver.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical display names, one per club. Order is fixed because the
/// resolver's substring fallback scans in this order and first hit wins.
pub static CANONICAL_TEAMS: &[&str] = &[
    "Bayern München",
    "Borussia Dortmund",
    "RB Leipzig",
    "Bayer Leverkusen",
    "Borussia Mönchengladbach",
    "Eintracht Frankfurt",
    "VfB Stuttgart",
    "VfL Wolfsburg",
    "1. FC Köln",
    "1. FSV Mainz 05",
    "1. FC Union Berlin",
    "SC Freiburg",
    "TSG Hoffenheim",
    "Werder Bremen",
    "FC Augsburg",
    "FC St. Pauli",
    "1. FC Heidenheim",
    "Holstein Kiel",
    "Arsenal",
    "Aston Villa",
    "Chelsea",
    "Liverpool",
    "Manchester City",
    "Manchester United",
    "Newcastle United",
    "Tottenham Hotspur",
    "West Ham United",
    "Brighton & Hove Albion",
    "Real Madrid",
    "FC Barcelona",
    "Atlético Madrid",
];

/// Known alternate spellings and abbreviations, many-to-one onto
/// [`CANONICAL_TEAMS`] entries.
pub static TEAM_ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("fc bayern münchen", "Bayern München"),
        ("fc bayern munich", "Bayern München"),
        ("bayern munich", "Bayern München"),
        ("bayern", "Bayern München"),
        ("fcb", "Bayern München"),
        ("bor. dortmund", "Borussia Dortmund"),
        ("dortmund", "Borussia Dortmund"),
        ("bvb", "Borussia Dortmund"),
        ("rasenballsport leipzig", "RB Leipzig"),
        ("leipzig", "RB Leipzig"),
        ("bayer 04 leverkusen", "Bayer Leverkusen"),
        ("leverkusen", "Bayer Leverkusen"),
        ("bor. mönchengladbach", "Borussia Mönchengladbach"),
        ("mönchengladbach", "Borussia Mönchengladbach"),
        ("gladbach", "Borussia Mönchengladbach"),
        ("frankfurt", "Eintracht Frankfurt"),
        ("sge", "Eintracht Frankfurt"),
        ("stuttgart", "VfB Stuttgart"),
        ("wolfsburg", "VfL Wolfsburg"),
        ("köln", "1. FC Köln"),
        ("fc köln", "1. FC Köln"),
        ("fc cologne", "1. FC Köln"),
        ("mainz", "1. FSV Mainz 05"),
        ("mainz 05", "1. FSV Mainz 05"),
        ("union berlin", "1. FC Union Berlin"),
        ("freiburg", "SC Freiburg"),
        ("hoffenheim", "TSG Hoffenheim"),
        ("tsg 1899 hoffenheim", "TSG Hoffenheim"),
        ("sv werder bremen", "Werder Bremen"),
        ("bremen", "Werder Bremen"),
        ("augsburg", "FC Augsburg"),
        ("st. pauli", "FC St. Pauli"),
        ("heidenheim", "1. FC Heidenheim"),
        ("kiel", "Holstein Kiel"),
        ("arsenal fc", "Arsenal"),
        ("villa", "Aston Villa"),
        ("chelsea fc", "Chelsea"),
        ("liverpool fc", "Liverpool"),
        ("man city", "Manchester City"),
        ("manchester city fc", "Manchester City"),
        ("man utd", "Manchester United"),
        ("man united", "Manchester United"),
        ("newcastle", "Newcastle United"),
        ("spurs", "Tottenham Hotspur"),
        ("tottenham", "Tottenham Hotspur"),
        ("west ham", "West Ham United"),
        ("brighton", "Brighton & Hove Albion"),
        ("real", "Real Madrid"),
        ("barcelona", "FC Barcelona"),
        ("barça", "FC Barcelona"),
        ("atletico madrid", "Atlético Madrid"),
        ("atlético de madrid", "Atlético Madrid"),
    ])
});

/// Crest asset URIs keyed by canonical name. Clubs without an entry fall
/// back to the placeholder crest.
pub static TEAM_CRESTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("Bayern München", "crest/bayern_munchen.png"),
        ("Borussia Dortmund", "crest/borussia_dortmund.png"),
        ("RB Leipzig", "crest/rb_leipzig.png"),
        ("Bayer Leverkusen", "crest/bayer_leverkusen.png"),
        ("Borussia Mönchengladbach", "crest/gladbach.png"),
        ("Eintracht Frankfurt", "crest/eintracht_frankfurt.png"),
        ("VfB Stuttgart", "crest/vfb_stuttgart.png"),
        ("VfL Wolfsburg", "crest/vfl_wolfsburg.png"),
        ("1. FC Köln", "crest/fc_koln.png"),
        ("1. FSV Mainz 05", "crest/mainz_05.png"),
        ("1. FC Union Berlin", "crest/union_berlin.png"),
        ("SC Freiburg", "crest/sc_freiburg.png"),
        ("TSG Hoffenheim", "crest/tsg_hoffenheim.png"),
        ("Werder Bremen", "crest/werder_bremen.png"),
        ("Arsenal", "crest/arsenal.png"),
        ("Chelsea", "crest/chelsea.png"),
        ("Liverpool", "crest/liverpool.png"),
        ("Manchester City", "crest/manchester_city.png"),
        ("Manchester United", "crest/manchester_united.png"),
        ("Real Madrid", "crest/real_madrid.png"),
        ("FC Barcelona", "crest/fc_barcelona.png"),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_targets_a_canonical_team() {
        for (alias, canonical) in TEAM_ALIASES.iter() {
            assert!(
                CANONICAL_TEAMS.contains(canonical),
                "alias {alias:?} maps to unknown canonical name {canonical:?}"
            );
        }
    }

    #[test]
    fn test_every_crest_targets_a_canonical_team() {
        for canonical in TEAM_CRESTS.keys() {
            assert!(CANONICAL_TEAMS.contains(canonical));
        }
    }

    #[test]
    fn test_alias_keys_are_lowercase() {
        for alias in TEAM_ALIASES.keys() {
            assert_eq!(*alias, alias.to_lowercase());
        }
    }
}
