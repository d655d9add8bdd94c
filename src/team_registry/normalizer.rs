//! Canonical comparison keys for raw team names.

/// Leading club-type tokens stripped when they appear as the first word(s)
/// of a name. Longer prefixes first so "1. fc" wins over "fc".
const LEADING_PREFIXES: [&str; 12] = [
    "1. fc", "1. fsv", "1. ", "afc", "fc", "cf", "sc", "tsg", "vfb", "vfl", "sv", "rb",
];

/// Maps a raw team name to a normalized comparison key.
///
/// Total and deterministic: never fails, empty input yields an empty key.
/// Two raw names that denote the same club normalize to the same key, which
/// is the contract the resolver's cleaned-name stages rely on.
///
/// Steps, in order: trim, lowercase, strip a trailing standalone "fc"
/// suffix, strip a known leading club-type prefix token, drop ampersands,
/// collapse whitespace/hyphens/periods to nothing, fold accented Latin
/// characters to ASCII.
///
/// # Examples
/// ```
/// use matchsync::team_registry::normalize;
///
/// assert_eq!(normalize("FC Bayern München"), "bayernmunchen");
/// assert_eq!(normalize("Bayern München"), "bayernmunchen");
/// assert_eq!(normalize("Liverpool FC"), "liverpool");
/// assert_eq!(normalize("1. FC Köln"), "koln");
/// ```
pub fn normalize(raw: &str) -> String {
    let mut name = raw.trim().to_lowercase();

    // Trailing standalone suffix ("Liverpool FC" -> "liverpool")
    if let Some(stripped) = name.strip_suffix(" fc") {
        name = stripped.trim_end().to_string();
    }

    // Leading club-type prefix, word-boundary only so already-collapsed
    // keys are not re-stripped ("fcb" stays "fcb")
    for prefix in LEADING_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix) {
            if rest.starts_with(' ') || prefix.ends_with(' ') {
                name = rest.trim_start().to_string();
                break;
            }
        }
    }

    name.chars()
        .filter(|c| *c != '&')
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .flat_map(fold_accent)
        .collect()
}

/// Folds the accented Latin characters seen in provider feeds to ASCII.
/// Unknown characters pass through unchanged.
fn fold_accent(c: char) -> std::vec::IntoIter<char> {
    let folded: Vec<char> = match c {
        'ä' | 'á' | 'à' | 'â' | 'å' => vec!['a'],
        'ö' | 'ó' | 'ò' | 'ô' | 'ø' => vec!['o'],
        'ü' | 'ú' | 'ù' | 'û' => vec!['u'],
        'é' | 'è' | 'ê' | 'ë' => vec!['e'],
        'í' | 'ì' | 'î' | 'ï' => vec!['i'],
        'ç' => vec!['c'],
        'ñ' => vec!['n'],
        'ß' => vec!['s', 's'],
        other => vec![other],
    };
    folded.into_iter()
}
