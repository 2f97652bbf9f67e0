use once_cell::sync::Lazy;
use regex::Regex;

// A pilot callsign as it appears in unit names: a word (possibly several)
// followed by flight/element digits with arbitrary separators, e.g.
// "ENFIELD11", "Cowboy 4-1", "Springfield 1 1".
static CALLSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+(?: [A-Za-z]+)*?)[ -]*(\d[\d -]*)$").expect("callsign pattern compiles"));

/// Parse a canonical callsign out of a raw unit display name.
///
/// Multiplayer unit names often carry a `|`-delimited suffix (aircraft type,
/// squadron tags); only the part before the first `|` is considered. The
/// canonical form is lowercase with each digit spoken separately:
/// "ENFIELD11" becomes "enfield 1 1". Returns `None` when the name does not
/// look like a callsign at all.
pub fn parse_callsign(raw: &str) -> Option<String> {
    let name = raw.split('|').next().unwrap_or(raw).trim();
    let captures = CALLSIGN.captures(name)?;

    let word = captures[1].trim().to_lowercase();
    let digits: Vec<String> = captures[2]
        .chars()
        .filter(char::is_ascii_digit)
        .map(String::from)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("{} {}", word, digits.join(" ")))
}

/// The key under which a unit name is indexed: the canonical callsign when
/// one can be parsed, otherwise the raw name unchanged.
pub fn callsign_key(raw: &str) -> String {
    parse_callsign(raw).unwrap_or_else(|| raw.to_string())
}
