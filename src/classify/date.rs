//! Date token recognition
//!
//! Acquisition filenames carry a `YYYYMMDDhhmmss` stamp. A common typo drops
//! one digit of the year (`2025` -> `205`), so 13-digit stamps with a
//! three-digit year are accepted too.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13,14}$").unwrap());

/// Returns true if `token` is a (possibly typo'd) acquisition date stamp
pub fn is_date(token: &str) -> bool {
    if !DIGITS.is_match(token) {
        return false;
    }

    let (year_range, year_len) = match token.len() {
        14 => (2000..=2025, 4),
        13 => (200..=205, 3),
        _ => return false,
    };

    let field = |from: usize, to: usize| token[from..to].parse::<u32>().unwrap_or(0);
    let year = field(0, year_len);
    let month = field(year_len, year_len + 2);
    let day = field(year_len + 2, year_len + 4);

    year_range.contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
}
