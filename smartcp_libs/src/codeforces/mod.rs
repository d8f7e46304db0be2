pub mod client;
pub mod model;

use once_cell::sync::Lazy;
use regex::Regex;

static HANDLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,24}$").unwrap());

/// Codeforces handles are 3 to 24 characters of latin letters, digits, `_`, `-` and `.`.
pub fn is_valid_handle(handle: &str) -> bool {
    HANDLE_PATTERN.is_match(handle)
}

pub fn problem_url(contest_id: i64, index: &str) -> String {
    format!(
        "https://codeforces.com/problemset/problem/{}/{}",
        contest_id, index
    )
}
