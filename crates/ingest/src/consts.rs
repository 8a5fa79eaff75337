use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Artifacts the export tool leaves embedded in body text: bare permalink
// fragments ("something/1234567890123 :") and reblog attribution lines
// ("name reblogged other-name"). Stripped *after* undoubling, because a
// noise substring can straddle the duplication boundary.
regex!(NOISE_PERMALINK_REGEX, r"\S+/\d{12,}[\s\n\r]*:");
regex!(NOISE_REBLOG_REGEX, r"\S+ reblogged[\s\r\n]+\S+");

// Permalinks in old exports point at the per-blog subdomain; the canonical
// form routes through the main domain.
regex!(PERMALINK_REGEX, r"https://(.+?)\.tumblr\.com/post/(.+)");

regex!(ALL_DIGITS_REGEX, r"^\d+$");

/// Epoch values below this are seconds, at or above are milliseconds.
pub(crate) const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Parsed years at or below this are placeholder/garbage dates.
pub(crate) const MIN_PLAUSIBLE_YEAR: i32 = 2000;
