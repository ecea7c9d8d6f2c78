use regex::Regex;
use std::sync::LazyLock;

/// Closed allow-list of platform URL shapes. Host must be followed by a path
/// with at least one character.
static PLATFORM_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.|m\.)?(youtube\.com|youtu\.be|facebook\.com|fb\.watch|instagram\.com|tiktok\.com|vimeo\.com)/.+$",
    )
    .unwrap()
});

/// Pure gate in front of the acquisition client. No trimming: input is
/// matched as given, except that blank input short-circuits to false.
pub fn validate(raw: &str) -> bool {
    if raw.trim().is_empty() {
        return false;
    }
    PLATFORM_URL.is_match(raw)
}
