use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Anchor href used by the reference UI; no bytes ever move.
pub const PLACEHOLDER_TARGET: &str = "#";

/// Browser-level save action: a suggested filename plus a placeholder target.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveIntent {
    pub filename: String,
    pub target: String,
}

/// Derives the `{title}.{extension}` save intent for a settled download.
pub fn save_intent(title: &str, extension: &str) -> SaveIntent {
    let stem = sanitize_stem(title);
    let ext = extension.trim().trim_start_matches('.');
    let filename = if ext.is_empty() {
        stem
    } else {
        format!("{stem}.{ext}")
    };
    SaveIntent {
        filename,
        target: PLACEHOLDER_TARGET.to_string(),
    }
}

fn sanitize_stem(name: &str) -> String {
    let name: String = name.nfc().collect();
    let name = WS_RE.replace_all(name.trim(), " ");

    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => out.push('_'),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    let out = out.trim_matches([' ', '.']).to_string();
    if out.is_empty() {
        "download".into()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_title_and_extension() {
        let intent = save_intent("My Clip", "mp4");
        assert_eq!(intent.filename, "My Clip.mp4");
        assert_eq!(intent.target, PLACEHOLDER_TARGET);
    }

    #[test]
    fn replaces_forbidden_characters() {
        assert_eq!(save_intent("a/b:c?", "mp3").filename, "a_b_c_.mp3");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(save_intent("  spaced\t\tout  ", "mp4").filename, "spaced out.mp4");
    }

    #[test]
    fn normalizes_to_nfc() {
        let decomposed = "cafe\u{0301}";
        assert_eq!(save_intent(decomposed, "flac").filename, "caf\u{00e9}.flac");
    }

    #[test]
    fn empty_title_falls_back_to_stem() {
        assert_eq!(save_intent("...", "mp4").filename, "download.mp4");
    }

    #[test]
    fn dotted_extension_not_doubled() {
        assert_eq!(save_intent("clip", ".mp4").filename, "clip.mp4");
    }
}
