//! Small pure text helpers shared by extraction and rendering.

use std::sync::LazyLock;

use regex::Regex;

/// Truncate a string to `max_len` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len.saturating_sub(3);
        // Don't split in the middle of a multi-byte char
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First sentence of a block of prose, for reasoning highlights.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or end of
/// input; falls back to the first line when no terminator is found.
pub fn first_sentence(text: &str) -> String {
    let text = text.trim();
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if matches!(b, b'.' | b'!' | b'?') {
            let at_end = i + 1 == bytes.len();
            let before_space = bytes.get(i + 1).is_some_and(|n| n.is_ascii_whitespace());
            if at_end || before_space {
                return collapse_whitespace(&text[..=i]);
            }
        }
    }
    collapse_whitespace(text.lines().next().unwrap_or(""))
}

static EXIT_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"exit(?:ed with)? code[:\s]+(\d+)").unwrap());

/// Parse a shell exit code out of free-text tool output.
///
/// Returns `None` when nothing matches — the code is never guessed.
pub fn parse_exit_code(text: &str) -> Option<i32> {
    EXIT_CODE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Last `n` non-empty lines of output, joined with newlines.
pub fn stdout_tail(text: &str, n: usize) -> Option<String> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return None;
    }
    let start = lines.len().saturating_sub(n);
    Some(lines[start..].join("\n"))
}

static FOUND_N_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Found (\d+) ").unwrap());
static N_MATCHES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) match(?:es)?\b").unwrap());

/// Best-effort match/result count from free-text grep/glob output.
///
/// Tries `Found N ...` then `N match(es)`, then falls back to counting
/// non-empty lines. `None` when the text is empty — never fabricated.
pub fn parse_match_count(text: &str) -> Option<usize> {
    if let Some(caps) = FOUND_N_RE.captures(text) {
        return caps.get(1).and_then(|m| m.as_str().parse().ok());
    }
    if let Some(caps) = N_MATCHES_RE.captures(text) {
        return caps.get(1).and_then(|m| m.as_str().parse().ok());
    }
    let lines = text.lines().filter(|l| !l.trim().is_empty()).count();
    if lines > 0 {
        Some(lines)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_str_multibyte_boundary() {
        let s = "héllo wörld désu";
        let out = truncate_str(s, 8);
        assert!(out.ends_with("..."));
        assert!(out.is_char_boundary(out.len()));
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(
            first_sentence("I should check the config. Then run tests."),
            "I should check the config."
        );
        assert_eq!(first_sentence("Done!"), "Done!");
        assert_eq!(
            first_sentence("no terminator here\nsecond line"),
            "no terminator here"
        );
    }

    #[test]
    fn test_first_sentence_ignores_decimal_points() {
        assert_eq!(
            first_sentence("Bump to v1.2 now. Then release."),
            "Bump to v1.2 now."
        );
    }

    #[test]
    fn test_parse_exit_code() {
        assert_eq!(parse_exit_code("command exited with code 1"), Some(1));
        assert_eq!(parse_exit_code("exit code: 127"), Some(127));
        assert_eq!(parse_exit_code("all good"), None);
    }

    #[test]
    fn test_stdout_tail() {
        let text = "one\n\ntwo\nthree\nfour\nfive\nsix\n";
        assert_eq!(stdout_tail(text, 5), Some("two\nthree\nfour\nfive\nsix".to_string()));
        assert_eq!(stdout_tail("", 5), None);
        assert_eq!(stdout_tail("  \n \n", 5), None);
    }

    #[test]
    fn test_parse_match_count() {
        assert_eq!(parse_match_count("Found 12 files"), Some(12));
        assert_eq!(parse_match_count("3 matches in src/"), Some(3));
        assert_eq!(parse_match_count("1 match"), Some(1));
        assert_eq!(parse_match_count("a.rs\nb.rs\n"), Some(2));
        assert_eq!(parse_match_count(""), None);
    }
}
