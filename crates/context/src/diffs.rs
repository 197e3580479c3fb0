//! Unified-diff construction and diff-stat counting.
//!
//! Diffs here exist for handoff display, not for patching: a single
//! replaced hunk between the common prefix and suffix of old/new content
//! is enough, and every stored diff is capped at [`DIFF_LINE_CAP`] lines.

use baton_core::DiffStats;

/// Hard cap on stored diff size, in lines. The renderer applies its own
/// smaller display caps on top of this.
pub const DIFF_LINE_CAP: usize = 200;

/// Build a unified diff between two versions of a file.
///
/// Returns the (capped) diff text and stats counted before capping, so
/// stats reflect the real change even when the text is cut short.
pub fn unified_diff(old: &str, new: &str, path: &str) -> (String, DiffStats) {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();

    let prefix = old_lines
        .iter()
        .zip(new_lines.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let mut suffix = 0;
    while suffix < old_lines.len().saturating_sub(prefix)
        && suffix < new_lines.len().saturating_sub(prefix)
        && old_lines[old_lines.len() - 1 - suffix] == new_lines[new_lines.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let removed = &old_lines[prefix..old_lines.len() - suffix];
    let added = &new_lines[prefix..new_lines.len() - suffix];
    let stats = DiffStats {
        added: added.len(),
        removed: removed.len(),
    };

    let mut lines = Vec::with_capacity(removed.len() + added.len() + 3);
    lines.push(format!("--- a/{path}"));
    lines.push(format!("+++ b/{path}"));
    lines.push(format!(
        "@@ -{},{} +{},{} @@",
        prefix + 1,
        removed.len(),
        prefix + 1,
        added.len()
    ));
    for line in removed {
        lines.push(format!("-{line}"));
    }
    for line in added {
        lines.push(format!("+{line}"));
    }

    (cap_lines(&lines), stats)
}

/// Build a new-file diff: `--- /dev/null` against the full content.
pub fn new_file_diff(content: &str, path: &str) -> (String, DiffStats) {
    let body: Vec<&str> = content.lines().collect();
    let stats = DiffStats {
        added: body.len(),
        removed: 0,
    };

    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push("--- /dev/null".to_string());
    lines.push(format!("+++ b/{path}"));
    lines.push(format!("@@ -0,0 +1,{} @@", body.len()));
    for line in body {
        lines.push(format!("+{line}"));
    }

    (cap_lines(&lines), stats)
}

/// Count added/removed lines in a unified diff, excluding the `---`/`+++`
/// header lines.
pub fn diff_stats(diff: &str) -> DiffStats {
    let mut stats = DiffStats::default();
    for line in diff.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            continue;
        }
        if line.starts_with('+') {
            stats.added += 1;
        } else if line.starts_with('-') {
            stats.removed += 1;
        }
    }
    stats
}

/// Per-line length cap. Keeps pathological single-line files from producing
/// oversized rendered lines downstream.
const DIFF_LINE_WIDTH_CAP: usize = 400;

fn cap_lines(lines: &[String]) -> String {
    let take = lines.len().min(DIFF_LINE_CAP);
    lines[..take]
        .iter()
        .map(|l| {
            if l.len() > DIFF_LINE_WIDTH_CAP {
                let mut end = DIFF_LINE_WIDTH_CAP;
                while end > 0 && !l.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &l[..end])
            } else {
                l.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_file_diff_headers() {
        let (diff, stats) = new_file_diff("line1\nline2", "src/new.rs");
        let lines: Vec<&str> = diff.lines().collect();
        assert_eq!(lines[0], "--- /dev/null");
        assert_eq!(lines[1], "+++ b/src/new.rs");
        let plus_body = lines.iter().filter(|l| l.starts_with('+') && !l.starts_with("+++")).count();
        assert_eq!(plus_body, 2);
        assert_eq!(stats, DiffStats { added: 2, removed: 0 });
    }

    #[test]
    fn test_unified_diff_middle_change() {
        let old = "a\nb\nc\nd";
        let new = "a\nB\nc\nd";
        let (diff, stats) = unified_diff(old, new, "f.txt");
        assert!(diff.contains("--- a/f.txt"));
        assert!(diff.contains("+++ b/f.txt"));
        assert!(diff.contains("-b"));
        assert!(diff.contains("+B"));
        assert!(!diff.contains("-a"));
        assert_eq!(stats, DiffStats { added: 1, removed: 1 });
    }

    #[test]
    fn test_unified_diff_identical() {
        let (diff, stats) = unified_diff("same\n", "same\n", "f.txt");
        assert_eq!(stats, DiffStats::default());
        assert!(diff.contains("@@"));
    }

    #[test]
    fn test_diff_stats_excludes_headers() {
        let diff = "--- a/f\n+++ b/f\n@@ -1,1 +1,2 @@\n-old\n+new\n+more";
        assert_eq!(diff_stats(diff), DiffStats { added: 2, removed: 1 });
    }

    #[test]
    fn test_diff_cap() {
        let content: String = (0..500).map(|i| format!("line {i}\n")).collect();
        let (diff, stats) = new_file_diff(&content, "big.txt");
        assert_eq!(diff.lines().count(), DIFF_LINE_CAP);
        // Stats are counted before capping
        assert_eq!(stats.added, 500);
    }
}
