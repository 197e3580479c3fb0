//! Bounded per-category accumulation of tool invocations.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use baton_core::{SampleEntry, ToolCategory, ToolSample, ToolUsageSummary};
use regex::Regex;

/// Options for one [`SummaryCollector::add`] call.
#[derive(Debug, Default)]
pub struct AddOpts {
    pub data: Option<ToolSample>,
    pub file_path: Option<String>,
    pub is_write: bool,
    pub is_error: bool,
}

/// Accumulates invocations per category into bounded sample lists, tracks
/// error counts and the set of files touched.
///
/// `count`/`error_count` stay exact no matter how many thousands of calls a
/// session contains; only the retained detail is capped, per
/// [`ToolCategory::sample_cap`].
#[derive(Debug, Default)]
pub struct SummaryCollector {
    order: Vec<ToolCategory>,
    summaries: HashMap<ToolCategory, ToolUsageSummary>,
    files: Vec<String>,
    files_seen: HashSet<String>,
}

impl SummaryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation of `category`.
    pub fn add(&mut self, category: ToolCategory, summary: impl Into<String>, opts: AddOpts) {
        if category == ToolCategory::Skip {
            return;
        }
        let entry = match self.summaries.entry(category) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(v) => {
                self.order.push(category);
                v.insert(ToolUsageSummary {
                    category,
                    count: 0,
                    error_count: 0,
                    samples: Vec::new(),
                })
            }
        };

        entry.count += 1;
        if opts.is_error {
            entry.error_count += 1;
        }
        if entry.samples.len() < category.sample_cap() {
            entry.samples.push(SampleEntry {
                summary: summary.into(),
                data: opts.data,
            });
        }

        if opts.is_write {
            if let Some(path) = opts.file_path {
                self.track_file(path);
            }
        }
    }

    /// Record a file touch without a tool-summary entry (shell redirection,
    /// `sed -i`, `mv`/`cp` targets and the like).
    pub fn track_file(&mut self, path: impl Into<String>) {
        let path = path.into();
        if path.is_empty() {
            return;
        }
        if self.files_seen.insert(path.clone()) {
            self.files.push(path);
        }
    }

    /// One summary per category, in first-seen order.
    pub fn into_summaries(mut self) -> (Vec<ToolUsageSummary>, Vec<String>) {
        let summaries = self
            .order
            .iter()
            .filter_map(|cat| self.summaries.remove(cat))
            .collect();
        (summaries, self.files)
    }

    pub fn files_modified(&self) -> &[String] {
        &self.files
    }
}

static SHELL_WRITE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // output redirection: cmd > file, cmd >> file
        Regex::new(r">{1,2}\s*([\w./~-]+)").unwrap(),
        // in-place sed
        Regex::new(r"sed\s+-i(?:\S*)?\s+(?:'[^']*'|\S+)\s+([\w./~-]+)").unwrap(),
        // tee targets
        Regex::new(r"\btee\s+(?:-a\s+)?([\w./~-]+)").unwrap(),
        // mv/cp destination (last arg of a two-arg form)
        Regex::new(r"\b(?:mv|cp)\s+(?:-\S+\s+)*\S+\s+([\w./~-]+)").unwrap(),
        Regex::new(r"\btouch\s+([\w./~-]+)").unwrap(),
    ]
});

/// File paths a shell command writes to, detected via regex on the command
/// string. Best-effort; misses are acceptable, fabrications are not.
pub fn shell_write_targets(command: &str) -> Vec<String> {
    let mut targets = Vec::new();
    for re in SHELL_WRITE_RES.iter() {
        for caps in re.captures_iter(command) {
            if let Some(m) = caps.get(1) {
                let path = m.as_str();
                // /dev/null and bare descriptors aren't file writes
                if path == "/dev/null" || path.chars().all(|c| c.is_ascii_digit()) {
                    continue;
                }
                if !targets.iter().any(|t| t == path) {
                    targets.push(path.to_string());
                }
            }
        }
    }
    targets
}
