use serde::{Deserialize, Serialize};

/// The classified kind of a tool invocation.
///
/// A closed set: every raw tool name from every supported source format maps
/// to exactly one of these, with `Mcp` doubling as the "unknown tool call"
/// bucket and `Skip` marking bookkeeping tools that are never summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Shell,
    Read,
    Write,
    Edit,
    Grep,
    Glob,
    Search,
    Fetch,
    Task,
    Ask,
    Mcp,
    Skip,
}

impl ToolCategory {
    /// Fixed rendering priority: heavyweight action categories first,
    /// unclassified (mcp) last. `Skip` never renders.
    pub const RENDER_ORDER: [ToolCategory; 11] = [
        ToolCategory::Shell,
        ToolCategory::Write,
        ToolCategory::Edit,
        ToolCategory::Read,
        ToolCategory::Grep,
        ToolCategory::Glob,
        ToolCategory::Search,
        ToolCategory::Fetch,
        ToolCategory::Task,
        ToolCategory::Ask,
        ToolCategory::Mcp,
    ];

    /// Section heading label.
    pub fn label(&self) -> &'static str {
        match self {
            ToolCategory::Shell => "Shell",
            ToolCategory::Read => "Read",
            ToolCategory::Write => "Write",
            ToolCategory::Edit => "Edit",
            ToolCategory::Grep => "Grep",
            ToolCategory::Glob => "Glob",
            ToolCategory::Search => "Search",
            ToolCategory::Fetch => "Fetch",
            ToolCategory::Task => "Task",
            ToolCategory::Ask => "Ask",
            ToolCategory::Mcp => "MCP / Other",
            ToolCategory::Skip => "Skip",
        }
    }

    /// Maximum number of detailed samples retained per category.
    ///
    /// Fixed policy, not per-call configuration: categories with large
    /// samples (diffs, stdout) keep few, one-liner categories keep more.
    /// The true invocation count is tracked exactly regardless.
    pub fn sample_cap(&self) -> usize {
        match self {
            ToolCategory::Shell => 5,
            ToolCategory::Write | ToolCategory::Edit => 8,
            ToolCategory::Read | ToolCategory::Grep => 15,
            ToolCategory::Glob | ToolCategory::Search | ToolCategory::Fetch => 10,
            _ => 5,
        }
    }
}

/// Line counts scanned out of a unified diff body (`---`/`+++` headers excluded).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
}

/// Structured payload captured for one tool invocation.
///
/// Every payload is size-bounded at capture time: diffs are capped at 200
/// lines and free-text fields at 100 chars. The renderer relies on this
/// invariant and does not re-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ToolSample {
    Shell {
        command: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stdout_tail: Option<String>,
        errored: bool,
    },
    Read {
        file_path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        line_start: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        line_end: Option<u64>,
    },
    Write {
        file_path: String,
        is_new_file: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        diff: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        diff_stats: Option<DiffStats>,
    },
    Edit {
        file_path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        diff: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        diff_stats: Option<DiffStats>,
    },
    Grep {
        pattern: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_path: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        match_count: Option<usize>,
    },
    Glob {
        pattern: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        result_count: Option<usize>,
    },
    Search {
        query: String,
    },
    Fetch {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        result_preview: Option<String>,
    },
    Task {
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        agent_type: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        result_summary: Option<String>,
    },
    Ask {
        question: String,
    },
    Mcp {
        tool_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
}

/// One retained sample: a human-readable one-liner plus the structured payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleEntry {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ToolSample>,
}

/// Per-category usage summary for one session.
///
/// `count` and `error_count` are exact; `samples` is a bounded prefix, so
/// `samples.len() <= count` always holds and is capped by the category's
/// sample cap rather than by `count`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolUsageSummary {
    pub category: ToolCategory,
    pub count: usize,
    pub error_count: usize,
    pub samples: Vec<SampleEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_tagged_serialization() {
        let sample = ToolSample::Shell {
            command: "cargo test".to_string(),
            exit_code: Some(1),
            stdout_tail: None,
            errored: true,
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"category\":\"shell\""));
        assert!(!json.contains("stdout_tail"));

        let parsed: ToolSample = serde_json::from_str(&json).unwrap();
        match parsed {
            ToolSample::Shell { exit_code, errored, .. } => {
                assert_eq!(exit_code, Some(1));
                assert!(errored);
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_render_order_excludes_skip() {
        assert!(!ToolCategory::RENDER_ORDER.contains(&ToolCategory::Skip));
        assert_eq!(ToolCategory::RENDER_ORDER[0], ToolCategory::Shell);
        assert_eq!(ToolCategory::RENDER_ORDER[10], ToolCategory::Mcp);
    }

    #[test]
    fn test_sample_caps() {
        assert_eq!(ToolCategory::Shell.sample_cap(), 5);
        assert_eq!(ToolCategory::Edit.sample_cap(), 8);
        assert_eq!(ToolCategory::Read.sample_cap(), 15);
        assert_eq!(ToolCategory::Ask.sample_cap(), 5);
        assert_eq!(ToolCategory::Mcp.sample_cap(), 5);
    }
}
