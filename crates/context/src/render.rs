//! Deterministic Markdown rendering of a session handoff under a hard
//! size budget.
//!
//! Section order is fixed and several strings are load-bearing: the
//! `# Session Handoff Context` title, the bolded Session Overview field
//! names, the `### <Role>` conversation headings, and the closing
//! `You are continuing this session` directive are parsed by receiving
//! tools and by tests. Renaming them is a breaking change.

use baton_core::{
    ConversationMessage, SessionMeta, SessionNotes, ToolCategory, ToolSample, ToolUsageSummary,
};

use crate::textutil::truncate_str;

/// Display caps per verbosity mode.
#[derive(Debug, Clone, Copy)]
pub struct RenderCaps {
    pub shell_samples: usize,
    pub shell_tail_lines: usize,
    pub diff_samples: usize,
    pub diff_lines: usize,
    pub list_samples: usize,
    pub compact_samples: usize,
}

/// Caps for inline injection into a prompt: tight.
pub const INLINE_CAPS: RenderCaps = RenderCaps {
    shell_samples: 5,
    shell_tail_lines: 3,
    diff_samples: 3,
    diff_lines: 60,
    list_samples: 8,
    compact_samples: 3,
};

/// Caps for reference exports: roomier, used at lower frequency.
pub const REFERENCE_CAPS: RenderCaps = RenderCaps {
    shell_samples: 5,
    shell_tail_lines: 5,
    diff_samples: 8,
    diff_lines: 120,
    list_samples: 15,
    compact_samples: 5,
};

/// Verbosity mode selecting one of the two cap profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Inline,
    Reference,
}

impl RenderMode {
    pub fn caps(&self) -> &'static RenderCaps {
        match self {
            RenderMode::Inline => &INLINE_CAPS,
            RenderMode::Reference => &REFERENCE_CAPS,
        }
    }
}

const MESSAGE_CONTENT_CAP: usize = 500;
// Real file paths are nowhere near this long; the cap only guards the
// no-line-over-10k output guarantee against a pathological record.
const FILE_PATH_CAP: usize = 4096;
const CLOSING_DIRECTIVE: &str = "You are continuing this session in a different agent tool. \
Review the context above, then pick up where the previous agent left off.";

/// Render the complete handoff Markdown document.
#[allow(clippy::too_many_arguments)]
pub fn render(
    meta: &SessionMeta,
    recent_messages: &[ConversationMessage],
    files_modified: &[String],
    pending_tasks: &[String],
    summaries: &[ToolUsageSummary],
    notes: Option<&SessionNotes>,
    mode: RenderMode,
) -> String {
    let caps = mode.caps();
    let mut md = String::new();

    md.push_str("# Session Handoff Context\n\n");
    render_overview(&mut md, meta, notes, files_modified.len(), recent_messages.len());

    if let Some(title) = meta.title.as_deref().filter(|t| !t.trim().is_empty()) {
        md.push_str("## Summary\n\n");
        md.push_str(&format!("> {}\n\n", sanitize(&truncate_str(title.trim(), 300))));
    }

    render_tool_activity(&mut md, summaries, caps);

    if let Some(notes) = notes {
        if !notes.reasoning.is_empty() {
            md.push_str("## Key Decisions\n\n");
            for item in notes.reasoning.iter().take(5) {
                md.push_str(&format!("- {}\n", sanitize(item)));
            }
            md.push('\n');
        }
    }

    md.push_str("## Recent Conversation\n\n");
    if recent_messages.is_empty() {
        md.push_str("*(no messages)*\n\n");
    } else {
        for msg in recent_messages {
            md.push_str(&format!("### {}\n\n", msg.role.label()));
            md.push_str(&sanitize(&truncate_str(msg.content.trim(), MESSAGE_CONTENT_CAP)));
            md.push_str("\n\n");
        }
    }

    if !files_modified.is_empty() {
        md.push_str("## Files Modified\n\n");
        for path in files_modified {
            md.push_str(&format!("- `{}`\n", truncate_str(path, FILE_PATH_CAP)));
        }
        md.push('\n');
    }

    if !pending_tasks.is_empty() {
        md.push_str("## Pending Tasks\n\n");
        for task in pending_tasks {
            md.push_str(&format!("- [ ] {}\n", sanitize(task)));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str(CLOSING_DIRECTIVE);
    md.push('\n');
    md
}

fn render_overview(
    md: &mut String,
    meta: &SessionMeta,
    notes: Option<&SessionNotes>,
    files_modified: usize,
    message_count: usize,
) {
    md.push_str("## Session Overview\n\n");
    md.push_str("| Field | Value |\n| --- | --- |\n");
    md.push_str(&format!("| **Source** | {} |\n", meta.source));
    md.push_str(&format!("| **Session ID** | `{}` |\n", meta.session_id));
    md.push_str(&format!(
        "| **Working Directory** | {} |\n",
        meta.cwd
            .as_deref()
            .map(|c| format!("`{c}`"))
            .unwrap_or_else(|| "(unknown)".to_string())
    ));
    if let Some(repo) = meta.repo.as_deref() {
        let branch = meta.branch.as_deref().unwrap_or("-");
        md.push_str(&format!("| **Repo/Branch** | {repo} @ {branch} |\n"));
    }
    if let Some(model) = meta.model.as_deref() {
        md.push_str(&format!("| **Model** | {model} |\n"));
    }
    md.push_str(&format!(
        "| **Last Active** | {} |\n",
        meta.last_active
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "(unknown)".to_string())
    ));
    if let Some(usage) = notes.and_then(|n| n.token_usage) {
        let mut cell = format!("{} in / {} out", usage.input, usage.output);
        if let Some(cache) = notes.and_then(|n| n.cache_tokens) {
            cell.push_str(&format!(", {cache} cached"));
        }
        if let Some(thinking) = notes.and_then(|n| n.thinking_tokens) {
            cell.push_str(&format!(", {thinking} thinking"));
        }
        md.push_str(&format!("| **Token Usage** | {cell} |\n"));
    }
    md.push_str(&format!("| **Files Modified** | {files_modified} |\n"));
    md.push_str(&format!("| **Messages** | {message_count} |\n"));
    md.push('\n');
}

fn render_tool_activity(md: &mut String, summaries: &[ToolUsageSummary], caps: &RenderCaps) {
    if summaries.is_empty() {
        return;
    }
    md.push_str("## Tool Activity\n\n");

    // Fixed priority order, not first-seen order.
    for category in ToolCategory::RENDER_ORDER {
        let Some(summary) = summaries.iter().find(|s| s.category == category) else {
            continue;
        };
        render_heading(md, summary);
        match category {
            ToolCategory::Shell => render_shell(md, summary, caps),
            ToolCategory::Write | ToolCategory::Edit => render_diffs(md, summary, caps),
            ToolCategory::Read | ToolCategory::Grep | ToolCategory::Glob => {
                render_list(md, summary, caps)
            }
            _ => render_compact(md, summary, caps),
        }
    }
}

fn render_heading(md: &mut String, summary: &ToolUsageSummary) {
    let label = summary.category.label();
    if summary.error_count > 0 {
        md.push_str(&format!(
            "### {label} ({} calls, {} errors)\n\n",
            summary.count, summary.error_count
        ));
    } else {
        md.push_str(&format!("### {label} ({} calls)\n\n", summary.count));
    }
}

fn overflow_noun(category: ToolCategory) -> &'static str {
    match category {
        ToolCategory::Shell => "shell",
        ToolCategory::Write => "write",
        ToolCategory::Edit => "edit",
        ToolCategory::Read => "read",
        ToolCategory::Grep => "grep",
        ToolCategory::Glob => "glob",
        ToolCategory::Search => "search",
        ToolCategory::Fetch => "fetch",
        ToolCategory::Task => "task",
        ToolCategory::Ask => "ask",
        _ => "tool",
    }
}

/// Exact remainder line. `rendered` is the number of samples shown in any
/// form; the count is never approximated.
fn render_overflow(md: &mut String, summary: &ToolUsageSummary, rendered: usize, all_ok: bool) {
    let remaining = summary.count.saturating_sub(rendered);
    if remaining == 0 {
        return;
    }
    let noun = overflow_noun(summary.category);
    if all_ok {
        md.push_str(&format!("*...and {remaining} more {noun} calls (all exit 0)*\n\n"));
    } else {
        md.push_str(&format!("*...and {remaining} more {noun} calls*\n\n"));
    }
}

fn render_shell(md: &mut String, summary: &ToolUsageSummary, caps: &RenderCaps) {
    let shown = summary.samples.len().min(caps.shell_samples);
    for entry in summary.samples.iter().take(shown) {
        let Some(ToolSample::Shell { command, exit_code, stdout_tail, errored }) =
            entry.data.as_ref()
        else {
            md.push_str(&format!("- `{}`\n", entry.summary));
            continue;
        };
        let mut line = format!("- `{command}`");
        if let Some(code) = exit_code {
            line.push_str(&format!(" — exit {code}"));
        }
        if *errored {
            line.push_str(" **[ERROR]**");
        }
        md.push_str(&line);
        md.push('\n');
        if let Some(tail) = stdout_tail {
            md.push_str("\n  ```\n");
            for tail_line in tail.lines().rev().take(caps.shell_tail_lines).collect::<Vec<_>>().into_iter().rev() {
                md.push_str("  ");
                md.push_str(&truncate_str(tail_line, 400));
                md.push('\n');
            }
            md.push_str("  ```\n");
        }
    }
    md.push('\n');
    render_overflow(md, summary, shown, summary.error_count == 0);
}

fn render_diffs(md: &mut String, summary: &ToolUsageSummary, caps: &RenderCaps) {
    let detailed = summary.samples.len().min(caps.diff_samples);
    for entry in summary.samples.iter().take(detailed) {
        let (file_path, diff, stats) = match entry.data.as_ref() {
            Some(ToolSample::Write { file_path, diff, diff_stats, .. }) => {
                (file_path.as_str(), diff.as_deref(), *diff_stats)
            }
            Some(ToolSample::Edit { file_path, diff, diff_stats, .. }) => {
                (file_path.as_str(), diff.as_deref(), *diff_stats)
            }
            _ => {
                md.push_str(&format!("- `{}`\n", entry.summary));
                continue;
            }
        };
        let stats_suffix = stats
            .map(|s| format!(" (+{}/-{})", s.added, s.removed))
            .unwrap_or_default();
        md.push_str(&format!("- `{file_path}`{stats_suffix}\n"));
        if let Some(diff) = diff {
            let total_lines = diff.lines().count();
            md.push_str("\n  ```diff\n");
            for line in diff.lines().take(caps.diff_lines) {
                md.push_str("  ");
                md.push_str(line);
                md.push('\n');
            }
            md.push_str("  ```\n");
            if total_lines > caps.diff_lines {
                md.push_str(&format!("  *+{} lines truncated*\n", total_lines - caps.diff_lines));
            }
        }
    }

    // Remaining retained samples get a single paths-and-stats line.
    if summary.samples.len() > detailed {
        let rest: Vec<String> = summary.samples[detailed..]
            .iter()
            .map(|entry| match entry.data.as_ref() {
                Some(ToolSample::Write { file_path, diff_stats, .. })
                | Some(ToolSample::Edit { file_path, diff_stats, .. }) => match diff_stats {
                    Some(s) => format!("`{file_path}` (+{}/-{})", s.added, s.removed),
                    None => format!("`{file_path}`"),
                },
                _ => format!("`{}`", entry.summary),
            })
            .collect();
        md.push_str(&format!("- also: {}\n", rest.join(", ")));
    }
    md.push('\n');
    render_overflow(md, summary, summary.samples.len(), false);
}

fn render_list(md: &mut String, summary: &ToolUsageSummary, caps: &RenderCaps) {
    let shown = summary.samples.len().min(caps.list_samples);
    for entry in summary.samples.iter().take(shown) {
        let line = match entry.data.as_ref() {
            Some(ToolSample::Read { file_path, line_start, line_end }) => {
                match (line_start, line_end) {
                    (Some(start), Some(end)) => format!("`{file_path}` (lines {start}-{end})"),
                    (Some(start), None) => format!("`{file_path}` (from line {start})"),
                    _ => format!("`{file_path}`"),
                }
            }
            Some(ToolSample::Grep { pattern, target_path, match_count }) => {
                let mut line = format!("`{pattern}`");
                if let Some(path) = target_path {
                    line.push_str(&format!(" in `{path}`"));
                }
                if let Some(count) = match_count {
                    line.push_str(&format!(" — {count} matches"));
                }
                line
            }
            Some(ToolSample::Glob { pattern, result_count }) => match result_count {
                Some(count) => format!("`{pattern}` — {count} results"),
                None => format!("`{pattern}`"),
            },
            _ => format!("`{}`", entry.summary),
        };
        md.push_str(&format!("- {line}\n"));
    }
    md.push('\n');
    render_overflow(md, summary, shown, false);
}

/// Shared compact formatter for the one-liner categories. Adding a new
/// compact category is a new match arm here, not a new function.
fn compact_line(category: ToolCategory, entry: &baton_core::SampleEntry) -> String {
    match (category, entry.data.as_ref()) {
        (ToolCategory::Search, Some(ToolSample::Search { query })) => {
            format!("searched: \"{}\"", sanitize(query))
        }
        (ToolCategory::Fetch, Some(ToolSample::Fetch { url, result_preview })) => {
            match result_preview {
                Some(preview) => format!("fetched {url} — {}", sanitize(preview)),
                None => format!("fetched {url}"),
            }
        }
        (ToolCategory::Task, Some(ToolSample::Task { description, agent_type, result_summary })) => {
            let mut line = match agent_type {
                Some(agent) => format!("task ({agent}): {description}"),
                None => format!("task: {description}"),
            };
            if let Some(result) = result_summary {
                line.push_str(&format!(" → {}", sanitize(result)));
            }
            line
        }
        (ToolCategory::Ask, Some(ToolSample::Ask { question })) => {
            format!("asked: {}", sanitize(question))
        }
        (ToolCategory::Mcp, Some(ToolSample::Mcp { tool_name, params, result })) => {
            let mut line = format!("`{tool_name}`");
            if let Some(params) = params {
                line.push_str(&format!(" {}", sanitize(params)));
            }
            if let Some(result) = result {
                line.push_str(&format!(" → {}", sanitize(result)));
            }
            line
        }
        _ => sanitize(&entry.summary),
    }
}

fn render_compact(md: &mut String, summary: &ToolUsageSummary, caps: &RenderCaps) {
    let shown = summary.samples.len().min(caps.compact_samples);
    for entry in summary.samples.iter().take(shown) {
        md.push_str(&format!("- {}\n", compact_line(summary.category, entry)));
    }
    md.push('\n');
    render_overflow(md, summary, shown, false);
}

/// Strip NUL bytes and normalize raw carriage returns; the rendered
/// document must stay clean UTF-8 with bounded lines.
fn sanitize(text: &str) -> String {
    text.replace('\0', "").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use baton_core::{DiffStats, Role, SampleEntry, SessionMeta, TokenUsage};

    fn meta() -> SessionMeta {
        let mut meta = SessionMeta::new("codex", "sess-42");
        meta.cwd = Some("/work/repo".to_string());
        meta
    }

    fn shell_summary(count: usize, error_count: usize, samples: usize) -> ToolUsageSummary {
        ToolUsageSummary {
            category: ToolCategory::Shell,
            count,
            error_count,
            samples: (0..samples)
                .map(|i| SampleEntry {
                    summary: format!("cmd {i}"),
                    data: Some(ToolSample::Shell {
                        command: format!("cmd {i}"),
                        exit_code: Some(if i == 0 && error_count > 0 { 1 } else { 0 }),
                        stdout_tail: None,
                        errored: i == 0 && error_count > 0,
                    }),
                })
                .collect(),
        }
    }

    fn render_min(summaries: &[ToolUsageSummary]) -> String {
        render(&meta(), &[], &[], &[], summaries, None, RenderMode::Inline)
    }

    #[test]
    fn test_required_markers_present() {
        let md = render_min(&[]);
        assert!(md.starts_with("# Session Handoff Context"));
        assert!(md.contains("## Session Overview"));
        assert!(md.contains("| **Source** | codex |"));
        assert!(md.contains("| **Session ID** | `sess-42` |"));
        assert!(md.contains("| **Working Directory** | `/work/repo` |"));
        assert!(md.contains("| **Last Active** |"));
        assert!(md.contains("## Recent Conversation"));
        assert!(md.trim_end().ends_with("pick up where the previous agent left off."));
        assert!(md.contains("You are continuing this session"));
    }

    #[test]
    fn test_shell_scenario_47_calls_1_error() {
        // 47 calls, 1 erroring, 5 retained samples: exactly 5 detailed
        // blocks, exact remainder, no "(all exit 0)" suffix.
        let md = render_min(&[shell_summary(47, 1, 5)]);
        assert!(md.contains("### Shell (47 calls, 1 errors)"));
        assert_eq!(md.matches("- `cmd ").count(), 5);
        assert!(md.contains("*...and 42 more shell calls*"));
        assert!(!md.contains("(all exit 0)"));
        assert!(md.contains("**[ERROR]**"));
    }

    #[test]
    fn test_shell_overflow_all_ok_suffix() {
        let md = render_min(&[shell_summary(12, 0, 5)]);
        assert!(md.contains("### Shell (12 calls)"));
        assert!(md.contains("*...and 7 more shell calls (all exit 0)*"));
    }

    #[test]
    fn test_shell_no_overflow_line_when_all_shown() {
        let md = render_min(&[shell_summary(3, 0, 3)]);
        assert!(!md.contains("more shell calls"));
    }

    #[test]
    fn test_diff_truncation_exact_count() {
        let diff_lines: Vec<String> = (0..100).map(|i| format!("+line {i}")).collect();
        let diff = format!("--- /dev/null\n+++ b/a.rs\n@@ -0,0 +1,100 @@\n{}", diff_lines.join("\n"));
        let total = diff.lines().count();
        let summary = ToolUsageSummary {
            category: ToolCategory::Write,
            count: 1,
            error_count: 0,
            samples: vec![SampleEntry {
                summary: "a.rs".to_string(),
                data: Some(ToolSample::Write {
                    file_path: "a.rs".to_string(),
                    is_new_file: true,
                    diff: Some(diff),
                    diff_stats: Some(DiffStats { added: 100, removed: 0 }),
                }),
            }],
        };
        let md = render_min(&[summary]);
        let expected = total - INLINE_CAPS.diff_lines;
        assert!(md.contains(&format!("*+{expected} lines truncated*")));
    }

    #[test]
    fn test_diff_overflow_lists_remaining_paths() {
        let samples: Vec<SampleEntry> = (0..5)
            .map(|i| SampleEntry {
                summary: format!("f{i}.rs"),
                data: Some(ToolSample::Edit {
                    file_path: format!("f{i}.rs"),
                    diff: None,
                    diff_stats: Some(DiffStats { added: i, removed: 1 }),
                }),
            })
            .collect();
        let summary = ToolUsageSummary {
            category: ToolCategory::Edit,
            count: 9,
            error_count: 0,
            samples,
        };
        let md = render_min(&[summary]);
        // Inline shows 3 detailed, 2 listed on the "also" line, 4 counted.
        assert!(md.contains("- also: `f3.rs` (+3/-1), `f4.rs` (+4/-1)"));
        assert!(md.contains("*...and 4 more edit calls*"));
    }

    #[test]
    fn test_category_priority_order() {
        let mk = |category| ToolUsageSummary {
            category,
            count: 1,
            error_count: 0,
            samples: Vec::new(),
        };
        // First-seen order reversed relative to render priority.
        let md = render_min(&[mk(ToolCategory::Read), mk(ToolCategory::Write), mk(ToolCategory::Shell)]);
        let shell = md.find("### Shell").unwrap();
        let write = md.find("### Write").unwrap();
        let read = md.find("### Read").unwrap();
        assert!(shell < write && write < read);
    }

    #[test]
    fn test_files_modified_verbatim() {
        let files = vec!["src/main.rs".to_string(), "docs/notes [draft].md".to_string()];
        let md = render(&meta(), &[], &files, &[], &[], None, RenderMode::Inline);
        assert!(md.contains("## Files Modified"));
        for path in &files {
            assert!(md.contains(&format!("- `{path}`")));
        }
        assert!(md.contains("| **Files Modified** | 2 |"));
    }

    #[test]
    fn test_recent_conversation_truncated_with_roles() {
        let messages = vec![
            ConversationMessage {
                role: Role::User,
                content: "x".repeat(2000),
                timestamp: None,
                tool_calls: Vec::new(),
            },
            ConversationMessage {
                role: Role::Assistant,
                content: "short".to_string(),
                timestamp: None,
                tool_calls: Vec::new(),
            },
        ];
        let md = render(&meta(), &messages, &[], &[], &[], None, RenderMode::Inline);
        assert!(md.contains("### User"));
        assert!(md.contains("### Assistant"));
        assert!(md.contains("..."));
        assert!(md.lines().all(|l| l.len() < 10_000));
    }

    #[test]
    fn test_files_modified_paths_capped() {
        let files = vec!["src/lib.rs".to_string(), "a/".repeat(10_000)];
        let md = render(&meta(), &[], &files, &[], &[], None, RenderMode::Inline);
        assert!(md.contains("- `src/lib.rs`\n"));
        assert!(md.lines().all(|l| l.len() < 10_000));
    }

    #[test]
    fn test_no_nul_bytes_and_valid_utf8() {
        let messages = vec![ConversationMessage {
            role: Role::Tool,
            content: "out\0put with \0 nulls".to_string(),
            timestamp: None,
            tool_calls: Vec::new(),
        }];
        let md = render(&meta(), &messages, &[], &[], &[], None, RenderMode::Reference);
        assert!(!md.contains('\0'));
        let roundtrip = String::from_utf8(md.clone().into_bytes()).unwrap();
        assert_eq!(roundtrip, md);
    }

    #[test]
    fn test_pending_tasks_checklist() {
        let tasks = vec!["wire the resolver".to_string()];
        let md = render(&meta(), &[], &[], &tasks, &[], None, RenderMode::Inline);
        assert!(md.contains("## Pending Tasks"));
        assert!(md.contains("- [ ] wire the resolver"));
    }

    #[test]
    fn test_key_decisions_and_token_usage() {
        let notes = SessionNotes {
            model: Some("gpt-5".to_string()),
            token_usage: Some(TokenUsage { input: 1200, output: 800 }),
            cache_tokens: Some(300),
            thinking_tokens: None,
            reasoning: vec!["Chose a flat index layout.".to_string()],
        };
        let md = render(&meta(), &[], &[], &[], &[], Some(&notes), RenderMode::Inline);
        assert!(md.contains("## Key Decisions"));
        assert!(md.contains("- Chose a flat index layout."));
        assert!(md.contains("| **Token Usage** | 1200 in / 800 out, 300 cached |"));
    }

    #[test]
    fn test_compact_formatter_per_category() {
        let mk = |category, data| ToolUsageSummary {
            category,
            count: 1,
            error_count: 0,
            samples: vec![SampleEntry {
                summary: "s".to_string(),
                data: Some(data),
            }],
        };
        let md = render_min(&[
            mk(
                ToolCategory::Search,
                ToolSample::Search { query: "rust diff crate".to_string() },
            ),
            mk(
                ToolCategory::Task,
                ToolSample::Task {
                    description: "audit deps".to_string(),
                    agent_type: Some("explorer".to_string()),
                    result_summary: None,
                },
            ),
            mk(
                ToolCategory::Mcp,
                ToolSample::Mcp {
                    tool_name: "mcp__gh__create_issue".to_string(),
                    params: None,
                    result: Some("created #12".to_string()),
                },
            ),
        ]);
        assert!(md.contains("- searched: \"rust diff crate\""));
        assert!(md.contains("- task (explorer): audit deps"));
        assert!(md.contains("- `mcp__gh__create_issue` → created #12"));
    }

    #[test]
    fn test_reference_mode_roomier_than_inline() {
        assert!(REFERENCE_CAPS.diff_samples > INLINE_CAPS.diff_samples);
        assert!(REFERENCE_CAPS.diff_lines > INLINE_CAPS.diff_lines);
        assert!(REFERENCE_CAPS.list_samples > INLINE_CAPS.list_samples);
    }
}
