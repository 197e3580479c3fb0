//! Session extraction: classify invocations, capture structured samples,
//! and assemble the [`SessionHandoff`] aggregate.
//!
//! Extraction is two explicit pure steps: (1) build a `call_id -> result`
//! lookup from detached result records, (2) fold invocations into a
//! [`SummaryCollector`]. No shared mutable state crosses the steps.

use std::collections::HashMap;

use baton_core::{
    SessionHandoff, SessionNotes, SessionRecord, ToolCategory, ToolInvocation, ToolResultRecord,
    ToolSample,
};
use serde_json::Value;

use crate::classify::classify;
use crate::collector::{shell_write_targets, AddOpts, SummaryCollector};
use crate::diffs::{new_file_diff, unified_diff};
use crate::render::{render, RenderMode};
use crate::textutil::{
    first_sentence, parse_exit_code, parse_match_count, stdout_tail, truncate_str,
};

/// Cap applied to every free-text sample field.
const TEXT_FIELD_CAP: usize = 100;
/// Maximum recent messages carried into the handoff.
const RECENT_MESSAGE_CAP: usize = 10;
/// Maximum pending tasks carried into the handoff.
const PENDING_TASK_CAP: usize = 5;
/// Maximum reasoning highlights, each a single first sentence.
const REASONING_CAP: usize = 5;
const REASONING_ENTRY_CAP: usize = 200;

/// Step 1: build a `call_id -> (content, is_error)` lookup from detached
/// result records. First result per call wins.
pub fn build_result_lookup(results: &[ToolResultRecord]) -> HashMap<&str, (&str, bool)> {
    let mut lookup = HashMap::new();
    for record in results {
        lookup
            .entry(record.call_id.as_str())
            .or_insert((record.content.as_str(), record.is_error));
    }
    lookup
}

/// Step 2: fold invocations into bounded summaries, files modified, and
/// pending tasks.
pub fn fold_invocations(
    invocations: &[ToolInvocation],
    results: &HashMap<&str, (&str, bool)>,
) -> (Vec<baton_core::ToolUsageSummary>, Vec<String>, Vec<String>) {
    let mut collector = SummaryCollector::new();
    let mut pending_tasks = Vec::new();

    for inv in invocations {
        let (result_text, result_error) = match (&inv.result, &inv.call_id) {
            (Some(text), _) => (Some(text.as_str()), inv.is_error),
            (None, Some(id)) => match results.get(id.as_str()) {
                Some((text, is_error)) => (Some(*text), inv.is_error || *is_error),
                None => (None, inv.is_error),
            },
            (None, None) => (None, inv.is_error),
        };

        let category = classify(&inv.name);
        if category == ToolCategory::Skip {
            collect_pending_tasks(&inv.arguments, &mut pending_tasks);
            continue;
        }

        let captured = capture_sample(category, inv, result_text, result_error);
        collector.add(category, captured.summary, captured.opts);
        for target in captured.extra_file_touches {
            collector.track_file(target);
        }
    }

    let (summaries, files) = collector.into_summaries();
    pending_tasks.truncate(PENDING_TASK_CAP);
    (summaries, files, pending_tasks)
}

struct CapturedSample {
    summary: String,
    opts: AddOpts,
    extra_file_touches: Vec<String>,
}

/// Category-specific structured capture. Missing or malformed fields
/// degrade to a name-only summary; nothing here errors.
fn capture_sample(
    category: ToolCategory,
    inv: &ToolInvocation,
    result: Option<&str>,
    result_error: bool,
) -> CapturedSample {
    let args = &inv.arguments;
    let mut extra_file_touches = Vec::new();
    let mut opts = AddOpts {
        is_error: result_error,
        ..Default::default()
    };

    let (summary, data) = match category {
        ToolCategory::Shell => {
            let command = arg_str(args, &["command", "cmd", "script"])
                .unwrap_or_else(|| inv.name.clone());
            let exit_code = result.and_then(parse_exit_code);
            let errored = result_error || exit_code.is_some_and(|c| c != 0);
            opts.is_error = errored;
            extra_file_touches = shell_write_targets(&command);
            let sample = ToolSample::Shell {
                command: truncate_str(&command, TEXT_FIELD_CAP),
                exit_code,
                stdout_tail: result.and_then(|r| stdout_tail(r, 5)),
                errored,
            };
            (truncate_str(&command, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Read => {
            let file_path = arg_str(args, &["file_path", "path", "file", "target_file"])
                .unwrap_or_default();
            let sample = ToolSample::Read {
                file_path: truncate_str(&file_path, TEXT_FIELD_CAP),
                line_start: arg_u64(args, &["offset", "start_line", "line_start"]),
                line_end: arg_u64(args, &["limit", "end_line", "line_end"]),
            };
            (truncate_str(&file_path, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Write => {
            let file_path = arg_str(args, &["file_path", "path", "file", "target_file"])
                .unwrap_or_default();
            let content = arg_str(args, &["content", "contents", "text", "code"]);
            let old = arg_str(args, &["old_content", "original"]);
            let (diff, stats, is_new_file) = match (old.as_deref(), content.as_deref()) {
                (Some(old), Some(new)) => {
                    let (d, s) = unified_diff(old, new, &file_path);
                    (Some(d), Some(s), false)
                }
                (None, Some(new)) => {
                    let (d, s) = new_file_diff(new, &file_path);
                    (Some(d), Some(s), true)
                }
                _ => (None, None, true),
            };
            opts.is_write = true;
            opts.file_path = Some(file_path.clone());
            let sample = ToolSample::Write {
                file_path: truncate_str(&file_path, TEXT_FIELD_CAP),
                is_new_file,
                diff,
                diff_stats: stats,
            };
            (truncate_str(&file_path, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Edit => {
            let file_path = arg_str(args, &["file_path", "path", "file", "target_file"])
                .unwrap_or_default();
            let old = arg_str(args, &["old_string", "old_str", "oldText", "old_text"]);
            let new = arg_str(args, &["new_string", "new_str", "newText", "new_text"]);
            let (diff, stats) = match (old.as_deref(), new.as_deref()) {
                (Some(old), Some(new)) => {
                    let (d, s) = unified_diff(old, new, &file_path);
                    (Some(d), Some(s))
                }
                _ => (None, None),
            };
            opts.is_write = true;
            opts.file_path = Some(file_path.clone());
            let sample = ToolSample::Edit {
                file_path: truncate_str(&file_path, TEXT_FIELD_CAP),
                diff,
                diff_stats: stats,
            };
            (truncate_str(&file_path, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Grep => {
            let pattern = arg_str(args, &["pattern", "query", "regex"]).unwrap_or_default();
            let sample = ToolSample::Grep {
                pattern: truncate_str(&pattern, TEXT_FIELD_CAP),
                target_path: arg_str(args, &["path", "include", "glob"])
                    .map(|p| truncate_str(&p, TEXT_FIELD_CAP)),
                match_count: result.and_then(parse_match_count),
            };
            (truncate_str(&pattern, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Glob => {
            let pattern = arg_str(args, &["pattern", "glob", "query"]).unwrap_or_default();
            let sample = ToolSample::Glob {
                pattern: truncate_str(&pattern, TEXT_FIELD_CAP),
                result_count: result.and_then(parse_match_count),
            };
            (truncate_str(&pattern, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Search => {
            let query = arg_str(args, &["query", "q", "search_term", "prompt"])
                .unwrap_or_default();
            let sample = ToolSample::Search {
                query: truncate_str(&query, TEXT_FIELD_CAP),
            };
            (truncate_str(&query, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Fetch => {
            let url = arg_str(args, &["url", "uri", "link"]).unwrap_or_default();
            let sample = ToolSample::Fetch {
                url: truncate_str(&url, TEXT_FIELD_CAP),
                result_preview: result.map(|r| truncate_str(r.trim(), TEXT_FIELD_CAP)),
            };
            (truncate_str(&url, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Task => {
            let description = arg_str(args, &["description", "prompt", "task"])
                .unwrap_or_else(|| inv.name.clone());
            let sample = ToolSample::Task {
                description: truncate_str(&description, TEXT_FIELD_CAP),
                agent_type: arg_str(args, &["subagent_type", "agent_type", "agent"])
                    .map(|a| truncate_str(&a, TEXT_FIELD_CAP)),
                result_summary: result.map(|r| truncate_str(r.trim(), TEXT_FIELD_CAP)),
            };
            (truncate_str(&description, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Ask => {
            let question = arg_str(args, &["question", "prompt", "message"])
                .or_else(|| first_question(args))
                .unwrap_or_default();
            let sample = ToolSample::Ask {
                question: truncate_str(&question, TEXT_FIELD_CAP),
            };
            (truncate_str(&question, TEXT_FIELD_CAP), Some(sample))
        }
        ToolCategory::Mcp | ToolCategory::Skip => {
            let params = if args.is_null() {
                None
            } else {
                serde_json::to_string(args)
                    .ok()
                    .map(|p| truncate_str(&p, TEXT_FIELD_CAP))
            };
            let sample = ToolSample::Mcp {
                tool_name: truncate_str(&inv.name, TEXT_FIELD_CAP),
                params,
                result: result.map(|r| truncate_str(r.trim(), TEXT_FIELD_CAP)),
            };
            (truncate_str(&inv.name, TEXT_FIELD_CAP), Some(sample))
        }
    };

    opts.data = data;
    CapturedSample {
        summary,
        opts,
        extra_file_touches,
    }
}

/// Pull the first matching string argument out of a raw argument map.
fn arg_str(args: &Value, keys: &[&str]) -> Option<String> {
    let map = args.as_object()?;
    keys.iter().find_map(|key| {
        map.get(*key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    })
}

fn arg_u64(args: &Value, keys: &[&str]) -> Option<u64> {
    let map = args.as_object()?;
    keys.iter().find_map(|key| map.get(*key).and_then(|v| v.as_u64()))
}

fn first_question(args: &Value) -> Option<String> {
    let questions = args.as_object()?.get("questions")?.as_array()?;
    questions.iter().find_map(|q| {
        q.as_str()
            .map(String::from)
            .or_else(|| q.get("question").and_then(|v| v.as_str()).map(String::from))
    })
}

/// Incomplete todo entries from bookkeeping tool arguments. These never
/// become tool summaries but do surface as pending tasks.
fn collect_pending_tasks(args: &Value, out: &mut Vec<String>) {
    let Some(todos) = args.get("todos").and_then(|v| v.as_array()) else {
        return;
    };
    for todo in todos {
        let status = todo.get("status").and_then(|v| v.as_str()).unwrap_or("");
        if status == "completed" {
            continue;
        }
        let text = todo
            .get("content")
            .or_else(|| todo.get("task"))
            .or_else(|| todo.get("title"))
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(text) = text {
            let text = truncate_str(text, TEXT_FIELD_CAP);
            if !out.iter().any(|t| t == &text) {
                out.push(text);
            }
        }
    }
}

/// Build session notes: model, token accounting, and reasoning highlights.
///
/// Each highlight is the first sentence of a thinking block, capped at 5
/// entries of 200 chars each.
pub fn extract_notes(record: &SessionRecord) -> SessionNotes {
    let reasoning = record
        .thinking
        .iter()
        .map(|block| first_sentence(block))
        .filter(|s| !s.is_empty())
        .map(|s| truncate_str(&s, REASONING_ENTRY_CAP))
        .take(REASONING_CAP)
        .collect();

    SessionNotes {
        model: record.meta.model.clone(),
        token_usage: record.token_usage,
        cache_tokens: record.cache_tokens,
        thinking_tokens: record.thinking_tokens,
        reasoning,
    }
}

/// Extract the full handoff aggregate for one session and render its
/// Markdown document. The result is owned by the caller and never mutated
/// here afterwards.
pub fn extract_handoff(record: &SessionRecord, mode: RenderMode) -> SessionHandoff {
    let lookup = build_result_lookup(&record.results);
    let (tool_summaries, files_modified, pending_tasks) =
        fold_invocations(&record.invocations, &lookup);

    let notes = extract_notes(record);
    let notes = if notes.is_empty() { None } else { Some(notes) };

    let recent_start = record.messages.len().saturating_sub(RECENT_MESSAGE_CAP);
    let recent_messages: Vec<_> = record.messages[recent_start..].to_vec();

    let markdown = render(
        &record.meta,
        &recent_messages,
        &files_modified,
        &pending_tasks,
        &tool_summaries,
        notes.as_ref(),
        mode,
    );

    SessionHandoff {
        meta: record.meta.clone(),
        recent_messages,
        files_modified,
        pending_tasks,
        tool_summaries,
        notes,
        markdown,
    }
}

/// Accounting helper used by properties/tests: total non-skip invocations.
pub fn non_skip_count(invocations: &[ToolInvocation]) -> usize {
    invocations
        .iter()
        .filter(|inv| classify(&inv.name) != ToolCategory::Skip)
        .count()
}
