//! Raw tool-name classification.
//!
//! Tool names arrive as arbitrary strings from ~14 source ecosystems.
//! Classification is driven by static per-category name sets, with two
//! fallbacks: MCP-looking names (`mcp__`, `___`, or a `-`) classify as
//! [`ToolCategory::Mcp`], and anything else unrecognized also lands in
//! `Mcp` as a generic "unknown tool call" bucket — no invocation is
//! silently dropped.

use baton_core::ToolCategory;

/// Map a raw tool name to its category.
pub fn classify(raw_name: &str) -> ToolCategory {
    let lower = raw_name.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return ToolCategory::Mcp;
    }

    if matches!(
        lower.as_str(),
        "todowrite"
            | "todoread"
            | "todo_write"
            | "todo_read"
            | "update_todo_list"
            | "todo"
            | "exitplanmode"
            | "exit_plan_mode"
            | "update_plan"
    ) {
        return ToolCategory::Skip;
    }
    if matches!(
        lower.as_str(),
        "bash" | "shell" | "exec" | "exec_command" | "run_terminal_cmd" | "execute_command"
            | "terminal" | "local_shell" | "run_command" | "run_shell_command"
    ) {
        return ToolCategory::Shell;
    }
    if matches!(
        lower.as_str(),
        "read" | "read_file" | "readfile" | "view" | "cat" | "open" | "open_file"
            | "notebookread" | "view_file"
    ) {
        return ToolCategory::Read;
    }
    if matches!(
        lower.as_str(),
        "write" | "write_file" | "writefile" | "create_file" | "save_file" | "add_file"
            | "create"
    ) {
        return ToolCategory::Write;
    }
    if matches!(
        lower.as_str(),
        "edit" | "multiedit" | "edit_file" | "str_replace_editor" | "str_replace"
            | "apply_patch" | "applypatch" | "replace" | "update_file" | "notebookedit"
            | "patch" | "reapply"
    ) {
        return ToolCategory::Edit;
    }
    if matches!(
        lower.as_str(),
        "grep" | "grep_search" | "search_file_content" | "code_search" | "rg" | "ripgrep"
    ) {
        return ToolCategory::Grep;
    }
    if matches!(
        lower.as_str(),
        "glob" | "find_files" | "file_search" | "glob_file_search" | "find"
    ) {
        return ToolCategory::Glob;
    }
    if matches!(
        lower.as_str(),
        "websearch" | "web_search" | "search_web" | "google_web_search" | "search"
    ) {
        return ToolCategory::Search;
    }
    if matches!(
        lower.as_str(),
        "webfetch" | "web_fetch" | "fetch" | "fetch_url" | "read_url" | "curl" | "browser"
    ) {
        return ToolCategory::Fetch;
    }
    if matches!(
        lower.as_str(),
        "task" | "agent" | "subagent" | "spawn_agent" | "dispatch_agent" | "delegate"
    ) {
        return ToolCategory::Task;
    }
    if matches!(
        lower.as_str(),
        "askuserquestion" | "ask_user" | "ask" | "ask_followup_question" | "request_user_input"
            | "ask_question"
    ) {
        return ToolCategory::Ask;
    }

    // MCP-style names, and everything else we don't recognize.
    ToolCategory::Mcp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_common_names() {
        assert_eq!(classify("Bash"), ToolCategory::Shell);
        assert_eq!(classify("run_terminal_cmd"), ToolCategory::Shell);
        assert_eq!(classify("Read"), ToolCategory::Read);
        assert_eq!(classify("Write"), ToolCategory::Write);
        assert_eq!(classify("str_replace_editor"), ToolCategory::Edit);
        assert_eq!(classify("Grep"), ToolCategory::Grep);
        assert_eq!(classify("Glob"), ToolCategory::Glob);
        assert_eq!(classify("WebSearch"), ToolCategory::Search);
        assert_eq!(classify("WebFetch"), ToolCategory::Fetch);
        assert_eq!(classify("Task"), ToolCategory::Task);
        assert_eq!(classify("AskUserQuestion"), ToolCategory::Ask);
    }

    #[test]
    fn test_classify_bookkeeping_tools_skip() {
        assert_eq!(classify("TodoWrite"), ToolCategory::Skip);
        assert_eq!(classify("update_todo_list"), ToolCategory::Skip);
        assert_eq!(classify("ExitPlanMode"), ToolCategory::Skip);
    }

    #[test]
    fn test_classify_mcp_fallbacks() {
        assert_eq!(classify("mcp__github__create_issue"), ToolCategory::Mcp);
        assert_eq!(classify("server___list_tables"), ToolCategory::Mcp);
        assert_eq!(classify("custom-tool"), ToolCategory::Mcp);
    }

    #[test]
    fn test_classify_unknown_never_dropped() {
        assert_eq!(classify("SomeBrandNewTool"), ToolCategory::Mcp);
        assert_eq!(classify(""), ToolCategory::Mcp);
    }
}
