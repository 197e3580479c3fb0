//! The seven builtin adapters.
//!
//! Native session formats are read by external exporters that write
//! normalized `SessionRecord` JSON under `<root>/<tool-slug>/*.json`; every
//! builtin adapter consumes that layout. What differs per tool is the
//! resume surface: binary name, resume arguments, and how a handoff
//! document is fed to a fresh session.

use std::path::Path;

use baton_core::{Error, SessionRecord};
use baton_forward::{resolve_for_tool, FlagScan, ForwardResolution};
use tracing::warn;

use crate::ToolAdapter;

/// Read every `*.json` normalized session export under `dir`.
///
/// A missing directory is an empty tool, not an error. A file that fails
/// to parse is skipped with a warning so one corrupt export cannot hide
/// the rest.
fn read_normalized_sessions(dir: &Path) -> Result<Vec<SessionRecord>, Error> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let pattern = format!("{}/*.json", dir.display());
    let paths = glob::glob(&pattern)
        .map_err(|e| Error::Index(format!("bad session glob {pattern}: {e}")))?;

    let mut records = Vec::new();
    for path in paths.filter_map(Result::ok) {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                let err = Error::Storage(e);
                warn!(path = %path.display(), %err, "skipping unreadable session export");
                continue;
            }
        };
        match serde_json::from_str::<SessionRecord>(&text) {
            Ok(record) => records.push(record),
            Err(e) => {
                let err = Error::parse(path.display().to_string(), e);
                warn!(%err, "skipping malformed session export");
            }
        }
    }
    Ok(records)
}

fn handoff_prompt(handoff_path: &Path) -> String {
    format!(
        "Read the handoff document at {} and continue that session.",
        handoff_path.display()
    )
}

pub struct ClaudeCodeAdapter;

impl ToolAdapter for ClaudeCodeAdapter {
    fn name(&self) -> &'static str {
        "claude-code"
    }

    fn label(&self) -> &'static str {
        "Claude Code"
    }

    fn binary_name(&self) -> &'static str {
        "claude"
    }

    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error> {
        read_normalized_sessions(dir)
    }

    fn native_resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["--resume".to_string(), session_id.to_string()]
    }

    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String> {
        vec![handoff_prompt(handoff_path)]
    }

    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        resolve_for_tool(self.name(), scan)
    }
}

pub struct CodexAdapter;

impl ToolAdapter for CodexAdapter {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn label(&self) -> &'static str {
        "Codex CLI"
    }

    fn binary_name(&self) -> &'static str {
        "codex"
    }

    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error> {
        read_normalized_sessions(dir)
    }

    fn native_resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["resume".to_string(), session_id.to_string()]
    }

    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String> {
        vec![handoff_prompt(handoff_path)]
    }

    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        resolve_for_tool(self.name(), scan)
    }
}

pub struct GeminiAdapter;

impl ToolAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn label(&self) -> &'static str {
        "Gemini CLI"
    }

    fn binary_name(&self) -> &'static str {
        "gemini"
    }

    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error> {
        read_normalized_sessions(dir)
    }

    fn native_resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["--resume".to_string(), session_id.to_string()]
    }

    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String> {
        vec!["--prompt-interactive".to_string(), handoff_prompt(handoff_path)]
    }

    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        resolve_for_tool(self.name(), scan)
    }
}

pub struct CopilotAdapter;

impl ToolAdapter for CopilotAdapter {
    fn name(&self) -> &'static str {
        "copilot"
    }

    fn label(&self) -> &'static str {
        "GitHub Copilot CLI"
    }

    fn binary_name(&self) -> &'static str {
        "copilot"
    }

    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error> {
        read_normalized_sessions(dir)
    }

    fn native_resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["--resume".to_string(), session_id.to_string()]
    }

    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String> {
        vec!["--prompt".to_string(), handoff_prompt(handoff_path)]
    }

    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        resolve_for_tool(self.name(), scan)
    }
}

pub struct CursorAgentAdapter;

impl ToolAdapter for CursorAgentAdapter {
    fn name(&self) -> &'static str {
        "cursor-agent"
    }

    fn label(&self) -> &'static str {
        "Cursor Agent"
    }

    fn binary_name(&self) -> &'static str {
        "cursor-agent"
    }

    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error> {
        read_normalized_sessions(dir)
    }

    fn native_resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["--resume".to_string(), session_id.to_string()]
    }

    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String> {
        vec![handoff_prompt(handoff_path)]
    }

    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        resolve_for_tool(self.name(), scan)
    }
}

pub struct OpenCodeAdapter;

impl ToolAdapter for OpenCodeAdapter {
    fn name(&self) -> &'static str {
        "opencode"
    }

    fn label(&self) -> &'static str {
        "OpenCode"
    }

    fn binary_name(&self) -> &'static str {
        "opencode"
    }

    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error> {
        read_normalized_sessions(dir)
    }

    fn native_resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["--session".to_string(), session_id.to_string()]
    }

    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String> {
        vec!["run".to_string(), handoff_prompt(handoff_path)]
    }

    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        resolve_for_tool(self.name(), scan)
    }
}

pub struct DroidAdapter;

impl ToolAdapter for DroidAdapter {
    fn name(&self) -> &'static str {
        "droid"
    }

    fn label(&self) -> &'static str {
        "Factory Droid"
    }

    fn binary_name(&self) -> &'static str {
        "droid"
    }

    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error> {
        read_normalized_sessions(dir)
    }

    fn native_resume_args(&self, session_id: &str) -> Vec<String> {
        vec!["--session".to_string(), session_id.to_string()]
    }

    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String> {
        vec![handoff_prompt(handoff_path)]
    }

    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        resolve_for_tool(self.name(), scan)
    }
}
