use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sample::ToolUsageSummary;

/// Who sent a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    /// Display label used in rendered Markdown headings.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
            Role::Tool => "Tool",
        }
    }
}

/// Reference to a tool invocation made within a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
}

/// A single conversation message, produced by an external per-format reader.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRef>,
}

/// A raw tool invocation record: tool name plus whatever argument map the
/// source format carried, and the result text if the reader matched one up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default)]
    pub is_error: bool,
}

/// Session metadata, as much as the source format exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Source tool slug, e.g. "claude-code", "codex".
    pub source: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

impl SessionMeta {
    pub fn new(source: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            session_id: session_id.into(),
            title: None,
            cwd: None,
            repo: None,
            branch: None,
            model: None,
            last_active: None,
        }
    }
}

/// A tool result the reader could not attach to its invocation in place.
/// Extraction joins these back by `call_id` before folding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultRecord {
    pub call_id: String,
    pub content: String,
    #[serde(default)]
    pub is_error: bool,
}

/// The normalized on-disk unit: one recorded session from one tool,
/// already field-mapped out of the tool's native schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub meta: SessionMeta,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    #[serde(default)]
    pub invocations: Vec<ToolInvocation>,
    /// Results some formats record as separate events instead of in place.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ToolResultRecord>,
    /// Raw thinking/reasoning blocks, when the source format records them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thinking: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_tokens: Option<u64>,
}

impl SessionRecord {
    pub fn new(meta: SessionMeta) -> Self {
        Self {
            meta,
            messages: Vec::new(),
            invocations: Vec::new(),
            results: Vec::new(),
            thinking: Vec::new(),
            token_usage: None,
            cache_tokens: None,
            thinking_tokens: None,
        }
    }
}

/// Token accounting for a session, when the source reports it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

/// Optional session-level notes: model, token usage, reasoning highlights.
///
/// `reasoning` holds at most 5 entries of at most 200 chars each — the first
/// sentence of a thinking block, not the whole block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionNotes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_usage: Option<TokenUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasoning: Vec<String>,
}

impl SessionNotes {
    pub fn is_empty(&self) -> bool {
        self.model.is_none()
            && self.token_usage.is_none()
            && self.cache_tokens.is_none()
            && self.thinking_tokens.is_none()
            && self.reasoning.is_empty()
    }
}

/// The aggregate extraction result for one session: bounded summaries plus
/// the rendered Markdown handoff document. Built once per extraction call
/// and never mutated afterwards; owned by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SessionHandoff {
    pub meta: SessionMeta,
    /// Last messages, at most 10, content truncated per entry by the renderer.
    pub recent_messages: Vec<ConversationMessage>,
    /// Deduplicated, insertion order.
    pub files_modified: Vec<String>,
    /// At most 5.
    pub pending_tasks: Vec<String>,
    pub tool_summaries: Vec<ToolUsageSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<SessionNotes>,
    pub markdown: String,
}
