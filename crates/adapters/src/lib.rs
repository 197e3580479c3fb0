//! Per-tool adapters and the registry that binds them together.
//!
//! An adapter connects one agent CLI to the shared pipeline: reading its
//! exported sessions, extracting handoff context, building resume command
//! lines, and mapping forwarded launch flags. The registry enforces at
//! startup that every known tool has an adapter, so adding a tool slug
//! without wiring an adapter fails loudly instead of shipping a gap.

pub mod builtin;
pub mod index;
pub mod registry;

use std::path::Path;

use baton_context::render::RenderMode;
use baton_core::{Error, SessionHandoff, SessionRecord};
use baton_forward::{FlagScan, ForwardResolution};

pub use index::{build_index, SessionIndexEntry};
pub use registry::AdapterRegistry;

/// Every tool slug the registry must cover. `verify_complete` checks the
/// registered set against this list.
pub const KNOWN_TOOLS: [&str; 7] = [
    "claude-code",
    "codex",
    "gemini",
    "copilot",
    "cursor-agent",
    "opencode",
    "droid",
];

/// One agent CLI's integration surface.
pub trait ToolAdapter: Send + Sync {
    /// Tool slug, e.g. "claude-code". Must match an entry in [`KNOWN_TOOLS`].
    fn name(&self) -> &'static str;

    /// Human-readable name for listings.
    fn label(&self) -> &'static str;

    /// Executable name on PATH.
    fn binary_name(&self) -> &'static str;

    /// Read every normalized session export under the tool's directory.
    /// Malformed files are skipped with a warning, not fatal.
    fn parse_sessions(&self, dir: &Path) -> Result<Vec<SessionRecord>, Error>;

    /// Extract a handoff from one session. The default pipeline suits every
    /// current tool; an adapter overrides this only when its sessions need
    /// tool-specific shaping first.
    fn extract_context(&self, record: &SessionRecord, mode: RenderMode) -> SessionHandoff {
        baton_context::extract::extract_handoff(record, mode)
    }

    /// Arguments that resume the tool's own session natively.
    fn native_resume_args(&self, session_id: &str) -> Vec<String>;

    /// Arguments that start a fresh session seeded with a handoff document.
    fn cross_tool_args(&self, handoff_path: &Path) -> Vec<String>;

    /// The full resume command line as shown to the user.
    fn resume_command_display(&self, session_id: &str) -> String {
        let mut parts = vec![self.binary_name().to_string()];
        parts.extend(self.native_resume_args(session_id));
        parts.join(" ")
    }

    /// Map forwarded launch flags to this tool's flags. `None` means the
    /// tool takes no mapped flags and the host passes everything through.
    fn map_handoff_flags(&self, scan: &mut FlagScan) -> Option<ForwardResolution> {
        let _ = scan;
        None
    }
}
