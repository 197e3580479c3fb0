//! Cross-tool session index built concurrently, one task per adapter.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use baton_core::SessionMeta;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::warn;

use crate::AdapterRegistry;

/// One indexed session, enough to list and resume it without re-reading
/// the export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionIndexEntry {
    pub tool: String,
    pub meta: SessionMeta,
    pub message_count: usize,
    pub invocation_count: usize,
}

/// Index every adapter's exports under `root` concurrently.
///
/// Each adapter runs in its own task and reads `<root>/<slug>/`. A failing
/// adapter logs a warning and contributes nothing; the others are
/// unaffected. Within one build, a session id seen twice for the same tool
/// keeps the later record. Output order is stable: by tool slug, then
/// session id.
pub async fn build_index(registry: &AdapterRegistry, root: &Path) -> Vec<SessionIndexEntry> {
    let mut set = JoinSet::new();
    for name in registry.names() {
        let Some(adapter) = registry.get(name) else {
            continue;
        };
        let dir: PathBuf = root.join(name);
        set.spawn(async move { index_one_tool(adapter, &dir) });
    }

    let mut by_key: HashMap<(String, String), SessionIndexEntry> = HashMap::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(entries) => {
                for entry in entries {
                    let key = (entry.tool.clone(), entry.meta.session_id.clone());
                    by_key.insert(key, entry);
                }
            }
            Err(e) => warn!(error = %e, "index task panicked; dropping its sessions"),
        }
    }

    let mut entries: Vec<SessionIndexEntry> = by_key.into_values().collect();
    entries.sort_by(|a, b| {
        (a.tool.as_str(), a.meta.session_id.as_str())
            .cmp(&(b.tool.as_str(), b.meta.session_id.as_str()))
    });
    entries
}

fn index_one_tool(adapter: Arc<dyn crate::ToolAdapter>, dir: &Path) -> Vec<SessionIndexEntry> {
    match adapter.parse_sessions(dir) {
        Ok(records) => records
            .into_iter()
            .map(|record| SessionIndexEntry {
                tool: adapter.name().to_string(),
                message_count: record.messages.len(),
                invocation_count: record.invocations.len(),
                meta: record.meta,
            })
            .collect(),
        Err(e) => {
            warn!(tool = adapter.name(), error = %e, "indexing failed for one source");
            Vec::new()
        }
    }
}
