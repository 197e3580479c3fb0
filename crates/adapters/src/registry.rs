//! Adapter lookup plus the startup completeness check.

use std::collections::HashMap;
use std::sync::Arc;

use baton_core::Error;

use crate::builtin;
use crate::{ToolAdapter, KNOWN_TOOLS};

/// Map from tool slug to adapter. Holds no other state and does no I/O;
/// sessions are only touched when an adapter method runs.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<&'static str, Arc<dyn ToolAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every builtin adapter registered.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(builtin::ClaudeCodeAdapter));
        registry.register(Arc::new(builtin::CodexAdapter));
        registry.register(Arc::new(builtin::GeminiAdapter));
        registry.register(Arc::new(builtin::CopilotAdapter));
        registry.register(Arc::new(builtin::CursorAgentAdapter));
        registry.register(Arc::new(builtin::OpenCodeAdapter));
        registry.register(Arc::new(builtin::DroidAdapter));
        registry
    }

    /// Register an adapter under its own slug. Last registration wins,
    /// so a custom adapter can shadow a builtin.
    pub fn register(&mut self, adapter: Arc<dyn ToolAdapter>) {
        self.adapters.insert(adapter.name(), adapter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolAdapter>> {
        self.adapters.get(name).cloned()
    }

    /// Registered slugs in a stable order.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.adapters.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Every slug in [`KNOWN_TOOLS`] must have an adapter. Run before any
    /// command executes so a newly added tool cannot ship without one.
    pub fn verify_complete(&self) -> Result<(), Error> {
        let missing: Vec<String> = KNOWN_TOOLS
            .iter()
            .filter(|name| !self.adapters.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingAdapters { names: missing })
        }
    }
}
