use thiserror::Error;

/// Error taxonomy shared across the workspace.
///
/// `Parse` is always recoverable by skipping the offending unit; it never
/// aborts a whole session or index build. `Index`/`Storage` degrade to an
/// empty index rather than crashing the host.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse {path}: {detail}")]
    Parse { path: String, detail: String },

    #[error("tool binary not found on PATH: {binary}")]
    ToolNotAvailable { binary: String },

    #[error("session not found: {id}")]
    SessionNotFound { id: String },

    #[error("unknown source tool: {name}")]
    UnknownSource { name: String },

    #[error("session index error: {0}")]
    Index(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("no adapter registered for known tools: {}", names.join(", "))]
    MissingAdapters { names: Vec<String> },
}

impl Error {
    pub fn parse(path: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Error::Parse {
            path: path.into(),
            detail: detail.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_adapters_names_in_message() {
        let err = Error::MissingAdapters {
            names: vec!["droid".to_string(), "opencode".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("droid"));
        assert!(msg.contains("opencode"));
    }

    #[test]
    fn test_parse_helper() {
        let err = Error::parse("sessions/a.json", "unexpected EOF");
        assert!(err.to_string().contains("sessions/a.json"));
        assert!(err.to_string().contains("unexpected EOF"));
    }
}
