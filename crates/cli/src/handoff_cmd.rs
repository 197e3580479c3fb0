use std::path::Path;

use anyhow::{Context, Result};
use baton_context::extract::extract_handoff;
use baton_context::render::RenderMode;
use baton_core::SessionRecord;

/// Run the handoff command: read one normalized session export, extract
/// its context, and emit the handoff markdown.
pub fn run_handoff(file: &Path, mode: RenderMode, output: Option<&Path>) -> Result<()> {
    if !file.exists() {
        return Err(baton_core::Error::SessionNotFound {
            id: file.display().to_string(),
        }
        .into());
    }
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read session at {}", file.display()))?;
    let record: SessionRecord = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse session at {}", file.display()))?;

    let handoff = extract_handoff(&record, mode);

    match output {
        Some(path) => {
            std::fs::write(path, &handoff.markdown)
                .with_context(|| format!("Failed to write handoff to {}", path.display()))?;
            println!("Wrote handoff for session {} to {}", record.meta.session_id, path.display());
        }
        None => print!("{}", handoff.markdown),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use baton_core::SessionMeta;

    #[test]
    fn test_run_handoff_writes_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let record = SessionRecord::new(SessionMeta::new("codex", "s-1"));
        let session_path = dir.path().join("s-1.json");
        std::fs::write(&session_path, serde_json::to_string(&record).unwrap()).unwrap();

        let out_path = dir.path().join("handoff.md");
        run_handoff(&session_path, RenderMode::Inline, Some(&out_path)).unwrap();

        let markdown = std::fs::read_to_string(&out_path).unwrap();
        assert!(markdown.starts_with("# Session Handoff Context"));
        assert!(markdown.contains("You are continuing this session"));
    }

    #[test]
    fn test_run_handoff_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{nope").unwrap();
        assert!(run_handoff(&path, RenderMode::Inline, None).is_err());
    }

    #[test]
    fn test_run_handoff_reports_missing_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-session.json");
        let err = run_handoff(&path, RenderMode::Inline, None).unwrap_err();
        assert!(err.to_string().contains("session not found"));
    }
}
