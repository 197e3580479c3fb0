use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use baton_adapters::{build_index, AdapterRegistry, SessionIndexEntry};
use tracing::warn;

use crate::config::{data_dir, BatonConfig};

/// Run the index command: list every known session across tools, from the
/// on-disk cache when it is fresh, rebuilding it otherwise.
pub async fn run_index(
    registry: &AdapterRegistry,
    config: &BatonConfig,
    root: Option<&Path>,
    refresh: bool,
) -> Result<()> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => config.index_root()?,
    };
    let cache_path = data_dir()?.join("index.json");
    let ttl = Duration::from_secs(config.index.ttl_secs);

    let cached = if refresh {
        None
    } else {
        load_fresh_cache(&cache_path, ttl)
    };
    let entries = match cached {
        Some(entries) => entries,
        None => {
            let entries = build_index(registry, &root).await;
            if let Err(e) = write_cache(&cache_path, &entries) {
                warn!(error = %e, "failed to write index cache; continuing without it");
            }
            entries
        }
    };

    if entries.is_empty() {
        println!("No sessions found under {}", root.display());
        return Ok(());
    }
    for entry in &entries {
        let title = entry.meta.title.as_deref().unwrap_or("(untitled)");
        println!(
            "{:<14} {:<24} {:>4} msgs  {}",
            entry.tool, entry.meta.session_id, entry.message_count, title
        );
    }
    Ok(())
}

/// The cached entries when the cache is fresh and readable, `None`
/// otherwise. A fresh but unreadable or corrupt cache is not fatal; the
/// index degrades to a rebuild.
fn load_fresh_cache(path: &Path, ttl: Duration) -> Option<Vec<SessionIndexEntry>> {
    if !cache_is_fresh(path, ttl) {
        return None;
    }
    match read_cache(path) {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!(error = %e, "index cache unreadable; rebuilding");
            None
        }
    }
}

fn cache_is_fresh(path: &Path, ttl: Duration) -> bool {
    let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age < ttl)
        .unwrap_or(false)
}

fn read_cache(path: &Path) -> Result<Vec<SessionIndexEntry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read index cache at {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse index cache at {}", path.display()))
}

/// Rewrite the cache wholesale: serialize to a sibling temp file, then
/// rename over the old cache so readers never see a partial write.
/// Concurrent builds race benignly; the last writer wins.
fn write_cache(path: &Path, entries: &[SessionIndexEntry]) -> Result<()> {
    let dir = path
        .parent()
        .context("Index cache path has no parent directory")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data dir at {}", dir.display()))?;
    let tmp: PathBuf = path.with_extension("json.tmp");
    let text = serde_json::to_string_pretty(entries).context("Failed to serialize index")?;
    std::fs::write(&tmp, text)
        .with_context(|| format!("Failed to write index cache at {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace index cache at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use baton_core::SessionMeta;

    fn entry(tool: &str, id: &str) -> SessionIndexEntry {
        SessionIndexEntry {
            tool: tool.to_string(),
            meta: SessionMeta::new(tool, id),
            message_count: 0,
            invocation_count: 0,
        }
    }

    #[test]
    fn test_cache_roundtrip_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        write_cache(&path, &[entry("codex", "a"), entry("gemini", "b")]).unwrap();
        assert_eq!(read_cache(&path).unwrap().len(), 2);

        write_cache(&path, &[entry("codex", "a")]).unwrap();
        let entries = read_cache(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].meta.session_id, "a");
    }

    #[test]
    fn test_missing_cache_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!cache_is_fresh(
            &dir.path().join("absent.json"),
            Duration::from_secs(300)
        ));
    }

    #[test]
    fn test_corrupt_fresh_cache_degrades_to_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "{corrupt").unwrap();
        // Fresh by mtime, unreadable by content: not fatal, just stale.
        assert!(cache_is_fresh(&path, Duration::from_secs(300)));
        assert!(load_fresh_cache(&path, Duration::from_secs(300)).is_none());
    }

    #[test]
    fn test_valid_fresh_cache_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        write_cache(&path, &[entry("codex", "a")]).unwrap();
        let entries = load_fresh_cache(&path, Duration::from_secs(300)).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(load_fresh_cache(&path, Duration::ZERO).is_none());
    }

    #[test]
    fn test_fresh_cache_within_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        write_cache(&path, &[]).unwrap();
        assert!(cache_is_fresh(&path, Duration::from_secs(300)));
        assert!(!cache_is_fresh(&path, Duration::ZERO));
    }
}
