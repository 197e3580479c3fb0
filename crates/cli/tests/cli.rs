//! End-to-end tests against the built binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn baton(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_baton"))
        .args(args)
        .env("HOME", home)
        .output()
        .expect("failed to run baton")
}

fn baton_with_path(home: &Path, path_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_baton"))
        .args(args)
        .env("HOME", home)
        .env("PATH", path_dir)
        .output()
        .expect("failed to run baton")
}

/// Drop a stub tool binary into `$HOME/bin` so the launch-flag resolver
/// sees it on PATH.
fn stub_binary(home: &Path, name: &str) -> PathBuf {
    let bin = home.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join(name), "#!/bin/sh\n").unwrap();
    bin
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn tools_lists_every_adapter() {
    let home = tempfile::tempdir().unwrap();
    let output = baton(home.path(), &["tools"]);
    assert!(output.status.success());
    let listing = stdout(&output);
    for slug in [
        "claude-code",
        "codex",
        "gemini",
        "copilot",
        "cursor-agent",
        "opencode",
        "droid",
    ] {
        assert!(listing.contains(slug), "missing {slug} in:\n{listing}");
    }
}

#[test]
fn handoff_renders_markdown_from_session_file() {
    let home = tempfile::tempdir().unwrap();
    let session = serde_json::json!({
        "meta": {"source": "codex", "session_id": "s-e2e", "cwd": "/work"},
        "messages": [
            {"role": "user", "content": "add retry logic to the fetcher"}
        ],
        "invocations": [
            {"name": "Bash", "arguments": {"command": "cargo check"}}
        ]
    });
    let path = home.path().join("s-e2e.json");
    std::fs::write(&path, session.to_string()).unwrap();

    let output = baton(home.path(), &["handoff", path.to_str().unwrap()]);
    assert!(output.status.success());
    let md = stdout(&output);
    assert!(md.starts_with("# Session Handoff Context"));
    assert!(md.contains("| **Session ID** | `s-e2e` |"));
    assert!(md.contains("### Shell (1 calls)"));
    assert!(md.contains("add retry logic to the fetcher"));
    assert!(md.contains("You are continuing this session"));
}

#[test]
fn forward_resolves_codex_auto_approve() {
    let home = tempfile::tempdir().unwrap();
    let bin = stub_binary(home.path(), "codex");
    let output = baton_with_path(
        home.path(),
        &bin,
        &["forward", "codex", "--yolo", "--full-auto", "--model", "o3"],
    );
    assert!(output.status.success());
    let command = stdout(&output);
    assert!(command.contains("codex --dangerously-bypass-approvals-and-sandbox --model o3"));
    assert!(!command.contains("--full-auto"));
    let warnings = String::from_utf8_lossy(&output.stderr);
    assert!(warnings.contains("full-auto"));
}

#[test]
fn forward_rejects_unknown_tool() {
    let home = tempfile::tempdir().unwrap();
    let output = baton(home.path(), &["forward", "not-a-tool", "--yolo"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not-a-tool"));
}

#[test]
fn forward_aborts_when_tool_binary_is_missing() {
    let home = tempfile::tempdir().unwrap();
    let empty_bin = home.path().join("bin");
    std::fs::create_dir_all(&empty_bin).unwrap();
    let output = baton_with_path(home.path(), &empty_bin, &["forward", "codex", "--yolo"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tool binary not found on PATH: codex"), "{stderr}");
}

#[test]
fn index_rebuilds_when_fresh_cache_is_corrupt() {
    let home = tempfile::tempdir().unwrap();
    let root = home.path().join("exports");
    let codex_dir = root.join("codex");
    std::fs::create_dir_all(&codex_dir).unwrap();
    let session = serde_json::json!({
        "meta": {"source": "codex", "session_id": "s-cache", "title": "untangle imports"}
    });
    std::fs::write(codex_dir.join("s-cache.json"), session.to_string()).unwrap();

    let cache_dir = home.path().join(".local").join("share").join("baton");
    std::fs::create_dir_all(&cache_dir).unwrap();
    std::fs::write(cache_dir.join("index.json"), "{corrupt").unwrap();

    // No --refresh: the just-written corrupt cache is within the TTL.
    let output = baton(home.path(), &["index", "--root", root.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("s-cache"));
}

#[test]
fn index_builds_across_tool_exports() {
    let home = tempfile::tempdir().unwrap();
    let root = home.path().join("exports");
    let codex_dir = root.join("codex");
    std::fs::create_dir_all(&codex_dir).unwrap();
    let session = serde_json::json!({
        "meta": {"source": "codex", "session_id": "s-1", "title": "fix flaky test"},
        "messages": [{"role": "user", "content": "hi"}]
    });
    std::fs::write(codex_dir.join("s-1.json"), session.to_string()).unwrap();

    let output = baton(
        home.path(),
        &["index", "--root", root.to_str().unwrap(), "--refresh"],
    );
    assert!(output.status.success());
    let listing = stdout(&output);
    assert!(listing.contains("s-1"));
    assert!(listing.contains("fix flaky test"));
}
