//! Per-target-tool flag mapping.
//!
//! Every resolver is an ordered decision tree over an explicit
//! [`FlagScan`]: each branch consumes exactly the flags it decides, so a
//! flag is never double-consumed or silently dropped — anything a branch
//! discards produces a warning, and anything unmapped stays unconsumed for
//! the host's generic passthrough.
//!
//! All tools share the same shape — an autonomy precedence chain
//! (auto-approve aliases beat full-auto beats sandbox/approval), then
//! independent shared mappings (model, directories, tool allow/deny
//! lists) — with tool-specific flag names and most-permissive literals.

use crate::occurrence::{FlagScan, ForwardResolution};

/// Aliases that all mean "run with everything approved".
pub const AUTO_APPROVE_KEYS: &[&str] = &[
    "yolo",
    "force",
    "allow-all",
    "dangerously-bypass",
    "dangerously-skip-permissions",
];

const AUTONOMY_KEYS: &[&str] = &["full-auto", "sandbox", "ask-for-approval"];

/// Resolve flags for a target tool by slug. Returns `None` for a tool this
/// crate knows nothing about; resolvers themselves never fail.
pub fn resolve_for_tool(tool: &str, scan: &mut FlagScan) -> Option<ForwardResolution> {
    match tool {
        "codex" => Some(resolve_codex(scan)),
        "claude-code" => Some(resolve_claude(scan)),
        "gemini" => Some(resolve_gemini(scan)),
        "copilot" => Some(resolve_copilot(scan)),
        "cursor-agent" => Some(resolve_cursor(scan)),
        "opencode" => Some(resolve_opencode(scan)),
        "droid" => Some(resolve_droid(scan)),
        _ => None,
    }
}

/// Keys from `lower` that are currently present, for override warnings.
fn present_keys(scan: &FlagScan, lower: &[&str]) -> Vec<String> {
    lower
        .iter()
        .filter(|k| scan.has(k))
        .map(|k| k.to_string())
        .collect()
}

fn override_warning(tool: &str, winner: &str, dropped: &[String]) -> String {
    format!(
        "{tool}: {winner} takes precedence; dropped {}",
        dropped.join(", ")
    )
}

fn dropped_warning(tool: &str, reason: &str, dropped: &[String]) -> String {
    format!("{tool}: {reason}; dropped {}", dropped.join(", "))
}

pub fn resolve_codex(scan: &mut FlagScan) -> ForwardResolution {
    let mut res = ForwardResolution::default();

    if scan.consume_any_boolean(AUTO_APPROVE_KEYS) {
        let dropped = present_keys(scan, AUTONOMY_KEYS);
        scan.consume_keys(AUTONOMY_KEYS);
        res.extra_args
            .push("--dangerously-bypass-approvals-and-sandbox".to_string());
        if !dropped.is_empty() {
            res.warnings.push(override_warning(
                "codex",
                "--dangerously-bypass-approvals-and-sandbox",
                &dropped,
            ));
        }
    } else if scan.has("full-auto") {
        scan.consume_keys(&["full-auto"]);
        let dropped = present_keys(scan, &["sandbox", "ask-for-approval"]);
        scan.consume_keys(&["sandbox", "ask-for-approval"]);
        res.extra_args.push("--full-auto".to_string());
        if !dropped.is_empty() {
            res.warnings
                .push(override_warning("codex", "--full-auto", &dropped));
        }
    } else {
        if let Some(mode) = scan.latest_string(&["sandbox"]) {
            scan.consume_keys(&["sandbox"]);
            res.extra_args.push("--sandbox".to_string());
            res.extra_args.push(mode);
        }
        if let Some(policy) = scan.latest_string(&["ask-for-approval"]) {
            scan.consume_keys(&["ask-for-approval"]);
            res.extra_args.push("--ask-for-approval".to_string());
            res.extra_args.push(policy);
        }
    }

    if let Some(model) = scan.latest_string(&["model"]) {
        scan.consume_keys(&["model"]);
        res.extra_args.push("--model".to_string());
        res.extra_args.push(model);
    }
    let dirs = scan.consume_all_csv_strings(&["add-dir"]);
    if !dirs.is_empty() {
        res.warnings.push(dropped_warning(
            "codex",
            "no extra-directory flag",
            &["add-dir".to_string()],
        ));
    }
    for override_kv in scan.consume_all_strings(&["config"]) {
        res.extra_args.push("-c".to_string());
        res.extra_args.push(override_kv);
    }

    res
}

pub fn resolve_claude(scan: &mut FlagScan) -> ForwardResolution {
    let mut res = ForwardResolution::default();

    if scan.consume_any_boolean(AUTO_APPROVE_KEYS) {
        let dropped = present_keys(scan, &["full-auto", "sandbox", "ask-for-approval", "permission-mode"]);
        scan.consume_keys(&["full-auto", "sandbox", "ask-for-approval", "permission-mode"]);
        res.extra_args
            .push("--dangerously-skip-permissions".to_string());
        if !dropped.is_empty() {
            res.warnings.push(override_warning(
                "claude-code",
                "--dangerously-skip-permissions",
                &dropped,
            ));
        }
    } else if scan.has("full-auto") {
        scan.consume_keys(&["full-auto"]);
        let dropped = present_keys(scan, &["sandbox", "ask-for-approval", "permission-mode"]);
        scan.consume_keys(&["sandbox", "ask-for-approval", "permission-mode"]);
        res.extra_args.push("--permission-mode".to_string());
        res.extra_args.push("acceptEdits".to_string());
        if !dropped.is_empty() {
            res.warnings.push(override_warning(
                "claude-code",
                "--permission-mode acceptEdits",
                &dropped,
            ));
        }
    } else {
        if let Some(mode) = scan.latest_string(&["permission-mode", "ask-for-approval"]) {
            scan.consume_keys(&["permission-mode", "ask-for-approval"]);
            res.extra_args.push("--permission-mode".to_string());
            res.extra_args.push(mode);
        }
        if scan.has("sandbox") {
            scan.consume_keys(&["sandbox"]);
            res.warnings.push(dropped_warning(
                "claude-code",
                "no sandbox flag",
                &["sandbox".to_string()],
            ));
        }
    }

    if let Some(model) = scan.latest_string(&["model"]) {
        scan.consume_keys(&["model"]);
        res.extra_args.push("--model".to_string());
        res.extra_args.push(model);
    }
    for dir in scan.consume_all_csv_strings(&["add-dir"]) {
        res.extra_args.push("--add-dir".to_string());
        res.extra_args.push(dir);
    }
    for tool in scan.consume_all_csv_strings(&["allow-tool"]) {
        res.extra_args.push("--allowedTools".to_string());
        res.extra_args.push(tool);
    }
    for tool in scan.consume_all_csv_strings(&["deny-tool"]) {
        res.extra_args.push("--disallowedTools".to_string());
        res.extra_args.push(tool);
    }

    res
}

pub fn resolve_gemini(scan: &mut FlagScan) -> ForwardResolution {
    let mut res = ForwardResolution::default();

    if scan.consume_any_boolean(AUTO_APPROVE_KEYS) {
        let dropped = present_keys(scan, AUTONOMY_KEYS);
        scan.consume_keys(AUTONOMY_KEYS);
        res.extra_args.push("--yolo".to_string());
        if !dropped.is_empty() {
            res.warnings
                .push(override_warning("gemini", "--yolo", &dropped));
        }
    } else if scan.has("full-auto") {
        scan.consume_keys(&["full-auto"]);
        let dropped = present_keys(scan, &["ask-for-approval"]);
        scan.consume_keys(&["ask-for-approval"]);
        res.extra_args.push("--approval-mode".to_string());
        res.extra_args.push("auto_edit".to_string());
        if !dropped.is_empty() {
            res.warnings.push(override_warning(
                "gemini",
                "--approval-mode auto_edit",
                &dropped,
            ));
        }
        if scan.consume_any_boolean(&["sandbox"]) {
            res.extra_args.push("--sandbox".to_string());
        }
    } else {
        if let Some(mode) = scan.latest_string(&["ask-for-approval"]) {
            scan.consume_keys(&["ask-for-approval"]);
            res.extra_args.push("--approval-mode".to_string());
            res.extra_args.push(mode);
        }
        if scan.consume_any_boolean(&["sandbox"]) {
            res.extra_args.push("--sandbox".to_string());
        }
    }

    if let Some(model) = scan.latest_string(&["model"]) {
        scan.consume_keys(&["model"]);
        res.extra_args.push("--model".to_string());
        res.extra_args.push(model);
    }
    for dir in scan.consume_all_csv_strings(&["add-dir"]) {
        res.extra_args.push("--include-directories".to_string());
        res.extra_args.push(dir);
    }

    res
}

pub fn resolve_copilot(scan: &mut FlagScan) -> ForwardResolution {
    let mut res = ForwardResolution::default();

    let auto = scan.consume_any_boolean(AUTO_APPROVE_KEYS);
    let full_auto = scan.has("full-auto");
    if auto || full_auto {
        let dropped = present_keys(scan, AUTONOMY_KEYS);
        scan.consume_keys(AUTONOMY_KEYS);
        res.extra_args.push("--allow-all-tools".to_string());
        if auto && !dropped.is_empty() {
            res.warnings
                .push(override_warning("copilot", "--allow-all-tools", &dropped));
        } else if full_auto {
            res.warnings.push(
                "copilot: no partial-autonomy mode; full-auto maps to --allow-all-tools"
                    .to_string(),
            );
        }
    } else {
        let dropped = present_keys(scan, &["sandbox", "ask-for-approval"]);
        if !dropped.is_empty() {
            scan.consume_keys(&["sandbox", "ask-for-approval"]);
            res.warnings.push(dropped_warning(
                "copilot",
                "no sandbox/approval flags",
                &dropped,
            ));
        }
    }

    if let Some(model) = scan.latest_string(&["model"]) {
        scan.consume_keys(&["model"]);
        res.extra_args.push("--model".to_string());
        res.extra_args.push(model);
    }
    for dir in scan.consume_all_csv_strings(&["add-dir"]) {
        res.extra_args.push("--add-dir".to_string());
        res.extra_args.push(dir);
    }
    for tool in scan.consume_all_csv_strings(&["allow-tool"]) {
        res.extra_args.push("--allow-tool".to_string());
        res.extra_args.push(tool);
    }
    for tool in scan.consume_all_csv_strings(&["deny-tool"]) {
        res.extra_args.push("--deny-tool".to_string());
        res.extra_args.push(tool);
    }

    res
}

pub fn resolve_cursor(scan: &mut FlagScan) -> ForwardResolution {
    let mut res = ForwardResolution::default();

    if scan.consume_any_boolean(AUTO_APPROVE_KEYS) {
        let dropped = present_keys(scan, AUTONOMY_KEYS);
        scan.consume_keys(AUTONOMY_KEYS);
        res.extra_args.push("--force".to_string());
        if !dropped.is_empty() {
            res.warnings
                .push(override_warning("cursor-agent", "--force", &dropped));
        }
    } else {
        let dropped = present_keys(scan, AUTONOMY_KEYS);
        if !dropped.is_empty() {
            scan.consume_keys(AUTONOMY_KEYS);
            res.warnings.push(dropped_warning(
                "cursor-agent",
                "no autonomy flags besides --force",
                &dropped,
            ));
        }
    }

    if let Some(model) = scan.latest_string(&["model"]) {
        scan.consume_keys(&["model"]);
        res.extra_args.push("--model".to_string());
        res.extra_args.push(model);
    }

    res
}

pub fn resolve_opencode(scan: &mut FlagScan) -> ForwardResolution {
    let mut res = ForwardResolution::default();

    // opencode exposes no autonomy launch flags; drop loudly, never error.
    let mut dropped = present_keys(scan, AUTO_APPROVE_KEYS);
    dropped.extend(present_keys(scan, AUTONOMY_KEYS));
    if !dropped.is_empty() {
        scan.consume_keys(AUTO_APPROVE_KEYS);
        scan.consume_keys(AUTONOMY_KEYS);
        res.warnings.push(dropped_warning(
            "opencode",
            "no autonomy launch flags",
            &dropped,
        ));
    }

    if let Some(model) = scan.latest_string(&["model"]) {
        scan.consume_keys(&["model"]);
        res.extra_args.push("--model".to_string());
        res.extra_args.push(model);
    }

    res
}

/// Droid has no mappable launch flags today. Deliberate placeholder: the
/// identity resolver, no args and no warnings.
pub fn resolve_droid(_scan: &mut FlagScan) -> ForwardResolution {
    ForwardResolution::default()
}
