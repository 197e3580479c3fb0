use anyhow::{bail, Context, Result};
use baton_adapters::AdapterRegistry;
use baton_forward::{FlagOccurrence, FlagScan, FlagSource, FlagValue};

use crate::config::BatonConfig;

/// Run the forward command: resolve launch flags for a target tool and
/// print the command line it should be started with. Spawning the process
/// is left to the caller's shell.
pub fn run_forward(
    registry: &AdapterRegistry,
    config: &BatonConfig,
    tool: &str,
    raw_flags: &[String],
) -> Result<()> {
    let Some(adapter) = registry.get(tool) else {
        return Err(baton_core::Error::UnknownSource {
            name: tool.to_string(),
        })
        .with_context(|| format!("known tools: {}", registry.names().join(", ")));
    };
    if !binary_on_path(adapter.binary_name()) {
        return Err(baton_core::Error::ToolNotAvailable {
            binary: adapter.binary_name().to_string(),
        }
        .into());
    }

    // Config defaults first, explicit flags after: latest wins.
    let mut occurrences = config.forward_occurrences();
    occurrences.extend(parse_raw_flags(raw_flags)?);

    let mut scan = FlagScan::new(occurrences);
    let resolution = adapter.map_handoff_flags(&mut scan).unwrap_or_default();

    let mut parts = vec![adapter.binary_name().to_string()];
    parts.extend(resolution.extra_args.iter().cloned());
    for occ in scan.unconsumed() {
        parts.push(format!("--{}", occ.key));
        if let Some(value) = occ.value.as_str() {
            parts.push(value.to_string());
        }
    }
    println!("{}", parts.join(" "));

    for warning in &resolution.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

/// True when `binary` resolves to a file in one of the `PATH` directories.
fn binary_on_path(binary: &str) -> bool {
    search_path_contains(std::env::var_os("PATH").as_deref(), binary)
}

fn search_path_contains(path: Option<&std::ffi::OsStr>, binary: &str) -> bool {
    let Some(paths) = path else {
        return false;
    };
    std::env::split_paths(paths).any(|dir| dir.join(binary).is_file())
}

/// Parse trailing command-line tokens into flag occurrences.
///
/// Accepts `--key`, `--key value`, and `--key=value`. A token after a bare
/// `--key` becomes its value unless it starts with `--`.
pub fn parse_raw_flags(tokens: &[String]) -> Result<Vec<FlagOccurrence>> {
    let mut occurrences = Vec::new();
    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        let Some(stripped) = token.strip_prefix("--") else {
            bail!("Unexpected argument '{token}'; flags must start with --");
        };
        if stripped.is_empty() {
            bail!("Empty flag name");
        }
        if let Some((key, value)) = stripped.split_once('=') {
            occurrences.push(FlagOccurrence {
                key: key.to_string(),
                value: FlagValue::Str(value.to_string()),
                source: FlagSource::Cli,
            });
        } else if let Some(next) = iter.peek().filter(|next| !next.starts_with("--")) {
            let value = (*next).clone();
            iter.next();
            occurrences.push(FlagOccurrence::string(stripped, value, FlagSource::Cli));
        } else {
            occurrences.push(FlagOccurrence::boolean(stripped, true, FlagSource::Cli));
        }
    }
    Ok(occurrences)
}
