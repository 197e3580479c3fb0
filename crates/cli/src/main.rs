mod config;
mod forward_cmd;
mod handoff_cmd;
mod index_cmd;

use std::path::PathBuf;

use anyhow::{bail, Result};
use baton_adapters::AdapterRegistry;
use baton_context::render::RenderMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "baton", about = "Hand off AI agent sessions between CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported agent tools
    Tools,

    /// Render a handoff document from a session export
    Handoff {
        /// Path to the normalized session JSON file
        file: PathBuf,

        /// Rendering mode: inline or reference
        #[arg(long, default_value = "inline")]
        mode: String,

        /// Write the markdown here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve launch flags for a target tool and print its command line
    Forward {
        /// Target tool slug, e.g. claude-code or codex
        tool: String,

        /// Flags to forward, e.g. --yolo --model o3
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        flags: Vec<String>,
    },

    /// Build or show the cross-tool session index
    Index {
        /// Session-export root (defaults to the configured root)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Rebuild even if the cached index is still fresh
        #[arg(long)]
        refresh: bool,
    },
}

fn parse_mode(mode: &str) -> Result<RenderMode> {
    match mode {
        "inline" => Ok(RenderMode::Inline),
        "reference" => Ok(RenderMode::Reference),
        other => bail!("Unknown mode '{other}'; expected 'inline' or 'reference'"),
    }
}

fn run_tools(registry: &AdapterRegistry) -> Result<()> {
    for name in registry.names() {
        if let Some(adapter) = registry.get(name) {
            println!("{:<14} {:<20} ({})", name, adapter.label(), adapter.binary_name());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    // Every known tool must have an adapter before any command runs.
    let registry = AdapterRegistry::builtin();
    if let Err(e) = registry.verify_complete() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let result = run(cli, &registry).await;
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, registry: &AdapterRegistry) -> Result<()> {
    let config = config::load_config()?;
    match cli.command {
        Commands::Tools => run_tools(registry),
        Commands::Handoff { file, mode, output } => {
            handoff_cmd::run_handoff(&file, parse_mode(&mode)?, output.as_deref())
        }
        Commands::Forward { tool, flags } => {
            forward_cmd::run_forward(registry, &config, &tool, &flags)
        }
        Commands::Index { root, refresh } => {
            index_cmd::run_index(registry, &config, root.as_deref(), refresh).await
        }
    }
}
