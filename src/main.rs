//! artifact-collector CLI
//!
//! Runs the configured build command and copies the executables it
//! produced into the workspace tree, split into bins and tests.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use artifact_collector::{Collector, CollectorConfig};

#[derive(Parser)]
#[command(name = "artifact-collector")]
#[command(about = "Copies build artifacts into a workspace tree, split into bins and tests")]
struct Cli {
    /// Path to config file (default: ~/.config/artifact-collector/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Destination root for collected artifacts
    #[arg(long)]
    workspace_root: Option<PathBuf>,

    /// Directory to run the build command in (default: current directory)
    #[arg(long)]
    project_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = CollectorConfig::load(cli.config.as_ref())?;
    if let Some(root) = cli.workspace_root {
        config.workspace_root = root;
    }
    if let Some(dir) = cli.project_dir {
        config.project_dir = Some(dir);
    }

    info!(
        workspace_root = %config.workspace_root.display(),
        build_command = ?config.build_command,
        "starting collect run"
    );

    Collector::new(config).collect()?;

    Ok(())
}
