//! Resolve a bot configuration and print the merged document.

use anyhow::Context;
use botforge::config::{DeploymentSettings, Resolver};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "botforge", version, about = "Resolve and print bot configuration")]
struct Cli {
    /// Override configuration file; defaults-only when omitted.
    config: Option<PathBuf>,
    /// Deployment name used to resolve settings.
    #[arg(long, env = "DEPLOYMENT")]
    deployment: String,
    /// Directory holding a settings.yml that overrides the bundled one.
    #[arg(long)]
    settings_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    botforge::init_logging();
    let cli = Cli::parse();

    let resolver = match &cli.settings_dir {
        Some(dir) => {
            let settings = DeploymentSettings::from_dir(dir, &cli.deployment)
                .context("loading deployment settings")?;
            Resolver::new(&settings)?
        }
        None => Resolver::bundled(&cli.deployment)?,
    };

    let resolved = match &cli.config {
        Some(path) => resolver.resolve_path(path)?,
        None => resolver.resolve()?,
    };

    println!("{}", serde_json::to_string_pretty(resolved.as_value())?);
    Ok(())
}
