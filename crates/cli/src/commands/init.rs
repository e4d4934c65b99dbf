use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::config::{AppConfig, ServerConfig, StoreConfig};

#[derive(Args)]
pub struct InitArgs {
    /// Store type: memory or file
    #[arg(long, default_value = "memory")]
    store: String,

    /// Path of the phonebook file for the file store
    #[arg(long)]
    path: Option<String>,

    /// Address the service listens on
    #[arg(long)]
    listen: Option<String>,

    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
}

pub fn run(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    let store = match args.store.as_str() {
        "memory" => StoreConfig::Memory,
        "file" => {
            let path = args
                .path
                .ok_or_else(|| anyhow::anyhow!("--path required for file store"))?;
            StoreConfig::File { path }
        }
        other => anyhow::bail!("unknown store: {other} (supported: memory, file)"),
    };

    let config = AppConfig {
        server: args
            .listen
            .map(|listen| ServerConfig { listen })
            .unwrap_or_default(),
        store,
    };
    config.save(config_path)?;

    info!(config_path = %config_path.display(), "Config saved");
    println!("Config: {}", config_path.display());
    Ok(())
}
