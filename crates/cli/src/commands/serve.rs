use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tokio::net::TcpListener;

use crate::config::AppConfig;

#[derive(Args)]
pub struct ServeArgs {
    /// Override the configured listen address
    #[arg(long)]
    listen: Option<String>,
}

pub async fn run(args: ServeArgs, config_path: &Path) -> Result<()> {
    let config = AppConfig::load_or_default(config_path)?;
    let listen = args.listen.unwrap_or_else(|| config.server.listen.clone());

    let store = config.open_store().await?;
    let listener = TcpListener::bind(listen.as_str())
        .await
        .with_context(|| format!("failed to bind {listen}"))?;

    phonebook_http::serve(listener, store).await
}
