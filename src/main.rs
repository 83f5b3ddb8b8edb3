use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use personae::{Config, Server, routes};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log)
        .with_context(|| format!("invalid log filter `{}`", config.log))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(addr = %config.addr, "starting personae");

    Server::bind(config.addr)
        .serve(routes::router())
        .await
        .context("server error")
}
