use zipd_core::logging;

mod error;
mod routes;
mod state;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::state::AppState;

/// HTTP front end for the zipd bulk remote-file ZIP bundling service.
#[derive(Debug, Parser)]
#[command(name = "zipd")]
#[command(about = "zipd: bulk remote-file ZIP bundling service", long_about = None)]
struct Cli {
    /// Bind address (e.g. 127.0.0.1:8080). Overrides the config file.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Config file to load instead of ~/.config/zipd/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init();

    let cli = Cli::parse();
    if let Err(err) = serve(cli).await {
        eprintln!("zipd error: {:#}", err);
        std::process::exit(1);
    }
}

async fn serve(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => zipd_core::config::load_from(path)?,
        None => zipd_core::config::load_or_init()?,
    };
    let bind: SocketAddr = match cli.bind {
        Some(addr) => addr,
        None => config.bind.parse()?,
    };

    let state = AppState::new(config)?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("zipd listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
