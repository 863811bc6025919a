mod cli;
mod commands;
mod server;
mod utils;

use clap::Parser;
use tracing::error;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    // Install default crypto provider for rustls (required for HTTPS to the compile endpoint)
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    if let Err(e) = cli.handle().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
