use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use genui_config::Config;
use tracing::info;

use crate::{
    commands::resolve_credential,
    server::{self, PageState, create_page_router},
};

#[derive(Debug, Clone, Parser)]
pub(crate) struct ServeCmd {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub(crate) port: u16,

    /// Host address to bind to (use 0.0.0.0 for external access)
    #[arg(long, default_value = "127.0.0.1")]
    pub(crate) host: String,
}

impl ServeCmd {
    pub(crate) async fn handle(&self, cfg: Config) -> Result<()> {
        let store = resolve_credential(&cfg).context("Cannot serve pages without an API key")?;

        info!(
            backend = %cfg.backend.data_url(),
            compiler = %cfg.compiler.endpoint(),
            "Compiling on every page load"
        );

        let state = Arc::new(PageState {
            config: cfg,
            store,
            client: reqwest::Client::new(),
        });

        server::serve(&self.host, self.port, create_page_router(state), "genui").await
    }
}
