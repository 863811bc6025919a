use anyhow::Result;
use clap::Parser;

use crate::server::{self, create_backend_router};

const DEFAULT_SCRIPT: &str = "form(Product Review): rating(1-5), comments  -> /api/comments";

#[derive(Debug, Clone, Parser)]
pub(crate) struct BackendCmd {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    pub(crate) port: u16,

    /// Host address to bind to (use 0.0.0.0 for external access)
    #[arg(long, default_value = "127.0.0.1")]
    pub(crate) host: String,

    /// DSL script returned by the initial-data endpoint
    #[arg(long, short, default_value = DEFAULT_SCRIPT)]
    pub(crate) script: String,

    /// Path of the initial-data endpoint
    #[arg(long, default_value = "/get-initial-data")]
    pub(crate) data_path: String,
}

impl BackendCmd {
    pub(crate) async fn handle(&self) -> Result<()> {
        let app = create_backend_router(&self.data_path, self.script.clone());
        server::serve(&self.host, self.port, app, "Demo backend").await
    }
}
