use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use genui_config::Config;

use crate::{
    commands::{
        backend::BackendCmd, forget::ForgetCmd, init::InitCmd, run::RunCmd, serve::ServeCmd,
    },
    utils::{
        self,
        logger::{init_cli_logger, init_server_logger},
    },
};

#[derive(Parser)]
#[command(name = "genui")]
#[command(version)]
#[command(about = "genui - compile a UI DSL into a live page")]
#[command(
    long_about = "genui fetches a UI description written in a small DSL from a backend, asks a generative AI \
endpoint to compile it into a single self-contained <div>, and renders the result into the output region of a \
host page. Scripts in the generated markup are activated after the markup is attached."
)]
#[command(after_help = "EXAMPLES:\n  \
    genui init\n  \
    genui backend --port 5000\n  \
    genui run --out page.html\n  \
    genui serve --port 8080\n\
")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Config file path, defaults to ./genui.json
    #[arg(long, short = 'c', global = true, default_value_t = Config::default_path())]
    pub(crate) config: Utf8PathBuf,

    /// No logging except for errors
    #[arg(long, short = 'q', global = true)]
    pub(crate) quiet: bool,

    /// Verbose logging (-v) or trace logging (-vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub(crate) verbose: u8,
}

impl Cli {
    /// Long running servers log through the configured tracing subscriber
    pub(crate) fn cli_logger(&self) -> bool {
        !matches!(&self.command, Commands::Serve(_) | Commands::Backend(_))
    }

    pub(crate) async fn handle(&self) -> anyhow::Result<()> {
        let cfg = Config::load_or_default(&self.config);

        if self.cli_logger() {
            init_cli_logger(self.verbose, self.quiet);
        } else if let Ok(cfg) = &cfg {
            init_server_logger(&cfg.logger, self.verbose, self.quiet);
        } else {
            init_cli_logger(self.verbose, self.quiet);
        }

        match &self.command {
            Commands::Init(cmd) => cmd.handle(&self.config)?,
            Commands::Run(cmd) => cmd.handle(cfg?).await?,
            Commands::Serve(cmd) => cmd.handle(cfg?).await?,
            Commands::Backend(cmd) => cmd.handle().await?,
            Commands::Forget(cmd) => cmd.handle(&cfg?)?,
        }

        Ok(())
    }
}

#[derive(Debug, Subcommand)]
#[command(styles=utils::styles::get_styles())]
pub(crate) enum Commands {
    /// Compile the DSL once and write the rendered page
    #[command(
        long_about = "Fetches the DSL from the backend, compiles it and writes the complete host page to a file \
or stdout. Exits with status 1 if any stage failed; the page then shows the error panel."
    )]
    Run(RunCmd),

    /// Serve the host page, compiling on every page load
    #[command(
        long_about = "Resolves the API key once, then serves the host page at / and runs the full pipeline on \
every request."
    )]
    Serve(ServeCmd),

    /// Start a demo backend serving a DSL script
    #[command(
        long_about = "Starts a small backend exposing GET /get-initial-data with a DSL script and accepting POSTs \
from generated forms on any other path."
    )]
    Backend(BackendCmd),

    /// Initialize configuration file
    #[command(long_about = "Initialize genui.json configuration file.")]
    Init(InitCmd),

    /// Remove the stored API key
    #[command(long_about = "Removes the API key from the system keychain.")]
    Forget(ForgetCmd),
}
