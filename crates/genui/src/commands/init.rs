use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use genui_config::Config;
use tracing::info;

use crate::{
    commands::USER_CANCELLED,
    utils::{
        prompts,
        styles::{fmt_bold, fmt_dimmed, fmt_success},
    },
};

#[derive(Debug, Clone, Parser)]
pub(crate) struct InitCmd {
    /// Use default values and skip the interactive prompts
    #[arg(long, short)]
    pub(crate) yes: bool,
}

impl InitCmd {
    pub(crate) fn handle(&self, path: &Utf8PathBuf) -> Result<()> {
        if Config::load(path).is_ok() {
            let re_init = self.yes
                || inquire::Confirm::new(&format!(
                    "A genui config already exists at {}, overwrite it?",
                    fmt_dimmed(path.as_str())
                ))
                .with_default(true)
                .prompt()?;
            if !re_init {
                anyhow::bail!(USER_CANCELLED)
            }
        }

        let mut cfg = Config::default().with_path(path);

        if !self.yes {
            let default_url = cfg.backend.url.to_string();
            let backend_url = inquire::Text::new("backend url:")
                .with_default(&default_url)
                .with_validator(prompts::validators::url)
                .with_help_message("serves GET /get-initial-data with the DSL script")
                .prompt()?;
            cfg.backend.url = backend_url.parse()?;

            let default_model = cfg.compiler.model.clone();
            cfg.compiler.model = inquire::Text::new("model:")
                .with_default(&default_model)
                .with_validator(inquire::required!("model is required"))
                .prompt()?;
        }

        cfg.save()?;

        info!(
            "{}",
            fmt_success(&format!(
                "Created {}",
                fmt_dimmed(cfg.path().as_str())
            ))
        );
        info!(
            "Start the demo backend with {} then compile with {}",
            fmt_bold("genui backend"),
            fmt_bold("genui run --out page.html")
        );

        Ok(())
    }
}
