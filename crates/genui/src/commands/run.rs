use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use genui_config::Config;
use genui_core::{DeclinePrompt, HostPage, OutputRenderer, Pipeline};
use tracing::info;

use crate::{
    commands::resolve_credential,
    utils::{
        spinner::Spinner,
        styles::{fmt_dimmed, fmt_success},
    },
};

#[derive(Debug, Clone, Parser)]
pub(crate) struct RunCmd {
    /// Write the page to this file instead of stdout
    #[arg(long, short)]
    pub(crate) out: Option<Utf8PathBuf>,
}

impl RunCmd {
    pub(crate) async fn handle(&self, cfg: Config) -> Result<()> {
        let page = HostPage::new(&cfg.page, cfg.backend.base_url());
        let mut renderer = OutputRenderer::deferred(page);

        let outcome = match resolve_credential(&cfg) {
            Ok(store) => {
                let mut sp = Spinner::new(format!(
                    "Compiling {} with {}...",
                    cfg.backend.data_url(),
                    cfg.compiler.model
                ));
                let res = Pipeline::new(&cfg, &store, &DeclinePrompt)
                    .run(&mut renderer)
                    .await;
                match &res {
                    Ok(compiled) => sp.stop_success(format!(
                        "Compiled in {:.2}s",
                        compiled.elapsed_seconds()
                    )),
                    Err(_) => sp.stop_error("Compilation failed"),
                }
                res.map(|_| ())
            }
            Err(e) => {
                renderer.begin_loading();
                renderer.render_error(&e);
                Err(e)
            }
        };

        // the page carries the error panel too, write it either way
        self.write_page(&renderer.into_page().to_html())?;

        outcome?;
        Ok(())
    }

    fn write_page(&self, html: &str) -> Result<()> {
        if let Some(path) = &self.out {
            std::fs::write(path, html).context(format!("Failed writing page to {path}"))?;
            info!(
                "{}",
                fmt_success(&format!("Page written to {}", fmt_dimmed(path.as_str())))
            );
        } else {
            print!("{html}");
        }
        Ok(())
    }
}
