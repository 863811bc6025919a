use genui_config::{Config, credential::CredentialStore};
use tracing::{error, info};

use crate::{
    CompilerClient, CredentialPrompt, CredentialProvider, DataFetcher, Result,
    model::CompileResult,
    render::{OutputRenderer, ScriptHost},
    splitter::{SplitOutput, split, strip_code_fence},
};

/// One compile-and-render cycle: credential, initial data, compile, split, render
pub struct Pipeline<'a> {
    config: &'a Config,
    store: &'a dyn CredentialStore,
    prompt: &'a dyn CredentialPrompt,
    fetcher: DataFetcher,
    compiler: CompilerClient,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        store: &'a dyn CredentialStore,
        prompt: &'a dyn CredentialPrompt,
    ) -> Self {
        Self::with_client(config, store, prompt, reqwest::Client::new())
    }

    /// Shares `client` between the data fetch and the compile request
    pub fn with_client(
        config: &'a Config,
        store: &'a dyn CredentialStore,
        prompt: &'a dyn CredentialPrompt,
        client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            store,
            prompt,
            fetcher: DataFetcher::new(client.clone()),
            compiler: CompilerClient::new(client, &config.compiler, config.backend.base_url()),
        }
    }

    /// Runs every stage and renders the outcome into `renderer`'s region.
    ///
    /// # Errors
    ///
    /// Returns the first stage error after it has been rendered as the
    /// region's error panel.
    pub async fn run<H: ScriptHost>(
        &self,
        renderer: &mut OutputRenderer<H>,
    ) -> Result<CompileResult> {
        renderer.begin_loading();

        match self.stages().await {
            Ok((compiled, parts)) => {
                info!(
                    scripts = parts.scripts.len(),
                    elapsed_ms = compiled.elapsed.as_millis() as u64,
                    "Rendering compiled frontend"
                );
                renderer.render_success(&parts.markup, &parts.scripts, compiled.elapsed);
                Ok(compiled)
            }
            Err(e) => {
                error!(err = %e, "Pipeline failed");
                renderer.render_error(&e);
                Err(e)
            }
        }
    }

    async fn stages(&self) -> Result<(CompileResult, SplitOutput)> {
        let credential =
            CredentialProvider::new(self.store, self.prompt, self.config.credential.key.as_str())
                .get_credential()?;

        let data = self
            .fetcher
            .fetch_initial_data(&self.config.backend.data_url())
            .await?;

        let compiled = self.compiler.compile(&data.script, &credential).await?;

        let text = if self.config.compiler.strip_code_fences {
            strip_code_fence(&compiled.raw_text)
        } else {
            compiled.raw_text.as_str()
        };
        let parts = split(text);

        Ok((compiled, parts))
    }
}
