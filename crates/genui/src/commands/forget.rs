use anyhow::{Context, Result};
use clap::Parser;
use genui_config::{
    Config,
    credential::{CredentialStore, KeychainStore},
};
use tracing::info;

use crate::utils::styles::{fmt_bold, fmt_success};

#[derive(Debug, Clone, Parser)]
pub(crate) struct ForgetCmd {}

impl ForgetCmd {
    pub(crate) fn handle(&self, cfg: &Config) -> Result<()> {
        let key = cfg.credential.key.as_str();
        KeychainStore
            .remove(key)
            .context(format!("Failed removing `{key}` from the keychain"))?;

        info!(
            "{}",
            fmt_success(&format!("Removed stored API key {}", fmt_bold(key)))
        );
        Ok(())
    }
}
