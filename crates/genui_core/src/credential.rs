use std::fmt;

use genui_config::credential::CredentialStore;
use tracing::{debug, info};

use crate::{Error, Result};

pub(crate) const PROMPT_MESSAGE: &str = "Please enter your Gemini API key:";

/// Interactive source of a credential when none is stored
pub trait CredentialPrompt: Send + Sync {
    /// Returns `None` when the user declines to provide a value
    fn prompt(&self, message: &str) -> Option<String>;
}

/// Prompt that always declines, for non-interactive runs
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclinePrompt;

impl CredentialPrompt for DeclinePrompt {
    fn prompt(&self, _message: &str) -> Option<String> {
        None
    }
}

/// API credential, redacted in debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

pub struct CredentialProvider<'a> {
    store: &'a dyn CredentialStore,
    prompt: &'a dyn CredentialPrompt,
    key: String,
}

impl<'a> CredentialProvider<'a> {
    pub fn new(
        store: &'a dyn CredentialStore,
        prompt: &'a dyn CredentialPrompt,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            prompt,
            key: key.into(),
        }
    }

    /// Returns the stored credential, prompting for (and storing) a new one
    /// when the store has nothing under the configured key.
    ///
    /// # Errors
    ///
    /// `Error::MissingCredential` when the prompt is declined or left empty,
    /// `Error::CredentialStore` when the store cannot be read or written.
    pub fn get_credential(&self) -> Result<Credential> {
        if let Some(stored) = self.store.get(&self.key)?.filter(|v| !v.is_empty()) {
            debug!(key = %self.key, "Using stored credential");
            return Ok(Credential(stored));
        }

        let entered = self
            .prompt
            .prompt(PROMPT_MESSAGE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(Error::MissingCredential)?;

        self.store.set(&self.key, &entered)?;
        info!(key = %self.key, "Stored new credential");

        Ok(Credential(entered))
    }
}
