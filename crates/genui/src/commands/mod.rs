pub(crate) mod backend;
pub(crate) mod forget;
pub(crate) mod init;
pub(crate) mod run;
pub(crate) mod serve;

use genui_config::{
    Config,
    credential::{KeychainStore, MemoryStore},
};
use genui_core::CredentialProvider;

use crate::utils::prompts::InquirePrompt;

pub(crate) static USER_CANCELLED: &str = "Operation cancelled by user";

/// Reads the API key from the keychain, prompting on a miss, and seeds a
/// process-local store with it. Runs before any spinner is drawn.
///
/// # Errors
///
/// Fails when the prompt is declined or the keychain cannot be used.
pub(crate) fn resolve_credential(cfg: &Config) -> genui_core::Result<MemoryStore> {
    let key = cfg.credential.key.as_str();
    let credential = CredentialProvider::new(&KeychainStore, &InquirePrompt, key).get_credential()?;

    Ok(MemoryStore::new().with(key, credential.expose()))
}
