use genui_core::CredentialPrompt;
use inquire::InquireError;
use tracing::warn;

use crate::utils::styles::fmt_dimmed;

/// Masked terminal prompt for the API key. Esc and Ctrl-C decline.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InquirePrompt;

impl CredentialPrompt for InquirePrompt {
    fn prompt(&self, message: &str) -> Option<String> {
        let res = inquire::Password::new(message)
            .without_confirmation()
            .with_display_toggle_enabled()
            .with_help_message(&fmt_dimmed("stored in the system keychain, Esc to cancel"))
            .prompt_skippable();

        match res {
            Ok(value) => value,
            Err(InquireError::OperationInterrupted | InquireError::OperationCanceled) => None,
            Err(e) => {
                warn!("Failed prompting for API key: {e}");
                None
            }
        }
    }
}

pub(crate) mod validators {
    #[allow(clippy::unnecessary_wraps)]
    pub(crate) fn url(
        val: &str,
    ) -> Result<inquire::validator::Validation, inquire::CustomUserError> {
        if url::Url::parse(val).is_ok() {
            Ok(inquire::validator::Validation::Valid)
        } else {
            Ok(inquire::validator::Validation::Invalid(
                "invalid url".into(),
            ))
        }
    }
}
