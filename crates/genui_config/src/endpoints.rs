use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Backend serving the DSL description of the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, also exposed to generated code as `url`
    #[serde(default = "crate::defaults::default_backend_url")]
    pub url: Url,

    /// Path of the initial-data endpoint returning `{ "script": ... }`
    #[serde(default = "crate::defaults::default_data_path")]
    pub data_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: crate::defaults::default_backend_url(),
            data_path: crate::defaults::default_data_path(),
        }
    }
}

impl BackendConfig {
    /// Full URL of the initial-data endpoint.
    ///
    /// The path is appended verbatim to the base so a base with a
    /// trailing slash does not produce `//`.
    pub fn data_url(&self) -> String {
        let base = self.url.as_str().trim_end_matches('/');
        let path = self.data_path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Base URL without a trailing slash, as handed to generated code
    pub fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }
}

/// Generative AI endpoint used to compile the DSL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// API base, e.g. `https://generativelanguage.googleapis.com/v1beta`
    #[serde(default = "crate::defaults::default_compiler_url")]
    pub url: Url,

    #[serde(default = "crate::defaults::default_model")]
    pub model: String,

    /// Request timeout in milliseconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Unwrap responses that arrive inside a single markdown code fence
    #[serde(default = "crate::defaults::default_true")]
    pub strip_code_fences: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            url: crate::defaults::default_compiler_url(),
            model: crate::defaults::default_model(),
            timeout_ms: None,
            strip_code_fences: true,
        }
    }
}

impl CompilerConfig {
    /// `{url}/models/{model}:generateContent`
    pub fn endpoint(&self) -> String {
        let base = self.url.as_str().trim_end_matches('/');
        format!("{base}/models/{}:generateContent", self.model)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Name the API key is stored under
    #[serde(default = "crate::defaults::default_credential_key")]
    pub key: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            key: crate::defaults::default_credential_key(),
        }
    }
}
