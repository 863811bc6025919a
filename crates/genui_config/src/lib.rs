use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use tracing::debug;

use crate::{
    endpoints::{BackendConfig, CompilerConfig, CredentialConfig},
    logger::LoggerConfig,
    page::PageConfig,
};

pub mod credential;
pub(crate) mod defaults;
pub mod endpoints;
pub mod logger;
pub mod page;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(skip_serializing)]
    path: Option<Utf8PathBuf>,

    /// Backend serving the DSL script
    #[serde(default)]
    pub backend: BackendConfig,

    /// Generative AI endpoint compiling the DSL
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Where the API credential is stored
    #[serde(default)]
    pub credential: CredentialConfig,

    /// Host page layout
    #[serde(default)]
    pub page: PageConfig,

    /// Server logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl Config {
    #[must_use]
    pub fn with_path(mut self, path: &Utf8PathBuf) -> Self {
        self.path = Some(path.clone());
        self
    }

    pub fn path(&self) -> Utf8PathBuf {
        self.path.clone().unwrap_or(Self::default_path())
    }

    /// Loads config from json file
    ///
    /// # Errors
    ///
    /// This function will return an error if the config path does not exist or the content is invalid
    pub fn load(path: &Utf8PathBuf) -> Result<Self> {
        debug!("Loading config from {path}");

        if !path.exists() {
            anyhow::bail!("Config file does not exist: {path}");
        }

        let contents =
            fs::read_to_string(path).context(format!("Failed reading config: {path} "))?;

        let mut cfg: Self =
            serde_json::from_str(&contents).context(format!("Failed loading config: {path} "))?;
        cfg.path = Some(path.clone());

        Ok(cfg)
    }

    /// Loads config from json file, falling back on the defaults when
    /// the file does not exist
    ///
    /// # Errors
    ///
    /// This function will return an error if the file exists but cannot be read or parsed
    pub fn load_or_default(path: &Utf8PathBuf) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config at {path}, using defaults");
            Ok(Self::default().with_path(path))
        }
    }

    /// Saves config to json file, falling back on default path if non is provided
    ///
    /// # Errors
    /// This function will error if it fails writing the config
    pub fn save(&self) -> Result<()> {
        let dest = self.path();
        debug!("Saving config to {dest}");
        let contents = serde_json::to_string_pretty(self).unwrap_or(json!(self).to_string());

        fs::write(&dest, contents).context(format!("Failed writing config: {dest}"))?;

        Ok(())
    }

    /// Default config path is ./genui.json
    pub fn default_path() -> Utf8PathBuf {
        Utf8PathBuf::new().join("genui.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.backend.data_url(), "http://127.0.0.1:5000/get-initial-data");
        assert_eq!(cfg.compiler.model, "gemini-2.5-flash-preview-05-20");
        assert_eq!(cfg.credential.key, "geminiApiKey");
        assert_eq!(cfg.page.region_id, "output");
        assert!(cfg.compiler.strip_code_fences);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "backend": { "url": "http://10.0.0.2:8000" } }"#).unwrap();
        assert_eq!(cfg.backend.data_url(), "http://10.0.0.2:8000/get-initial-data");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("genui.json")).unwrap();

        let mut cfg = Config::default().with_path(&path);
        cfg.compiler.model = "custom-model".into();
        cfg.compiler.timeout_ms = Some(1500);
        cfg.save().unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.compiler.model, "custom-model");
        assert_eq!(loaded.compiler.timeout_ms, Some(1500));
        assert_eq!(loaded.path(), path);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let path = Utf8PathBuf::from("/definitely/not/here/genui.json");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("genui.json")).unwrap();

        let cfg = Config::load_or_default(&path).unwrap();
        assert_eq!(cfg.path(), path);
        assert_eq!(cfg.credential.key, "geminiApiKey");
    }

    #[test]
    fn test_load_invalid_json_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("genui.json")).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed loading config"));
    }
}
