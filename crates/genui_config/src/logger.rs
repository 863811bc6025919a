use serde::{Deserialize, Serialize};

/// Logging for the long running `serve` and `backend` commands.
/// One-shot commands take their level from `-v`/`-q` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    #[serde(default = "crate::defaults::default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LoggerFormat,
    #[serde(default = "crate::defaults::default_true")]
    pub colors: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum LoggerFormat {
    #[serde(rename = "compact")]
    #[default]
    Compact,
    #[serde(rename = "pretty")]
    Pretty,
    #[serde(rename = "json")]
    Json,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Info,
            format: LoggerFormat::Compact,
            colors: true,
        }
    }
}

/// Ordered from lowest to highest severity: Trace < Debug < Info < Warn < Error
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    #[serde(rename = "trace", alias = "TRACE")]
    Trace,
    #[serde(rename = "debug", alias = "DEBUG")]
    Debug,
    #[serde(rename = "info", alias = "INFO")]
    #[default]
    Info,
    #[serde(rename = "warn", alias = "WARN")]
    Warn,
    #[serde(rename = "error", alias = "ERROR")]
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
