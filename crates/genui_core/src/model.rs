use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// -------------- Initial data --------------

/// Body of the initial-data endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitialData {
    /// DSL describing the UI to compile
    pub script: String,
}

// -------------- Compile endpoint --------------

/// `{ contents: [{ parts: [{ text }] }] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `{ candidates: [{ content: { parts: [{ text }] } }] }`
///
/// Every level is optional so that a structurally incomplete success body
/// deserializes and is reported as an empty response instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if it is non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

/// Non-2xx body of the compile endpoint, `{ error: ... }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<Value>,
}

impl ApiErrorBody {
    /// Human readable detail: `error.message` for structured errors,
    /// the string itself for string errors, the raw JSON otherwise
    pub fn detail(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => match obj.get("message") {
                Some(Value::String(msg)) => Some(msg.clone()),
                _ => Some(Value::Object(obj.clone()).to_string()),
            },
            other => Some(other.to_string()),
        }
    }
}

// -------------- Results --------------

#[derive(Debug, Clone, PartialEq)]
pub struct CompileResult {
    /// Compiled text exactly as returned by the endpoint
    pub raw_text: String,
    /// Wall clock time of the request, excluding body parsing
    pub elapsed: Duration,
}

impl CompileResult {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}
