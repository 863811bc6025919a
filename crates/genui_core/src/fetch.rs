use serde_json::Value;
use tracing::{debug, warn};

use crate::{Error, Result, model::InitialData};

/// GET-and-parse-JSON helper for the initial data
#[derive(Debug, Clone, Default)]
pub struct DataFetcher {
    client: reqwest::Client,
}

impl DataFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and parses the body as JSON. Single attempt.
    ///
    /// # Errors
    ///
    /// `Error::Fetch` on transport failure or a non-2xx status,
    /// `Error::MalformedResponse` if a 2xx body is not JSON.
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        debug!(url, "Fetching initial data");

        let fetch_err = |reason: String| Error::Fetch {
            url: url.to_string(),
            reason,
        };

        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Initial data request failed");
            return Err(fetch_err(format!("HTTP {status}")));
        }

        let body = res.text().await.map_err(|e| fetch_err(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            source_name: url.to_string(),
            reason: format!("body is not valid JSON: {e}"),
        })
    }

    /// Fetches the initial data and validates its `{ "script": string }` shape
    ///
    /// # Errors
    ///
    /// Any `fetch_json` error, or `Error::MalformedResponse` when the
    /// `script` field is missing or not a string.
    pub async fn fetch_initial_data(&self, url: &str) -> Result<InitialData> {
        let value = self.fetch_json(url).await?;

        serde_json::from_value(value).map_err(|e| Error::MalformedResponse {
            source_name: url.to_string(),
            reason: format!("expected a `script` string field: {e}"),
        })
    }
}
