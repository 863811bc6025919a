use std::time::{Duration, Instant};

use genui_config::endpoints::CompilerConfig;
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    credential::Credential,
    model::{ApiErrorBody, CompileResult, GenerateContentRequest, GenerateContentResponse},
};

const FALLBACK_ERROR: &str = "Failed to get a response from the compile endpoint.";

/// Instructions sent ahead of the DSL. The generated code must read the
/// backend host from the page's global `url` variable.
pub fn build_prompt(dsl: &str, base_url: &str) -> String {
    format!(
        "You are a frontend compiler.
Interpret the following DSL and generate a user-friendly HTML form.
Include CSS for layout and JavaScript for form submission to the endpoint.
Keep all styling and behaviour self-contained in the output: no external stylesheets or script files.
Endpoint URL must be dynamically constructed in JavaScript before making the fetch call. \
The base URL ({base_url}) is available at runtime in the global `url` variable; never hardcode the host.
The generated code should be placed inside a <div> element. The output must contain only a single top-level <div> element.

DSL:
{dsl}
"
    )
}

/// Client for the generative AI endpoint compiling DSL into markup
#[derive(Debug, Clone)]
pub struct CompilerClient {
    client: reqwest::Client,
    endpoint: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl CompilerClient {
    /// `base_url` is the backend generated code should talk to
    pub fn new(client: reqwest::Client, cfg: &CompilerConfig, base_url: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: cfg.endpoint(),
            base_url: base_url.into(),
            timeout: cfg.timeout(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one compile request. The elapsed time covers the request up to
    /// the response headers, not reading or parsing the body.
    ///
    /// # Errors
    ///
    /// - `Error::CompileTransport` if the request could not be sent
    /// - `Error::CompileRequest` on a non-2xx status
    /// - `Error::MalformedResponse` if a 2xx body is not JSON
    /// - `Error::CompileEmptyResponse` if a 2xx body carries no text
    pub async fn compile(&self, dsl: &str, credential: &Credential) -> Result<CompileResult> {
        let payload = GenerateContentRequest::from_prompt(build_prompt(dsl, &self.base_url));

        let mut req = self
            .client
            .post(&self.endpoint)
            .query(&[("key", credential.expose())])
            .json(&payload);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        debug!(endpoint = %self.endpoint, "Sending compile request");
        let start = Instant::now();
        // the request url carries the key, keep it out of error messages
        let res = req
            .send()
            .await
            .map_err(|e| Error::CompileTransport(e.without_url().to_string()))?;
        let elapsed = start.elapsed();

        let status = res.status();
        let body = res.text().await;

        if !status.is_success() {
            // an unreadable error body still reports the status
            let detail = body
                .ok()
                .and_then(|b| serde_json::from_str::<ApiErrorBody>(&b).ok())
                .and_then(|b| b.detail())
                .unwrap_or_else(|| FALLBACK_ERROR.to_string());
            warn!(status = status.as_u16(), detail = %detail, "Compile request failed");
            return Err(Error::CompileRequest {
                status: status.as_u16(),
                body: detail,
            });
        }

        let body = body.map_err(|e| Error::CompileTransport(e.without_url().to_string()))?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
                source_name: "compile endpoint".into(),
                reason: format!("body is not valid JSON: {e}"),
            })?;
        let raw_text = parsed
            .first_text()
            .ok_or(Error::CompileEmptyResponse)?
            .to_string();

        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            chars = raw_text.len(),
            "Compiled DSL"
        );

        Ok(CompileResult { raw_text, elapsed })
    }
}
