//! Client for the local inference server.
//!
//! Only this module knows the wire shape of the generate endpoint; the rest
//! of the pipeline talks to the `InferenceClient` trait.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::error::{SummarizeError, SummarizeResult};

/// Narrow adapter for a text-generation backend.
pub trait InferenceClient {
    /// Submit a prompt and block until the full generated text is available.
    /// One attempt per call; no retries.
    fn generate(&self, prompt: &str) -> SummarizeResult<String>;
}

/// Request body for the generate endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// The subset of the response payload the pipeline consumes.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Error payload the server may return with a non-success status.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Blocking client for an Ollama-compatible server.
pub struct OllamaClient {
    agent: Agent,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(config),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.endpoint)
    }
}

impl InferenceClient for OllamaClient {
    fn generate(&self, prompt: &str) -> SummarizeResult<String> {
        let url = self.generate_url();
        let body = GenerateRequest { model: &self.model, prompt, stream: false };

        let mut response = self
            .agent
            .post(&url)
            .send_json(&body)
            .map_err(|err| SummarizeError::Inference(format!("cannot reach {url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .body_mut()
                .read_to_string()
                .ok()
                .and_then(|raw| serde_json::from_str::<ErrorResponse>(&raw).ok())
                .map(|payload| payload.error)
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(SummarizeError::Inference(format!("server returned {status}: {detail}")));
        }

        let payload: GenerateResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| SummarizeError::Inference(format!("malformed response payload: {err}")))?;

        if payload.response.trim().is_empty() {
            return Err(SummarizeError::Inference("server returned an empty response".to_string()));
        }

        Ok(payload.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_the_wire_contract() {
        let body = GenerateRequest { model: "llama3.2:latest", prompt: "hello", stream: false };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"model": "llama3.2:latest", "prompt": "hello", "stream": false})
        );
    }

    #[test]
    fn response_parses_with_extra_server_fields() {
        let raw = r#"{"model":"llama3.2:latest","response":"A summary.","done":true,"total_duration":42}"#;
        let payload: GenerateResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(payload.response, "A summary.");
    }

    #[test]
    fn trailing_endpoint_slash_is_tolerated() {
        let client =
            OllamaClient::new("http://localhost:11434/", "m", Duration::from_secs(1));
        assert_eq!(client.generate_url(), "http://localhost:11434/api/generate");
    }
}
