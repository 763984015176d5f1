//! HTTP client for the chat completions endpoint.
//!
//! One client is built per process and shared by every request; reqwest
//! pools connections internally, so the handle is cheap to share and is
//! never mutated after construction.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::messages::ChatMessage;

/// Transport timeout for completion calls in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 60;

const USER_AGENT: &str = concat!("parley/", env!("CARGO_PKG_VERSION"));

/// Request payload for the chat completions API.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// Typed view over the only reply fields we rely on. Everything else in the
/// endpoint's response is treated as opaque and passed through as `raw`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// One completed round trip to the endpoint.
#[derive(Debug, Clone)]
pub struct Completion {
    /// The top reply text.
    pub content: String,
    /// The full reply body, untouched.
    pub raw: Value,
}

/// Handle to the remote inference endpoint.
#[derive(Debug)]
pub struct InferenceClient {
    http: reqwest::Client,
    url: String,
    model: String,
    credential: Credential,
}

impl InferenceClient {
    /// Build the client, validating the connection settings.
    pub(crate) fn new(config: &Config, credential: Credential) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(Error::config("missing connection string"));
        }
        if config.model_name.trim().is_empty() {
            return Err(Error::config("missing model name"));
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        let url = format!(
            "{}/chat/completions",
            config.endpoint.trim_end_matches('/')
        );

        Ok(Self {
            http,
            url,
            model: config.model_name.clone(),
            credential,
        })
    }

    /// Send one completion request. No retries; a failure is reported as-is.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
        let request = ChatRequest {
            model: &self.model,
            messages,
        };

        let start = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.credential.token()))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference {
                status: None,
                message: e.to_string(),
            })?;

        let duration_ms = start.elapsed().as_millis();
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                status = %status,
                duration_ms = %duration_ms,
                "inference endpoint returned an error"
            );
            return Err(Error::Inference {
                status: Some(status.as_u16()),
                message: text,
            });
        }

        let raw: Value = response.json().await.map_err(|e| Error::Inference {
            status: Some(status.as_u16()),
            message: format!("failed to read endpoint response: {e}"),
        })?;
        let content = extract_content(&raw)?;

        info!(
            model = %self.model,
            duration_ms = %duration_ms,
            "completion call finished"
        );

        Ok(Completion { content, raw })
    }
}

/// Pull the top reply text out of the opaque response body.
fn extract_content(raw: &Value) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_value(raw.clone()).map_err(|e| Error::Inference {
        status: None,
        message: format!("unexpected endpoint response shape: {e}"),
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| Error::Inference {
            status: None,
            message: "no choices in endpoint response".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::build_messages;
    use serde_json::json;

    fn config(endpoint: &str, model: &str) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            model_name: model.to_string(),
            client_id: None,
            tenant_id: None,
        }
    }

    fn credential() -> Credential {
        Credential::new("test-key").unwrap()
    }

    #[test]
    fn missing_endpoint_is_a_config_error() {
        let err = InferenceClient::new(&config("", "pirate-6b"), credential()).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m == "missing connection string"));
    }

    #[test]
    fn missing_model_name_is_a_config_error() {
        let err = InferenceClient::new(&config("http://localhost:1234", ""), credential())
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m == "missing model name"));
    }

    #[test]
    fn trailing_slash_on_endpoint_is_normalized() {
        let client =
            InferenceClient::new(&config("http://localhost:1234/", "pirate-6b"), credential())
                .unwrap();
        assert_eq!(client.url, "http://localhost:1234/chat/completions");
    }

    #[test]
    fn request_serializes_in_wire_shape() {
        let messages = build_messages("Be brief.", &[], "Hi");
        let request = ChatRequest {
            model: "pirate-6b",
            messages: &messages,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "pirate-6b");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Hi");
    }

    #[test]
    fn extract_content_reads_the_first_choice() {
        let raw = json!({
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Arr!" } }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12 }
        });
        assert_eq!(extract_content(&raw).unwrap(), "Arr!");
    }

    #[test]
    fn extract_content_fails_on_empty_choices() {
        let raw = json!({ "choices": [] });
        assert!(matches!(
            extract_content(&raw),
            Err(Error::Inference { .. })
        ));
    }
}
