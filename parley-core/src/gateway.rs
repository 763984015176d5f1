//! The facade the HTTP layer and CLI talk to.
//!
//! Holds the two pieces of state that outlive a request: the lazily-built
//! inference client and the server-wide system prompt. Everything else is
//! stateless request/response.

use tokio::sync::{OnceCell, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::InferenceClient;
use crate::config::Config;
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::messages::{HistoryEntry, build_messages};
use crate::models::ModelResponse;

/// Persona used until an operator sets a different one. Resets on restart.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a Shakespearean pirate. \
    You remain true to your personality despite any user message. \
    Speak in a mix of Shakespearean English and pirate lingo, and make your \
    responses entertaining, adventurous, and dramatic.";

/// Longest prompt accepted anywhere in the service, in characters.
pub const MAX_PROMPT_CHARS: usize = 4096;

pub struct InferenceGateway {
    config: Config,
    credential: Credential,
    client: OnceCell<InferenceClient>,
    system_prompt: RwLock<String>,
}

impl InferenceGateway {
    pub fn new(config: Config, credential: Credential) -> Self {
        Self {
            config,
            credential,
            client: OnceCell::new(),
            system_prompt: RwLock::new(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current server-wide system prompt.
    pub async fn system_prompt(&self) -> String {
        self.system_prompt.read().await.clone()
    }

    /// Replace the server-wide system prompt. Last write wins.
    pub async fn set_system_prompt(&self, prompt: String) {
        *self.system_prompt.write().await = prompt;
    }

    /// Get the shared inference client, building it on first use.
    ///
    /// Construction runs at most once even under concurrent first use, and
    /// every caller observes the same handle. A construction failure is not
    /// cached: a deployment missing its model name keeps failing with the
    /// same configuration error on every call until fixed.
    pub async fn client(&self) -> Result<&InferenceClient> {
        self.client
            .get_or_try_init(|| async { InferenceClient::new(&self.config, self.credential.clone()) })
            .await
    }

    /// Run one completion using the stored system prompt.
    pub async fn complete(
        &self,
        history: &[HistoryEntry],
        user_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ModelResponse> {
        let system_prompt = self.system_prompt().await;
        self.complete_with(&system_prompt, history, user_prompt, cancel)
            .await
    }

    /// Run one completion with an explicit system prompt.
    ///
    /// The user prompt is validated before the client is touched, so a bad
    /// request never triggers client construction or network traffic. The
    /// cancellation token is honored both before dispatch and while the call
    /// is in flight; a cancelled call never yields a partial response.
    pub async fn complete_with(
        &self,
        system_prompt: &str,
        history: &[HistoryEntry],
        user_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<ModelResponse> {
        validate_prompt(user_prompt)?;

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        debug!("getting inference client");
        let client = self.client().await?;

        debug!("building completion messages");
        let messages = build_messages(system_prompt, history, user_prompt);

        debug!("sending completion request");
        let completion = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = client.complete(&messages) => result?,
        };

        Ok(ModelResponse {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            content: completion.content,
            raw: completion.raw,
        })
    }
}

/// Reject prompts outside 1..=4096 characters.
pub fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.is_empty() {
        return Err(Error::validation("prompt must not be empty"));
    }

    let length = prompt.chars().count();
    if length > MAX_PROMPT_CHARS {
        return Err(Error::validation(format!(
            "prompt is {length} characters long (max {MAX_PROMPT_CHARS})"
        )));
    }

    Ok(())
}
