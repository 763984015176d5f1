use crate::error::{Error, Result};

const ENV_ENDPOINT: &str = "PARLEY_ENDPOINT";
const ENV_MODEL: &str = "PARLEY_MODEL";
const ENV_CLIENT_ID: &str = "PARLEY_CLIENT_ID";
const ENV_TENANT_ID: &str = "PARLEY_TENANT_ID";

/// Connection settings for the inference endpoint, loaded once at startup.
///
/// `endpoint` and `model_name` are allowed to be empty here: the client
/// factory validates them on first use so a broken deployment reports the
/// missing value on every request instead of dying silently at boot.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the chat completions service.
    pub endpoint: String,
    /// Model deployment to address in each request.
    pub model_name: String,
    /// Managed-identity client id, when the deployment provides one.
    pub client_id: Option<String>,
    pub tenant_id: Option<String>,
}

impl Config {
    /// Load configuration from a `.env` file and the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Not an error if .env is absent

        let endpoint = std::env::var(ENV_ENDPOINT).unwrap_or_default();
        let model_name = std::env::var(ENV_MODEL).unwrap_or_default();
        let client_id = optional_var(ENV_CLIENT_ID)?;
        let tenant_id = optional_var(ENV_TENANT_ID)?;

        Ok(Self {
            endpoint,
            model_name,
            client_id,
            tenant_id,
        })
    }
}

/// An identity variable may be absent, but if set it must not be blank.
fn optional_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => {
            Err(Error::config(format!("{name} is set but blank")))
        }
        Ok(value) => Ok(Some(value)),
        Err(_) => Ok(None),
    }
}
