use std::fmt;

use crate::error::{Error, Result};

const ENV_API_KEY: &str = "PARLEY_API_KEY";

/// Bearer credential for the inference endpoint.
///
/// Obtained once at process start and shared for the process lifetime.
/// The token never appears in logs; `Debug` prints a redacted marker.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let token = std::env::var(ENV_API_KEY)
            .map_err(|_| Error::config(format!("{ENV_API_KEY} not set")))?;
        Self::new(token)
    }

    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::config("credential token is blank"));
        }
        Ok(Self(token))
    }

    pub(crate) fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_is_rejected() {
        assert!(matches!(Credential::new(""), Err(Error::Config(_))));
        assert!(matches!(Credential::new("   "), Err(Error::Config(_))));
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let credential = Credential::new("sk-super-secret").unwrap();
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
