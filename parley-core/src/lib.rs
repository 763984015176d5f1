pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod gateway;
pub mod messages;
pub mod models;

// Re-export commonly used types
pub use client::{Completion, InferenceClient};
pub use config::Config;
pub use credential::Credential;
pub use error::{Error, Result};
pub use gateway::{DEFAULT_SYSTEM_PROMPT, InferenceGateway, MAX_PROMPT_CHARS, validate_prompt};
pub use messages::{ChatMessage, HistoryEntry, Role, build_messages};
pub use models::ModelResponse;
