use serde::Serialize;
use serde_json::Value;

/// Outcome of one completion call, echoing what was sent.
///
/// Created once per call and discarded after serialization; `raw` carries the
/// endpoint's full structured reply for callers that want more than the text.
#[derive(Debug, Clone, Serialize)]
pub struct ModelResponse {
    pub system_prompt: String,
    pub user_prompt: String,
    pub content: String,
    pub raw: Value,
}
