//! Request handlers for the API and the system-prompt form.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Form, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use parley_core::{HistoryEntry, InferenceGateway, ModelResponse, validate_prompt};

use crate::error::ApiError;

pub type Gateway = Arc<InferenceGateway>;

#[derive(Debug, Deserialize)]
pub struct InferenceRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelChatRequest {
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct SystemPromptForm {
    pub prompt: String,
}

/// POST /api/inference: single prompt, no history.
pub async fn inference(
    State(gateway): State<Gateway>,
    Json(request): Json<InferenceRequest>,
) -> Result<Json<Value>, ApiError> {
    debug!(prompt = %request.prompt, "received inference request");
    validate_prompt(&request.prompt)?;

    let response = gateway
        .complete(&[], &request.prompt, &CancellationToken::new())
        .await?;
    Ok(Json(completion_body(&response)))
}

/// POST /api/modelchat: the browser replays the whole history each call.
pub async fn model_chat(
    State(gateway): State<Gateway>,
    Json(request): Json<ModelChatRequest>,
) -> Result<Json<Value>, ApiError> {
    debug!(
        prompt = %request.prompt,
        turns = request.messages.len(),
        "received chat request"
    );
    validate_prompt(&request.prompt)?;
    for entry in &request.messages {
        validate_prompt(&entry.prompt)?;
    }

    let response = gateway
        .complete(&request.messages, &request.prompt, &CancellationToken::new())
        .await?;
    Ok(Json(completion_body(&response)))
}

/// GET /: show the current system prompt in a form.
pub async fn home(State(gateway): State<Gateway>) -> Html<String> {
    Html(render_home(&gateway.system_prompt().await))
}

/// POST /: update the server-wide system prompt.
pub async fn set_system_prompt(
    State(gateway): State<Gateway>,
    Form(form): Form<SystemPromptForm>,
) -> Result<Redirect, ApiError> {
    validate_prompt(&form.prompt)?;
    gateway.set_system_prompt(form.prompt).await;
    Ok(Redirect::to("/"))
}

/// GET /api/version
pub async fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

/// GET /api/config: the resolved configuration, credential redacted.
pub async fn config_view(State(gateway): State<Gateway>) -> Json<Value> {
    let config = gateway.config();
    Json(json!({
        "endpoint": config.endpoint,
        "model_name": config.model_name,
        "client_id": config.client_id,
        "tenant_id": config.tenant_id,
        "api_key": "<redacted>",
    }))
}

/// The browser reads `content` at the top level; keep the rest of the raw
/// reply next to it.
fn completion_body(response: &ModelResponse) -> Value {
    let mut body = match &response.raw {
        Value::Object(fields) => fields.clone(),
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("raw".to_string(), other.clone());
            map
        }
    };
    body.insert(
        "content".to_string(),
        Value::String(response.content.clone()),
    );
    Value::Object(body)
}

fn render_home(system_prompt: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Parley</title>
</head>
<body>
  <h1>Parley</h1>
  <p>System prompt steering every conversation:</p>
  <form method="post" action="/">
    <textarea name="prompt" rows="6" cols="80" maxlength="4096" required>{}</textarea>
    <br>
    <button type="submit">Update system prompt</button>
  </form>
</body>
</html>
"#,
        escape_html(system_prompt)
    )
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(raw: Value) -> ModelResponse {
        ModelResponse {
            system_prompt: "sp".to_string(),
            user_prompt: "up".to_string(),
            content: "Arr!".to_string(),
            raw,
        }
    }

    #[test]
    fn completion_body_merges_content_into_raw_fields() {
        let body = completion_body(&response(json!({
            "id": "cmpl-1",
            "model": "pirate-6b",
            "choices": []
        })));

        assert_eq!(body["content"], "Arr!");
        assert_eq!(body["id"], "cmpl-1");
        assert_eq!(body["model"], "pirate-6b");
    }

    #[test]
    fn completion_body_content_wins_over_raw() {
        let body = completion_body(&response(json!({ "content": "stale" })));
        assert_eq!(body["content"], "Arr!");
    }

    #[test]
    fn completion_body_handles_non_object_raw() {
        let body = completion_body(&response(Value::Null));
        assert_eq!(body, json!({ "content": "Arr!" }));

        let body = completion_body(&response(json!("plain text")));
        assert_eq!(body, json!({ "content": "Arr!", "raw": "plain text" }));
    }

    #[test]
    fn home_page_escapes_the_prompt() {
        let page = render_home("a <b> & \"c\"");
        assert!(page.contains("a &lt;b&gt; &amp; &quot;c&quot;"));
        assert!(!page.contains("<b>"));
    }
}
