use serde::{Deserialize, Serialize};

/// Role tag sent with each message in a chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One prior turn, as the browser replays it on every call.
///
/// The endpoint is stateless between calls, so the caller resends the whole
/// conversation each time. `is_response` marks turns that came from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub is_response: bool,
    pub prompt: String,
}

/// Assemble the ordered message list for one completion call.
///
/// The system prompt always comes first (exactly once), the history is
/// replayed verbatim in the caller's order, and the new user prompt closes
/// the list. Nothing is reordered or deduplicated. An empty system prompt is
/// accepted here; prompt validation belongs to the HTTP boundary.
pub fn build_messages(
    system_prompt: &str,
    history: &[HistoryEntry],
    user_prompt: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));

    for entry in history {
        messages.push(if entry.is_response {
            ChatMessage::assistant(entry.prompt.as_str())
        } else {
            ChatMessage::user(entry.prompt.as_str())
        });
    }

    messages.push(ChatMessage::user(user_prompt));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(is_response: bool, prompt: &str) -> HistoryEntry {
        HistoryEntry {
            is_response,
            prompt: prompt.to_string(),
        }
    }

    #[test]
    fn empty_history_yields_system_then_user() {
        let messages = build_messages("You are terse.", &[], "Hi");
        assert_eq!(
            messages,
            vec![ChatMessage::system("You are terse."), ChatMessage::user("Hi")]
        );
    }

    #[test]
    fn history_is_replayed_in_order_with_role_mapping() {
        let history = [entry(false, "A"), entry(true, "B")];
        let messages = build_messages("SP", &history, "C");
        assert_eq!(
            messages,
            vec![
                ChatMessage::system("SP"),
                ChatMessage::user("A"),
                ChatMessage::assistant("B"),
                ChatMessage::user("C"),
            ]
        );
    }

    #[test]
    fn output_length_is_history_plus_bookends() {
        for n in 0..8 {
            let history: Vec<_> = (0..n).map(|i| entry(i % 2 == 1, "turn")).collect();
            let messages = build_messages("sp", &history, "up");
            assert_eq!(messages.len(), n + 2);
            assert_eq!(messages.first().unwrap().role, Role::System);
            assert_eq!(messages.first().unwrap().content, "sp");
            assert_eq!(messages.last().unwrap().role, Role::User);
            assert_eq!(messages.last().unwrap().content, "up");
        }
    }

    #[test]
    fn empty_system_prompt_is_allowed() {
        let messages = build_messages("", &[], "Hi");
        assert_eq!(messages[0], ChatMessage::system(""));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::assistant("Aye")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"Aye"}"#);
    }

    #[test]
    fn history_entry_accepts_browser_payload() {
        let entry: HistoryEntry =
            serde_json::from_str(r#"{"isResponse":true,"prompt":"Ahoy"}"#).unwrap();
        assert!(entry.is_response);
        assert_eq!(entry.prompt, "Ahoy");
    }
}
