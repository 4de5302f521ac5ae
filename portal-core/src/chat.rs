use crate::error::PortalError;
use crate::roles::Role;
use serde::{Deserialize, Deserializer, Serialize};

pub const CHAT_PATH: &str = "/api/chat";
pub const SIMPLE_CHAT_PATH: &str = "/api/simple-chat";
pub const HEALTH_PATH: &str = "/health";

pub const HEADER_USER_ROLE: &str = "X-User-Role";
pub const HEADER_USER_ID: &str = "X-User-Id";

pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error. Please try again.";

pub fn permissions_path(role: Role) -> String {
    format!("/api/permissions/{}", role.as_str())
}

/// Identity headers for a role. Advisory; the backend decides what they allow.
pub fn identity_headers(role: Role) -> [(&'static str, &'static str); 2] {
    [
        (HEADER_USER_ROLE, role.as_str()),
        (HEADER_USER_ID, role.config().user_id),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: &str) -> Result<Self, PortalError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(PortalError::EmptyMessage);
        }
        Ok(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub output: serde_json::Value,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatContext {
    pub user_id: String,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatUser {
    pub role: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ChatContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ChatUser>,
}

// An explicit `null` reads the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of an `/api/chat` reply.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatReply {
    Json(serde_json::Value),
    /// `text/event-stream` body, one value per `data:` event.
    Events(Vec<serde_json::Value>),
}

/// Splits an SSE body into its `data:` payloads.
///
/// Multi-line data within one event is joined with `\n`. Payloads that are not
/// JSON are kept as strings.
pub fn parse_event_stream(body: &str) -> Vec<serde_json::Value> {
    let mut events = Vec::new();
    let mut data: Vec<&str> = Vec::new();

    for line in body.lines() {
        if line.is_empty() {
            flush_event(&mut data, &mut events);
        } else if let Some(rest) = line.strip_prefix("data:") {
            data.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    flush_event(&mut data, &mut events);
    events
}

fn flush_event(data: &mut Vec<&str>, events: &mut Vec<serde_json::Value>) {
    if data.is_empty() {
        return;
    }
    let joined = data.join("\n");
    data.clear();
    let value = serde_json::from_str(&joined).unwrap_or(serde_json::Value::String(joined));
    events.push(value);
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PermissionsResponse {
    pub role: String,
    pub permissions: Vec<String>,
    #[serde(default)]
    pub available_tools: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub chatkit_server: Option<String>,
    #[serde(default)]
    pub openai_configured: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: Speaker,
    pub content: String,
}

/// Messages of one chat panel, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Speaker::User, content.into());
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Speaker::Assistant, content.into());
    }

    pub fn push_fallback(&mut self) {
        self.push(Speaker::Assistant, FALLBACK_REPLY.to_string());
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(&mut self, speaker: Speaker, content: String) {
        self.messages.push(ChatMessage { speaker, content });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_messages_are_rejected() {
        assert!(matches!(ChatRequest::new("   "), Err(PortalError::EmptyMessage)));
        assert_eq!(ChatRequest::new(" hi ").expect("request").message, "hi");
    }

    #[test]
    fn decodes_simple_chat_response() {
        let raw = json!({
            "response": "Restarted redis.",
            "tool_calls": [
                {"name": "restart_service", "output": {"status": "restarted"}},
                {"name": "view_technical_logs"}
            ],
            "context": {"user_id": "it-demo-001", "role": "IT", "permissions": ["restart_service"]},
            "user": {"role": "IT", "display_name": "IT Admin", "user_id": "it-demo-001"}
        });
        let parsed: ChatResponse = serde_json::from_value(raw).expect("decode");
        assert_eq!(parsed.tool_calls.len(), 2);
        assert_eq!(parsed.tool_calls[1].output, serde_json::Value::Null);
        assert_eq!(parsed.context.expect("context").permissions, ["restart_service"]);
    }

    #[test]
    fn tool_calls_are_optional() {
        let parsed: ChatResponse =
            serde_json::from_value(json!({"response": "hello"})).expect("decode");
        assert!(parsed.tool_calls.is_empty());
        assert!(parsed.user.is_none());
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"response":"hi","tool_calls":null}"#).expect("decode");
        assert_eq!(parsed.response, "hi");
        assert!(parsed.tool_calls.is_empty());

        let parsed: ChatResponse =
            serde_json::from_str(r#"{"response":null}"#).expect("decode");
        assert_eq!(parsed.response, "");
    }

    #[test]
    fn event_stream_payloads() {
        let body = "data: {\"type\":\"thread.created\"}\n\n\
                    : keep-alive\n\n\
                    data: first line\r\ndata: second line\r\n\r\n\
                    data: {\"type\":\"done\"}";
        let events = parse_event_stream(body);
        assert_eq!(
            events,
            vec![
                json!({"type": "thread.created"}),
                json!("first line\nsecond line"),
                json!({"type": "done"}),
            ]
        );
        assert!(parse_event_stream("").is_empty());
    }

    #[test]
    fn identity_headers_follow_role_config() {
        let headers = identity_headers(Role::Finance);
        assert_eq!(headers[0], ("X-User-Role", "FINANCE"));
        assert_eq!(headers[1], ("X-User-Id", "finance-demo-001"));
        assert_eq!(permissions_path(Role::Csm), "/api/permissions/CSM");
    }

    #[test]
    fn transcript_keeps_order() {
        let mut t = Transcript::new();
        t.push_user("status?");
        t.push_fallback();
        assert_eq!(t.len(), 2);
        assert_eq!(t.messages()[0].speaker, Speaker::User);
        assert_eq!(t.last().map(|m| m.content.as_str()), Some(FALLBACK_REPLY));
    }
}
