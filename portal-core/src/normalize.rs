//! Turns tool-call outputs from the chat backend into activity feed entries.

use crate::activity::{ActivityInput, ActivityResult};
use crate::chat::ToolCall;
use crate::roles::Role;
use serde_json::Value;

/// `update_incident_status` -> `Update Incident Status`
pub fn format_action(raw: &str) -> String {
    raw.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The fields of a tool output that drive classification.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolResult {
    pub error: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
    pub incident_id: Option<String>,
}

impl ToolResult {
    pub fn from_output(output: &Value) -> Self {
        let field = |key: &str| output.get(key).and_then(present_text);
        Self {
            error: field("error"),
            message: field("message"),
            status: field("status"),
            incident_id: field("incident_id"),
        }
    }
}

// Empty strings, zero, false and null count as absent.
fn present_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".into()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub status: ActivityResult,
    pub details: String,
}

pub fn classify_result(result: &ToolResult) -> Classification {
    if let Some(err) = &result.error {
        return Classification {
            status: ActivityResult::Error,
            details: err.clone(),
        };
    }

    let details = if let Some(message) = &result.message {
        message.clone()
    } else if let Some(status) = &result.status {
        format!("Status: {status}")
    } else if let Some(id) = &result.incident_id {
        format!("Incident: {id}")
    } else {
        "Completed".to_string()
    };

    Classification {
        status: ActivityResult::Success,
        details,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedToolCall {
    pub action: String,
    pub result: ActivityResult,
    pub details: String,
}

impl NormalizedToolCall {
    pub fn into_activity(self, role: Role) -> ActivityInput {
        ActivityInput::for_role(role, self.action, self.result, self.details)
    }
}

pub fn normalize_tool_call(call: &ToolCall) -> NormalizedToolCall {
    let Classification { status, details } = classify_result(&ToolResult::from_output(&call.output));
    NormalizedToolCall {
        action: format_action(&call.name),
        result: status,
        details,
    }
}
