use crate::config::ClientConfig;
use portal_core::activity::ActivityEntry;
use portal_core::chat::{
    identity_headers, parse_event_stream, permissions_path, ChatReply, ChatRequest, ChatResponse,
    HealthResponse, PermissionsResponse, Transcript, CHAT_PATH, HEALTH_PATH, SIMPLE_CHAT_PATH,
};
use portal_core::{PortalError, Role, Session};
use serde_json::Value;

/// HTTP client for the external chat backend.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PortalError::Transport(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn simple_chat(&self, role: Role, message: &str) -> Result<ChatResponse, PortalError> {
        let request = ChatRequest::new(message)?;
        let body = serde_json::to_value(&request)?;
        let raw = self.post(role, SIMPLE_CHAT_PATH, &body).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Full chat protocol; the body is passed through untouched.
    ///
    /// Streamed (`text/event-stream`) replies come back as their `data:` payloads.
    pub async fn chat(&self, role: Role, body: &Value) -> Result<ChatReply, PortalError> {
        let resp = self.send_post(role, CHAT_PATH, body).await?;
        let streamed = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("text/event-stream"));
        if !streamed {
            return Ok(ChatReply::Json(read_json(resp).await?));
        }

        let status = resp.status();
        let text = resp.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(PortalError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(ChatReply::Events(parse_event_stream(&text)))
    }

    pub async fn permissions(&self, role: Role) -> Result<PermissionsResponse, PortalError> {
        let raw = self.get(role, &permissions_path(role)).await?;
        Ok(serde_json::from_value(raw)?)
    }

    pub async fn health(&self) -> Result<HealthResponse, PortalError> {
        let resp = self
            .http
            .get(self.config.url(HEALTH_PATH))
            .send()
            .await
            .map_err(transport)?;
        Ok(serde_json::from_value(read_json(resp).await?)?)
    }

    async fn post(&self, role: Role, path: &str, body: &Value) -> Result<Value, PortalError> {
        let resp = self.send_post(role, path, body).await?;
        read_json(resp).await
    }

    async fn send_post(
        &self,
        role: Role,
        path: &str,
        body: &Value,
    ) -> Result<reqwest::Response, PortalError> {
        let mut req = self.http.post(self.config.url(path)).json(body);
        for (name, value) in identity_headers(role) {
            req = req.header(name, value);
        }
        tracing::debug!(role = %role, path, "posting to chat backend");
        req.send().await.map_err(transport)
    }

    async fn get(&self, role: Role, path: &str) -> Result<Value, PortalError> {
        let mut req = self.http.get(self.config.url(path));
        for (name, value) in identity_headers(role) {
            req = req.header(name, value);
        }
        let resp = req.send().await.map_err(transport)?;
        read_json(resp).await
    }
}

fn transport(err: reqwest::Error) -> PortalError {
    PortalError::Transport(err.to_string())
}

async fn read_json(resp: reqwest::Response) -> Result<Value, PortalError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(PortalError::Status {
            status: status.as_u16(),
            body,
        });
    }
    resp.json::<Value>()
        .await
        .map_err(|e| PortalError::Decode(e.to_string()))
}

#[derive(Debug)]
pub enum TurnOutcome {
    /// Reply received; holds the feed entries the tool calls produced.
    Replied(Vec<ActivityEntry>),
    /// Reply arrived after the turn was abandoned and was dropped.
    Stale,
    /// Request failed; the transcript shows the fallback reply.
    Failed(PortalError),
}

/// One chat turn for `role`. Transport failures end up in the transcript only.
pub async fn converse(
    session: &Session,
    client: &ChatClient,
    role: Role,
    message: &str,
    transcript: &mut Transcript,
) -> TurnOutcome {
    let request = match ChatRequest::new(message) {
        Ok(r) => r,
        Err(e) => return TurnOutcome::Failed(e),
    };

    transcript.push_user(request.message.clone());
    let token = session.begin_turn();

    match client.simple_chat(role, &request.message).await {
        Ok(resp) => match session.record_turn(&token, role, &resp) {
            Some(entries) => {
                transcript.push_assistant(resp.response);
                tracing::info!(role = %role, tool_calls = entries.len(), "chat turn complete");
                TurnOutcome::Replied(entries)
            }
            None => TurnOutcome::Stale,
        },
        Err(err) => {
            tracing::warn!(role = %role, error = %err, "chat turn failed");
            transcript.push_fallback();
            TurnOutcome::Failed(err)
        }
    }
}
