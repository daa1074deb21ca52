use anyhow::Context;
use herald_domain::{
    ApiKey, ChatProvider, ChatRequest, ChatResponse, ContentBlock, Error, ModelId, Role,
    ToolSpec, ToolUseId, Turn,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

const API_VERSION: &str = "2023-06-01";

/// Messages API client.
pub struct AnthropicProvider {
    client: reqwest::Client,
    base_url: Url,
    api_key: ApiKey,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a ModelId,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    tools: &'a [ToolSpec],
}

#[derive(Serialize)]
struct Message {
    role: Role,
    content: Vec<Value>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    stop_reason: Option<String>,
    #[serde(default)]
    content: Vec<Value>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl AnthropicProvider {
    pub fn new(base_url: Url, api_key: ApiKey) -> Self {
        Self { client: reqwest::Client::new(), base_url, api_key }
    }

    fn url(&self) -> anyhow::Result<Url> {
        Ok(self.base_url.join("messages")?)
    }
}

#[async_trait::async_trait]
impl ChatProvider for AnthropicProvider {
    async fn chat(&self, request: &ChatRequest) -> anyhow::Result<ChatResponse> {
        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: request.turns.iter().map(to_message).collect(),
            tools: &request.tools,
        };

        tracing::debug!(
            model = %request.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "Anthropic request"
        );

        let response = self
            .client
            .post(self.url()?)
            .header("x-api-key", self.api_key.as_str())
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to reach the generation API")?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| format!("{}: {}", e.error.kind, e.error.message))
                .unwrap_or(text);
            return Err(Error::Provider { status: status.as_u16(), message }.into());
        }

        let response: MessagesResponse =
            serde_json::from_str(&text).context("Malformed generation API response")?;
        Ok(ChatResponse::new(
            response.stop_reason.as_deref().unwrap_or("end_turn"),
            response.content.into_iter().map(from_wire).collect(),
        ))
    }
}

fn to_message(turn: &Turn) -> Message {
    Message { role: turn.role, content: turn.content.iter().map(to_wire).collect() }
}

fn to_wire(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Text { text } => json!({"type": "text", "text": text}),
        ContentBlock::ToolUse { id, name, input } => {
            json!({"type": "tool_use", "id": id, "name": name, "input": input})
        }
        ContentBlock::ToolResult { tool_use_id, content } => {
            json!({"type": "tool_result", "tool_use_id": tool_use_id, "content": content})
        }
        ContentBlock::Opaque(value) => value.clone(),
    }
}

/// Text and client tool invocations are interpreted; every other block type
/// is carried verbatim.
fn from_wire(value: Value) -> ContentBlock {
    match value.get("type").and_then(Value::as_str) {
        Some("text") => match value.get("text").and_then(Value::as_str) {
            Some(text) => ContentBlock::text(text),
            None => ContentBlock::Opaque(value),
        },
        Some("tool_use") => {
            let id = value.get("id").and_then(Value::as_str);
            let name = value.get("name").and_then(Value::as_str);
            match (id, name) {
                (Some(id), Some(name)) => ContentBlock::ToolUse {
                    id: ToolUseId::new(id),
                    name: name.to_string(),
                    input: value.get("input").cloned().unwrap_or_else(|| json!({})),
                },
                _ => ContentBlock::Opaque(value),
            }
        }
        _ => ContentBlock::Opaque(value),
    }
}
