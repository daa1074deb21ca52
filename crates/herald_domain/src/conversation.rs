use std::fmt;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// Identifier of a generation model, e.g. `claude-sonnet-4-5-20250929`.
#[derive(
    Clone,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Display,
    derive_more::Deref,
    Debug,
    PartialEq,
    Eq,
)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }
}

/// Identifier the responder assigns to a tool invocation request.
#[derive(
    Clone,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Display,
    derive_more::Deref,
    Debug,
    PartialEq,
    Eq,
)]
#[serde(transparent)]
pub struct ToolUseId(String);

impl ToolUseId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: ToolUseId,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: ToolUseId,
        content: String,
    },
    /// Blocks the service produces and consumes on its own, such as
    /// server-side tool invocations and their results. They are resubmitted
    /// exactly as received.
    Opaque(Value),
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(id: impl ToString, name: impl Into<String>, input: Value) -> Self {
        Self::ToolUse { id: ToolUseId::new(id), name: name.into(), input }
    }

    /// The service executes its tools itself, so the acknowledgment carries
    /// no output of its own.
    pub fn acknowledgment(tool_use_id: ToolUseId) -> Self {
        Self::ToolResult { tool_use_id, content: String::new() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, content: vec![ContentBlock::text(text)] }
    }

    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self { role: Role::Assistant, content }
    }

    /// Non-empty text blocks joined by a blank line, in block order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn tool_use_ids(&self) -> impl Iterator<Item = &ToolUseId> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolUse { id, .. } => Some(id),
            _ => None,
        })
    }

    fn tool_result_ids(&self) -> impl Iterator<Item = &ToolUseId> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolResult { tool_use_id, .. } => Some(tool_use_id),
            _ => None,
        })
    }

    /// Builds the user turn acknowledging every tool invocation request in
    /// this turn, in request order. Returns `None` when there is nothing to
    /// acknowledge.
    pub fn acknowledgments(&self) -> Option<Turn> {
        let content: Vec<_> = self
            .tool_use_ids()
            .cloned()
            .map(ContentBlock::acknowledgment)
            .collect();

        if content.is_empty() {
            None
        } else {
            Some(Self { role: Role::User, content })
        }
    }
}

/// Ordered exchange with the responder, starting with the user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { turns: vec![Turn::user(prompt)] }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Checks that the conversation can be submitted: it ends with a user
    /// turn, and every tool invocation request is answered by the next turn
    /// with results in the same order.
    pub fn ensure_submittable(&self) -> Result<(), Error> {
        match self.turns.last() {
            Some(turn) if turn.role == Role::User => {}
            Some(_) => {
                return Err(Error::MalformedConversation(
                    "the last turn must come from the user".to_string(),
                ));
            }
            None => {
                return Err(Error::MalformedConversation(
                    "the conversation has no turns".to_string(),
                ));
            }
        }

        for (index, pair) in self.turns.windows(2).enumerate() {
            let (request, reply) = (&pair[0], &pair[1]);
            if request.role != Role::Assistant {
                continue;
            }

            let requested: Vec<_> = request.tool_use_ids().collect();
            let answered: Vec<_> = reply.tool_result_ids().collect();
            if requested != answered {
                return Err(Error::MalformedConversation(format!(
                    "turn {} requested {} tool invocation(s) but turn {} answered {}",
                    index,
                    requested.len(),
                    index + 1,
                    answered.len()
                )));
            }
        }

        Ok(())
    }
}

/// Server-executed tool offered to the responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
}

impl ToolSpec {
    pub fn web_search(max_uses: u32) -> Self {
        Self {
            tool_type: "web_search_20250305".to_string(),
            name: "web_search".to_string(),
            max_uses: Some(max_uses),
        }
    }
}

/// Why the responder ended its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    Other(String),
}

impl From<&str> for StopReason {
    fn from(value: &str) -> Self {
        match value {
            "end_turn" => StopReason::EndTurn,
            "tool_use" => StopReason::ToolUse,
            other => StopReason::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => f.write_str("end_turn"),
            StopReason::ToolUse => f.write_str("tool_use"),
            StopReason::Other(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Setters)]
#[setters(into)]
pub struct ChatRequest {
    pub model: ModelId,
    pub max_tokens: u32,
    pub turns: Vec<Turn>,
    pub tools: Vec<ToolSpec>,
}

impl ChatRequest {
    pub fn new(model: ModelId, max_tokens: u32) -> Self {
        Self { model, max_tokens, turns: Vec::new(), tools: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub stop_reason: StopReason,
    pub content: Vec<ContentBlock>,
}

impl ChatResponse {
    pub fn new(stop_reason: impl Into<StopReason>, content: Vec<ContentBlock>) -> Self {
        Self { stop_reason: stop_reason.into(), content }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn fixture_tool_turn() -> Turn {
        Turn::assistant(vec![
            ContentBlock::text("Searching."),
            ContentBlock::tool_use("toolu_1", "web_search", json!({"query": "a"})),
            ContentBlock::Opaque(json!({"type": "web_search_tool_result"})),
            ContentBlock::tool_use("toolu_2", "web_search", json!({"query": "b"})),
        ])
    }

    #[test]
    fn test_acknowledgments_preserve_request_order() {
        let fixture = fixture_tool_turn();

        let actual = fixture.acknowledgments().unwrap();

        let expected = Turn {
            role: Role::User,
            content: vec![
                ContentBlock::acknowledgment(ToolUseId::new("toolu_1")),
                ContentBlock::acknowledgment(ToolUseId::new("toolu_2")),
            ],
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_acknowledgments_none_without_tool_use() {
        let fixture = Turn::assistant(vec![ContentBlock::text("done")]);

        assert_eq!(fixture.acknowledgments(), None);
    }

    #[test]
    fn test_text_joins_non_empty_blocks() {
        let fixture = Turn::assistant(vec![
            ContentBlock::text("First"),
            ContentBlock::text(""),
            ContentBlock::tool_use("toolu_1", "web_search", json!({})),
            ContentBlock::text("Second"),
        ]);

        let actual = fixture.text();

        assert_eq!(actual, "First\n\nSecond");
    }

    #[test]
    fn test_ensure_submittable_accepts_acknowledged_turn() {
        let mut fixture = Conversation::new("prompt");
        let request = fixture_tool_turn();
        let reply = request.acknowledgments().unwrap();
        fixture.push(request);
        fixture.push(reply);

        assert!(fixture.ensure_submittable().is_ok());
    }

    #[test]
    fn test_ensure_submittable_rejects_missing_results() {
        let mut fixture = Conversation::new("prompt");
        fixture.push(fixture_tool_turn());
        fixture.push(Turn::user("continue"));

        let actual = fixture.ensure_submittable();

        assert!(matches!(actual, Err(Error::MalformedConversation(_))));
    }

    #[test]
    fn test_ensure_submittable_rejects_trailing_assistant_turn() {
        let mut fixture = Conversation::new("prompt");
        fixture.push(Turn::assistant(vec![ContentBlock::text("hi")]));

        let actual = fixture.ensure_submittable();

        assert!(matches!(actual, Err(Error::MalformedConversation(_))));
    }

    #[test]
    fn test_stop_reason_from_wire_value() {
        assert_eq!(StopReason::from("end_turn"), StopReason::EndTurn);
        assert_eq!(StopReason::from("tool_use"), StopReason::ToolUse);
        assert_eq!(
            StopReason::from("pause_turn"),
            StopReason::Other("pause_turn".to_string())
        );
        assert_eq!(StopReason::from("max_tokens").to_string(), "max_tokens");
    }

    #[test]
    fn test_web_search_spec_serialization() {
        let fixture = ToolSpec::web_search(15);

        let actual = serde_json::to_value(&fixture).unwrap();

        let expected = json!({"type": "web_search_20250305", "name": "web_search", "max_uses": 15});
        assert_eq!(actual, expected);
    }
}
