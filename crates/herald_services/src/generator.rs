use std::sync::Arc;

use herald_domain::{
    ChatProvider, ChatRequest, Conversation, Error, GeneratedDocument, ModelId, StopReason,
    ToolSpec, Turn,
};

/// Drives a conversation with the responder until it produces the final
/// document.
pub struct ContentGenerator<P> {
    provider: Arc<P>,
    model: ModelId,
    max_tool_rounds: usize,
}

impl<P: ChatProvider> ContentGenerator<P> {
    pub fn new(provider: Arc<P>, model: ModelId, max_tool_rounds: usize) -> Self {
        Self { provider, model, max_tool_rounds }
    }

    /// Without tools the prompt is answered in a single round. With tools the
    /// responder may pause for tool invocations; each pause is acknowledged
    /// and the conversation resubmitted until it ends its turn.
    pub async fn generate(
        &self,
        prompt: impl Into<String>,
        max_tokens: u32,
        tools: Vec<ToolSpec>,
    ) -> anyhow::Result<GeneratedDocument> {
        let request = ChatRequest::new(self.model.clone(), max_tokens).tools(tools);
        let mut conversation = Conversation::new(prompt);

        tracing::info!(model = %self.model, tools = request.tools.len(), "Calling generation API");

        let text = if request.tools.is_empty() {
            let (stop_reason, turn) = self.submit(&request, &conversation).await?;
            if stop_reason != StopReason::EndTurn {
                tracing::warn!(stop_reason = %stop_reason, "Unexpected stop reason");
            }
            turn.text()
        } else {
            self.tool_loop(&request, &mut conversation).await?
        };

        Ok(GeneratedDocument::new(text)?)
    }

    async fn tool_loop(
        &self,
        request: &ChatRequest,
        conversation: &mut Conversation,
    ) -> anyhow::Result<String> {
        for round in 1..=self.max_tool_rounds {
            let (stop_reason, turn) = self.submit(request, conversation).await?;
            tracing::debug!(round, stop_reason = %stop_reason, "Responder turn received");

            match stop_reason {
                StopReason::EndTurn => return Ok(turn.text()),
                StopReason::ToolUse => {
                    let Some(acknowledgments) = turn.acknowledgments() else {
                        tracing::warn!(round, "Tool use requested without any tool invocation");
                        return Ok(turn.text());
                    };
                    tracing::info!(
                        round,
                        invocations = acknowledgments.content.len(),
                        "Acknowledging tool invocations"
                    );
                    conversation.push(turn);
                    conversation.push(acknowledgments);
                }
                StopReason::Other(reason) => {
                    tracing::warn!(round, stop_reason = %reason, "Unexpected stop reason");
                    return Ok(turn.text());
                }
            }
        }

        Err(Error::LoopExceeded { limit: self.max_tool_rounds }.into())
    }

    async fn submit(
        &self,
        request: &ChatRequest,
        conversation: &Conversation,
    ) -> anyhow::Result<(StopReason, Turn)> {
        conversation.ensure_submittable()?;
        let request = request.clone().turns(conversation.turns().to_vec());
        let response = self.provider.chat(&request).await?;
        Ok((response.stop_reason, Turn::assistant(response.content)))
    }
}
