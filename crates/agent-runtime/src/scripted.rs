//! Scripted Provider
//!
//! Deterministic offline provider for tests and demos. Replies are served in
//! order; once the script runs out, the last reply repeats. Every request is
//! recorded so callers can inspect the prompts that were sent.

use std::sync::Mutex;

use agent_core::{
    error::{AgentError, Result},
    message::Message,
    provider::{
        Completion, CompletionStream, FinishReason, GenerationOptions, LlmProvider, ModelInfo,
        ProviderInfo, StreamChunk, TokenUsage,
    },
};
use async_trait::async_trait;

/// Provider that replays a fixed list of replies
pub struct ScriptedProvider {
    replies: Vec<String>,
    cursor: Mutex<usize>,
    requests: Mutex<Vec<Vec<Message>>>,
    chunk_chars: usize,
}

impl ScriptedProvider {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            cursor: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
            chunk_chars: 16,
        }
    }

    /// Provider that always answers with the same text
    pub fn constant(reply: impl Into<String>) -> Self {
        Self::new([reply.into()])
    }

    /// Size of the streamed deltas, in characters
    #[must_use]
    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Every message list received so far, oldest first
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn next_reply(&self, messages: &[Message]) -> Result<String> {
        self.requests
            .lock()
            .map_err(|_| AgentError::Provider("scripted provider poisoned".into()))?
            .push(messages.to_vec());

        let mut cursor = self
            .cursor
            .lock()
            .map_err(|_| AgentError::Provider("scripted provider poisoned".into()))?;
        let reply = self
            .replies
            .get(*cursor)
            .or_else(|| self.replies.last())
            .cloned()
            .ok_or_else(|| AgentError::Provider("script is empty".into()))?;
        *cursor += 1;
        Ok(reply)
    }

    fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .chunks(self.chunk_chars)
            .map(|c| c.iter().collect())
            .collect()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        Ok(ProviderInfo {
            name: "Scripted".into(),
            models: self.list_models().await?,
            supports_streaming: true,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.replies.is_empty())
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let content = self.next_reply(messages)?;
        let usage = TokenUsage::new(
            messages.iter().map(|m| self.estimate_tokens(&m.content)).sum(),
            self.estimate_tokens(&content),
        );

        Ok(Completion {
            content,
            model: options.model.clone(),
            usage: Some(usage),
            finish_reason: Some(FinishReason::Stop),
        })
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
        _options: &GenerationOptions,
    ) -> Result<CompletionStream> {
        let reply = self.next_reply(messages)?;

        let mut chunks: Vec<Result<StreamChunk>> = self
            .split(&reply)
            .into_iter()
            .map(|delta| Ok(StreamChunk { delta, done: false, usage: None }))
            .collect();
        chunks.push(Ok(StreamChunk {
            delta: String::new(),
            done: true,
            usage: None,
        }));

        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(vec![ModelInfo {
            id: "scripted".into(),
            name: "scripted".into(),
            context_length: None,
        }])
    }
}
