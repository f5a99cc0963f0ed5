//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! The agent observes, thinks, acts (via tools), and responds.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{CompletionStream, GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Display name, used in logs
    pub name: String,

    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Agent".into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

const TOOL_FENCE: &str = "```tool";
const FENCE_END: &str = "```";

pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Build the full system prompt including tool descriptions
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the reasoning loop until the model answers without a tool call
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        if conversation.messages().first().map(|m| m.role) != Some(Role::System) {
            conversation
                .messages_mut()
                .insert(0, Message::system(self.system_prompt()));
        }

        for iteration in 1..=self.config.max_iterations {
            conversation.truncate_to_fit();

            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content;
            conversation.push(Message::assistant(&content));

            let Some(tool_call) = parse_tool_call(&content) else {
                return Ok(content);
            };

            tracing::debug!(
                agent = %self.config.name,
                iteration,
                tool = %tool_call.name,
                "Executing tool"
            );

            let result = self.execute_tool(&tool_call).await;
            conversation.push(Message::tool(format_tool_result(&result), tool_call.id.clone()));
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::with_system_prompt(self.system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Stream a single completion for the given messages.
    ///
    /// The agent's system prompt is prepended; tool calls in the output are
    /// not acted upon.
    pub async fn stream(&self, messages: &[Message]) -> Result<CompletionStream> {
        let mut full = Vec::with_capacity(messages.len() + 1);
        full.push(Message::system(self.system_prompt()));
        full.extend(messages.iter().filter(|m| m.role != Role::System).cloned());

        tracing::debug!(agent = %self.config.name, messages = full.len(), "Streaming completion");
        self.provider
            .complete_stream(&full, &self.config.generation)
            .await
    }

    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id.clone_from(&call.id);
                result
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                ToolResult {
                    name: call.name.clone(),
                    id: call.id.clone(),
                    success: false,
                    output: format!("Error: {}", e),
                    data: None,
                }
            }
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Parse a tool call from an LLM response.
///
/// Prefers a fenced ```` ```tool ```` block and falls back to an inline JSON
/// object with a `"tool"` key.
fn parse_tool_call(content: &str) -> Option<ToolCall> {
    let fenced = content.find(TOOL_FENCE).and_then(|start| {
        let after_marker = &content[start + TOOL_FENCE.len()..];
        let end = after_marker.find(FENCE_END)?;
        serde_json::from_str::<ToolCall>(after_marker[..end].trim()).ok()
    });

    let mut call = fenced.or_else(|| parse_inline_tool_call(content))?;
    if call.id.is_none() {
        call.id = Some(uuid::Uuid::new_v4().to_string());
    }
    Some(call)
}

fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
}

fn format_tool_result(result: &ToolResult) -> String {
    if result.success {
        format!("[Tool '{}' returned]\n{}", result.name, result.output)
    } else {
        format!("[Tool '{}' failed]\n{}", result.name, result.output)
    }
}

/// Builder for Agent configuration
#[derive(Default)]
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn generation(mut self, options: GenerationOptions) -> Self {
        self.config.generation = options;
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    #[must_use]
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, ModelInfo, ProviderInfo, StreamChunk};
    use crate::tool::{ParameterSchema, Tool, ToolSchema};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays canned replies and records what it was sent
    struct Replay {
        replies: Mutex<Vec<String>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl Replay {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|s| (*s).to_string()).collect()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for Replay {
        async fn info(&self) -> Result<ProviderInfo> {
            Ok(ProviderInfo { name: "replay".into(), models: vec![], supports_streaming: true })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let content = self.replies.lock().unwrap().pop().unwrap_or_default();
            Ok(Completion { content, model: options.model.clone(), usage: None, finish_reason: None })
        }

        async fn complete_stream(&self, messages: &[Message], options: &GenerationOptions) -> Result<CompletionStream> {
            let completion = self.complete(messages, options).await?;
            let chunk = StreamChunk { delta: completion.content, done: true, usage: None };
            Ok(Box::pin(futures::stream::iter(vec![Ok(chunk)])))
        }

        async fn list_models(&self) -> Result<Vec<ModelInfo>> {
            Ok(vec![])
        }
    }

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "upper".into(),
                description: "Uppercase text".into(),
                parameters: vec![ParameterSchema::required_string("text", "Input")],
                category: None,
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            Ok(ToolResult::success("upper", call.str_arg("text")?.to_uppercase()))
        }
    }

    #[test]
    fn test_parse_fenced_tool_call() {
        let content = r#"Let me check that for you.
```tool
{"tool": "get-github-stats", "arguments": {"owner": "octocat", "repo": "Hello-World"}}
```"#;
        let call = parse_tool_call(content).unwrap();
        assert_eq!(call.name, "get-github-stats");
        assert_eq!(call.str_arg("repo").unwrap(), "Hello-World");
        assert!(call.id.is_some());
    }

    #[test]
    fn test_parse_inline_tool_call_and_plain_text() {
        let call = parse_tool_call(r#"{"tool": "upper", "arguments": {"text": "a"}}"#).unwrap();
        assert_eq!(call.name, "upper");
        assert!(parse_tool_call("No tools needed here.").is_none());
    }

    #[tokio::test]
    async fn test_run_executes_tool_then_answers() {
        let provider = Arc::new(Replay::new(&[
            "```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"hi\"}}\n```",
            "The answer is HI",
        ]));
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .tool(Upper)
            .build()
            .unwrap();

        let answer = agent.ask("shout hi").await.unwrap();
        assert_eq!(answer, "The answer is HI");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let tool_msg = seen[1].last().unwrap();
        assert_eq!(tool_msg.role, Role::Tool);
        assert!(tool_msg.content.contains("[Tool 'upper' returned]\nHI"));
    }

    #[tokio::test]
    async fn test_run_gives_up_after_max_iterations() {
        let looping = "```tool\n{\"tool\": \"upper\", \"arguments\": {\"text\": \"x\"}}\n```";
        let provider = Arc::new(Replay::new(&[looping, looping, looping]));
        let agent = AgentBuilder::new()
            .provider(provider)
            .tool(Upper)
            .max_iterations(2)
            .build()
            .unwrap();

        assert!(matches!(agent.ask("loop").await, Err(AgentError::MaxIterations(2))));
    }

    #[tokio::test]
    async fn test_stream_prepends_system_prompt() {
        let provider = Arc::new(Replay::new(&["streamed"]));
        let agent = AgentBuilder::new()
            .provider(provider.clone())
            .system_prompt("You are a GitHub analytics expert.")
            .build()
            .unwrap();

        let stream = agent.stream(&[Message::user("summarize")]).await.unwrap();
        let text = crate::provider::collect_text(stream).await.unwrap();
        assert_eq!(text, "streamed");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0][0].role, Role::System);
        assert_eq!(seen[0][0].content, "You are a GitHub analytics expert.");
        assert_eq!(seen[0][1].content, "summarize");
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(AgentBuilder::new().build(), Err(AgentError::Config(_))));
    }
}
