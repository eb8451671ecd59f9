use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token accounting reported by the backend for one generation call.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The result of a free-text generation call.
#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub usage: TokenUsage,
}

/// The result of a schema-constrained generation call.
///
/// `output` is `None` when the backend replied but its content could not be
/// parsed as JSON. Callers treat that as a recoverable "no usable output"
/// signal, distinct from a transport failure.
#[derive(Debug, Clone)]
pub struct StructuredGeneration {
    pub output: Option<serde_json::Value>,
    pub usage: TokenUsage,
}

/// A generic client for the two generation capabilities this crate consumes.
///
/// No timeout is imposed here; cancellation and deadlines are the transport's
/// (and ultimately the caller's) concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Makes a single free-text completion call.
    async fn generate_text(&self, prompt: String) -> Result<Generation>;

    /// Makes a completion call whose output is constrained to `schema`.
    async fn generate_structured(
        &self,
        prompt: String,
        schema_name: String,
        schema: serde_json::Value,
    ) -> Result<StructuredGeneration>;
}

/// An implementation of `LLMClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The specific model identifier to use for chat completions (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    fn usage_of(usage: Option<&async_openai::types::CompletionUsage>) -> TokenUsage {
        usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    async fn generate_text(&self, prompt: String) -> Result<Generation> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        let usage = Self::usage_of(response.usage.as_ref());

        let text = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .clone()
            .context("No content in LLM response")?;

        Ok(Generation { text, usage })
    }

    async fn generate_structured(
        &self,
        prompt: String,
        schema_name: String,
        schema: serde_json::Value,
    ) -> Result<StructuredGeneration> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: schema_name,
                    schema: Some(schema),
                    strict: Some(true),
                },
            })
            .build()?;

        let response = self.client.chat().create(request).await?;
        let usage = Self::usage_of(response.usage.as_ref());

        // A reply with no choices or unparseable content is reported as an
        // absent output, not a transport error, so the caller can decide how
        // fatal that is.
        let output = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .and_then(|content| serde_json::from_str(content).ok());

        Ok(StructuredGeneration { output, usage })
    }
}
