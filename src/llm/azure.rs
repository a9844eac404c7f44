use crate::config::LlmConfig;
use crate::llm::prompts::{self, PromptSpec};
use crate::llm::{AnalysisApi, AnalysisTask, ChatMessage, LlmError};
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Azure OpenAI chat-completion client
///
/// The endpoint is the full chat-completions URL (deployment and api-version
/// included); authentication is a static `api-key` header.
#[derive(Clone)]
pub struct AzureChatClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_tokens: u32,
}

impl AzureChatClient {
    pub fn new(config: &LlmConfig) -> Self {
        if config.api_key.trim().is_empty() || config.endpoint.trim().is_empty() {
            tracing::warn!("chat API credentials not set, analysis requests will fail");
        }

        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.trim().to_string(),
            api_key: config.api_key.trim().to_string(),
            max_tokens: config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }

    pub fn from_parts(endpoint: &str, api_key: &str) -> Self {
        Self::new(&LlmConfig {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            max_tokens: None,
        })
    }

    async fn complete(&self, spec: &PromptSpec) -> Result<String, LlmError> {
        if self.api_key.is_empty() || self.endpoint.is_empty() {
            return Err(LlmError::MissingCredentials);
        }

        let request_body = ChatCompletionRequest {
            messages: vec![
                ChatMessage::system(spec.system.as_str()),
                ChatMessage::user(spec.user.as_str()),
            ],
            temperature: spec.temperature,
            max_tokens: self.max_tokens,
            response_format: spec.json_mode.then(|| ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = status,
                error = %crate::logging::redact_secrets(&error_text),
                "chat api returned error"
            );

            return Err(LlmError::Api {
                status,
                message: error_text,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait::async_trait]
impl AnalysisApi for AzureChatClient {
    async fn analyze(&self, task: AnalysisTask) -> Result<String, LlmError> {
        let spec = prompts::build(&task);

        tracing::debug!(
            task = task.label(),
            temperature = spec.temperature,
            json_mode = spec.json_mode,
            "analysis request"
        );

        match self.complete(&spec).await {
            Ok(content) => {
                tracing::debug!(task = task.label(), content_len = content.len(), "analysis done");
                Ok(content)
            }
            Err(e) if task.is_extraction_family() => {
                // The pipeline must keep moving without the LLM; hand back the
                // canned payload shaped like a real reply.
                tracing::warn!(
                    task = task.label(),
                    error = %e,
                    "analysis failed, returning fallback payload"
                );
                Ok(prompts::fallback_payload(&task))
            }
            Err(e) => Err(e),
        }
    }
}

/// Request body for a chat completion
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// Response body of a chat completion
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}
