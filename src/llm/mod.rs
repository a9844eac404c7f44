pub mod azure;
pub mod json;
pub mod prompts;

pub use azure::AzureChatClient;

use serde::{Deserialize, Serialize};

/// LLM analysis abstraction - the pipeline never talks to the chat API
/// directly, only through this trait.
#[async_trait::async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Run one analysis task and return the raw completion text.
    ///
    /// For extraction-family tasks the returned string is expected (but not
    /// guaranteed) to be JSON; callers parse defensively via
    /// [`json::parse_llm_json`].
    async fn analyze(&self, task: AnalysisTask) -> Result<String, LlmError>;
}

/// One analysis task with its payload
#[derive(Debug, Clone)]
pub enum AnalysisTask {
    /// Extract tool listings from a directory/search page
    Extract { page: String, query: String },
    /// Extract a single tool's details from an arbitrary page
    ExtractGeneric { page: String, query: String },
    /// Reorder tools by relevance to the query
    Rank { tools: Vec<RankEntry>, query: String },
    /// Fill missing detail fields for a known tool
    Enhance {
        name: String,
        query: String,
        partial: serde_json::Value,
    },
    /// Conversational reply, optionally grounded in the current results
    Chat {
        message: String,
        context: Option<String>,
    },
    /// Default analyze-and-recommend task over arbitrary page content
    Recommend { page: String, query: String },
}

/// Name + description pair fed to the ranking task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankEntry {
    pub name: String,
    pub description: String,
}

impl AnalysisTask {
    /// Short tag used in logs and prompt selection
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisTask::Extract { .. } => "extract",
            AnalysisTask::ExtractGeneric { .. } => "extract_generic",
            AnalysisTask::Rank { .. } => "rank",
            AnalysisTask::Enhance { .. } => "enhance",
            AnalysisTask::Chat { .. } => "chat",
            AnalysisTask::Recommend { .. } => "recommend",
        }
    }

    /// Extraction-family tasks resolve to a canned fallback payload on
    /// transport failure instead of propagating the error, so the pipeline
    /// never stalls on LLM unavailability.
    pub fn is_extraction_family(&self) -> bool {
        matches!(
            self,
            AnalysisTask::Extract { .. }
                | AnalysisTask::ExtractGeneric { .. }
                | AnalysisTask::Enhance { .. }
                | AnalysisTask::Recommend { .. }
        )
    }
}

/// Message role in a chat-completion conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat-completion message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// LLM-related errors
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Chat API credentials not configured")]
    MissingCredentials,

    #[error("completion response carried no content")]
    EmptyResponse,
}
