use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scraping/search API credentials
    #[serde(default)]
    pub scrape: ScrapeConfig,

    /// Chat-completion API credentials
    #[serde(default)]
    pub llm: LlmConfig,

    /// Write a debug log file under the config directory
    #[serde(default)]
    pub debug: bool,
}

/// Scraping/search/extraction API settings (Firecrawl-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// API key (overridden by FIRECRAWL_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_scrape_api_base")]
    pub api_base: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_scrape_api_base(),
        }
    }
}

/// Chat-completion API settings (Azure OpenAI-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key (overridden by AZURE_OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: String,

    /// Full chat-completions endpoint URL, including deployment and
    /// api-version query string (overridden by AZURE_OPENAI_ENDPOINT)
    #[serde(default)]
    pub endpoint: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            max_tokens: Some(2000),
        }
    }
}

impl Config {
    /// Environment variables take precedence over file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("FIRECRAWL_API_KEY") {
            if !key.trim().is_empty() {
                self.scrape.api_key = key.trim().to_string();
            }
        }
        if let Ok(key) = std::env::var("AZURE_OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = key.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var("AZURE_OPENAI_ENDPOINT") {
            if !url.trim().is_empty() {
                self.llm.endpoint = url.trim().to_string();
            }
        }
    }
}

fn default_scrape_api_base() -> String {
    "https://api.firecrawl.dev".to_string()
}
