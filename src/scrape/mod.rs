pub mod firecrawl;

pub use firecrawl::FirecrawlClient;

use serde::{Deserialize, Serialize};

/// Scrape/search client abstraction - the pipeline only sees this trait, so
/// tests and alternative providers can be plugged in.
#[async_trait::async_trait]
pub trait ScrapeApi: Send + Sync {
    /// Fetch a single page, optionally with structured extraction
    async fn scrape(&self, url: &str, options: &ScrapeOptions) -> Result<ScrapeData, ScrapeError>;

    /// Crawl a site starting from `url`, returning one document per page
    async fn crawl(&self, url: &str, options: &CrawlOptions) -> Result<Vec<Document>, ScrapeError>;

    /// Free-text web search returning result documents
    async fn search(&self, query: &str, options: &SearchOptions)
        -> Result<Vec<Document>, ScrapeError>;
}

/// Anti-bot proxy strategy passed to the scraping API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyMode {
    #[default]
    Basic,
    Stealth,
}

impl ProxyMode {
    /// The other strategy - tried after a failed attempt
    pub fn toggled(self) -> Self {
        match self {
            ProxyMode::Basic => ProxyMode::Stealth,
            ProxyMode::Stealth => ProxyMode::Basic,
        }
    }
}

impl std::fmt::Display for ProxyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyMode::Basic => write!(f, "basic"),
            ProxyMode::Stealth => write!(f, "stealth"),
        }
    }
}

/// Output format requested from the scraping API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeFormat {
    Markdown,
    Html,
    Json,
}

/// Structured extraction: a JSON-schema-like object plus a natural-language
/// prompt describing the desired fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonExtraction {
    pub schema: serde_json::Value,
    pub prompt: String,
}

/// Options for a single-page scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    pub formats: Vec<ScrapeFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_options: Option<JsonExtraction>,
    #[serde(rename = "proxy")]
    pub proxy_mode: ProxyMode,
    #[serde(rename = "waitFor", skip_serializing_if = "Option::is_none")]
    pub wait_ms: Option<u64>,
    pub only_main_content: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            formats: vec![ScrapeFormat::Markdown],
            json_options: None,
            proxy_mode: ProxyMode::Basic,
            wait_ms: None,
            only_main_content: true,
        }
    }
}

impl ScrapeOptions {
    /// Markdown + HTML + structured extraction, the full-fat configuration
    pub fn with_extraction(schema: serde_json::Value, prompt: impl Into<String>) -> Self {
        Self {
            formats: vec![ScrapeFormat::Markdown, ScrapeFormat::Html, ScrapeFormat::Json],
            json_options: Some(JsonExtraction {
                schema,
                prompt: prompt.into(),
            }),
            ..Self::default()
        }
    }

    /// Minimal configuration used on the last retry: markdown only, no
    /// structured extraction, to maximize the odds of a partial success.
    pub fn degraded(&self) -> Self {
        Self {
            formats: vec![ScrapeFormat::Markdown],
            json_options: None,
            proxy_mode: self.proxy_mode,
            wait_ms: None,
            only_main_content: true,
        }
    }
}

/// Options for a multi-page crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlOptions {
    pub limit: usize,
    pub scrape_options: ScrapeOptions,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            scrape_options: ScrapeOptions::default(),
        }
    }
}

/// Options for a free-text search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    pub limit: usize,
    pub fetch_page_content: bool,
    pub only_main_content: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            fetch_page_content: true,
            only_main_content: true,
        }
    }
}

/// Payload of a successful single-page scrape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeData {
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub json: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl ScrapeData {
    /// Plain-text body: markdown when present, otherwise text rendered from
    /// the HTML payload.
    pub fn text_content(&self) -> String {
        if let Some(md) = &self.markdown {
            if !md.trim().is_empty() {
                return md.clone();
            }
        }
        if let Some(html) = &self.html {
            return html2text::from_read(html.as_bytes(), 100);
        }
        String::new()
    }
}

/// One page from a crawl or search result set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Best-effort page URL: top-level field, else metadata sourceURL
    pub fn page_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .or(self.metadata.source_url.as_deref())
            .filter(|u| !u.trim().is_empty())
    }

    /// Best-effort page title
    pub fn page_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.metadata.title.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// Page metadata block as returned by the scraping API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "sourceURL")]
    pub source_url: Option<String>,
}

/// Scraping-related errors
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Scrape API key not configured")]
    MissingCredentials,

    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    Exhausted {
        operation: &'static str,
        attempts: u32,
        last_error: String,
    },
}
