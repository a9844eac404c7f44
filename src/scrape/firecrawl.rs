use crate::config::ScrapeConfig;
use crate::retry::{Attempt, RetryPolicy};
use crate::scrape::{
    CrawlOptions, Document, ScrapeApi, ScrapeData, ScrapeError, ScrapeOptions, SearchOptions,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SCRAPE_ATTEMPTS: u32 = 3;
const SCRAPE_RETRY_DELAY: Duration = Duration::from_secs(2);
const CRAWL_ATTEMPTS: u32 = 2;
const CRAWL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Firecrawl v1 API client
///
/// Wraps the scrape/crawl/search endpoints with the fixed-ceiling retry
/// policy: proxy mode toggles between attempts and the last scrape attempt
/// degrades to a minimal request shape.
#[derive(Clone)]
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    scrape_policy: RetryPolicy,
    crawl_policy: RetryPolicy,
}

impl FirecrawlClient {
    pub fn new(config: &ScrapeConfig) -> Self {
        Self::from_parts(&config.api_base, &config.api_key)
    }

    pub fn from_parts(api_base: &str, api_key: &str) -> Self {
        if api_key.trim().is_empty() {
            tracing::warn!("scrape API key not set, scraping requests will fail");
        }

        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            scrape_policy: RetryPolicy::new(SCRAPE_ATTEMPTS, SCRAPE_RETRY_DELAY),
            crawl_policy: RetryPolicy::new(CRAWL_ATTEMPTS, CRAWL_RETRY_DELAY),
        }
    }

    /// Override the retry policies (tests use a zero delay)
    pub fn with_policies(mut self, scrape: RetryPolicy, crawl: RetryPolicy) -> Self {
        self.scrape_policy = scrape;
        self.crawl_policy = crawl;
        self
    }

    /// Shape the options for one attempt: toggle the proxy after each
    /// failure, degrade to the minimal configuration on the final retry.
    fn options_for_attempt(base: &ScrapeOptions, attempt: Attempt) -> ScrapeOptions {
        let mut opts = if attempt.is_last && attempt.number > 1 {
            base.degraded()
        } else {
            base.clone()
        };

        if (attempt.number - 1) % 2 == 1 {
            opts.proxy_mode = opts.proxy_mode.toggled();
            tracing::debug!(
                attempt = attempt.number,
                proxy = %opts.proxy_mode,
                "switched proxy mode for retry"
            );
        }

        opts
    }

    async fn post_json<Req, Data>(&self, path: &str, body: &Req) -> Result<Data, ScrapeError>
    where
        Req: Serialize,
        Data: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.api_base, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                path = %path,
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "scrape api returned error"
            );

            return Err(ScrapeError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let envelope: ApiResponse<Data> = response.json().await?;
        if !envelope.success {
            return Err(ScrapeError::Api(
                envelope
                    .error
                    .unwrap_or_else(|| "request reported failure without detail".to_string()),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ScrapeError::Api("successful response carried no data".to_string()))
    }

    fn exhausted(operation: &'static str, attempts: u32, err: ScrapeError) -> ScrapeError {
        ScrapeError::Exhausted {
            operation,
            attempts,
            last_error: err.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ScrapeApi for FirecrawlClient {
    async fn scrape(&self, url: &str, options: &ScrapeOptions) -> Result<ScrapeData, ScrapeError> {
        if self.api_key.is_empty() {
            return Err(ScrapeError::MissingCredentials);
        }

        tracing::debug!(url = %url, formats = ?options.formats, "scrape start");

        let policy = self.scrape_policy;
        policy
            .run("scrape", |attempt| {
                let opts = Self::options_for_attempt(options, attempt);
                async move {
                    let request = ScrapeRequest { url, options: &opts };
                    self.post_json::<_, ScrapeData>("/v1/scrape", &request).await
                }
            })
            .await
            .map_err(|e| Self::exhausted("scrape", policy.max_attempts, e))
    }

    async fn crawl(&self, url: &str, options: &CrawlOptions) -> Result<Vec<Document>, ScrapeError> {
        if self.api_key.is_empty() {
            return Err(ScrapeError::MissingCredentials);
        }

        tracing::debug!(url = %url, limit = options.limit, "crawl start");

        let policy = self.crawl_policy;
        policy
            .run("crawl", |attempt| {
                let mut opts = options.clone();
                opts.scrape_options = Self::options_for_attempt(&options.scrape_options, attempt);
                async move {
                    let request = CrawlRequest {
                        url,
                        limit: opts.limit,
                        scrape_options: &opts.scrape_options,
                    };
                    self.post_json::<_, Vec<Document>>("/v1/crawl", &request).await
                }
            })
            .await
            .map_err(|e| Self::exhausted("crawl", policy.max_attempts, e))
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Document>, ScrapeError> {
        if self.api_key.is_empty() {
            return Err(ScrapeError::MissingCredentials);
        }

        tracing::debug!(query = %query, limit = options.limit, "search start");

        let policy = self.scrape_policy;
        policy
            .run("search", |_attempt| async move {
                let request = SearchRequest { query, options };
                self.post_json::<_, Vec<Document>>("/v1/search", &request).await
            })
            .await
            .map_err(|e| Self::exhausted("search", policy.max_attempts, e))
    }
}

/// Request body for a single-page scrape
#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    #[serde(flatten)]
    options: &'a ScrapeOptions,
}

/// Request body for a multi-page crawl
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CrawlRequest<'a> {
    url: &'a str,
    limit: usize,
    scrape_options: &'a ScrapeOptions,
}

/// Request body for a free-text search
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    #[serde(flatten)]
    options: &'a SearchOptions,
}

/// Success/error envelope around every API response. The `Option` fields
/// deserialize to `None` when absent, so no `default` attribute is needed
/// (it would also force a `Default` bound onto the payload type).
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}
