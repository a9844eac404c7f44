//! Candidate sources: the external channels queried for raw tool references.
//!
//! Sources are tried in order and the first non-empty result set wins, so the
//! directory (richer metadata) sits ahead of generic web search.

use crate::finder::record::Candidate;
use crate::scrape::{ProxyMode, ScrapeApi, ScrapeError, ScrapeOptions, SearchOptions};
use std::sync::Arc;

/// A configured external channel the pipeline queries for candidates
#[async_trait::async_trait]
pub trait CandidateSource: Send + Sync {
    /// Provenance tag recorded on candidates from this source
    fn label(&self) -> &'static str;

    /// Return zero or more raw candidates for a normalized query
    async fn discover(&self, query: &str) -> Result<Vec<Candidate>, ScrapeError>;
}

const DIRECTORY_BASE: &str = "https://theresanaiforthat.com";

/// AI-tool directory source: deep-scrapes the directory's search page with a
/// structured extraction schema, falling back to regex card extraction over
/// the raw HTML when structured data is missing.
pub struct DirectorySource {
    scraper: Arc<dyn ScrapeApi>,
}

impl DirectorySource {
    pub fn new(scraper: Arc<dyn ScrapeApi>) -> Self {
        Self { scraper }
    }

    fn search_url(query: &str) -> String {
        format!("{}/s/{}/", DIRECTORY_BASE, urlencoding::encode(query))
    }

    fn listing_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tools": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "url": {"type": "string"},
                            "description": {"type": "string"},
                            "tagline": {"type": "string"},
                            "upvotes": {"type": "number"}
                        },
                        "required": ["name"]
                    }
                }
            },
            "required": ["tools"]
        })
    }

    /// Map structured extraction output to candidates. Tolerates both the
    /// schema shape (`{"tools": [...]}`) and a bare array.
    fn candidates_from_json(&self, json: &serde_json::Value, page_url: &str) -> Vec<Candidate> {
        let items = json
            .get("tools")
            .and_then(|t| t.as_array())
            .or_else(|| json.as_array());

        let Some(items) = items else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| {
                let name = item.get("name")?.as_str()?.trim();
                if name.is_empty() {
                    return None;
                }

                // A missing product URL is not fatal while name+description
                // are present; the directory page itself is the last-resort
                // link.
                let url = item
                    .get("url")
                    .and_then(|u| u.as_str())
                    .map(|u| absolutize(u))
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| page_url.to_string());

                Some(Candidate {
                    name: name.to_string(),
                    url,
                    description: item
                        .get("description")
                        .and_then(|d| d.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    source: self.label().to_string(),
                    upvotes: item.get("upvotes").and_then(|u| u.as_u64()),
                    tagline: item
                        .get("tagline")
                        .and_then(|t| t.as_str())
                        .map(|t| t.to_string()),
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl CandidateSource for DirectorySource {
    fn label(&self) -> &'static str {
        "directory"
    }

    async fn discover(&self, query: &str) -> Result<Vec<Candidate>, ScrapeError> {
        let url = Self::search_url(query);
        let options = ScrapeOptions {
            proxy_mode: ProxyMode::Stealth,
            wait_ms: Some(2000),
            ..ScrapeOptions::with_extraction(
                Self::listing_schema(),
                format!("Extract the AI tools listed on this search results page for \"{query}\""),
            )
        };

        let data = self.scraper.scrape(&url, &options).await?;

        if let Some(json) = &data.json {
            let candidates = self.candidates_from_json(json, &url);
            if !candidates.is_empty() {
                tracing::debug!(
                    query = %query,
                    count = candidates.len(),
                    "directory structured extraction produced candidates"
                );
                return Ok(candidates);
            }
        }

        // Structured extraction came back empty (degraded retry, or the API
        // dropped jsonOptions); scrape product cards out of the raw HTML.
        let candidates = match &data.html {
            Some(html) => extract_cards_from_html(html, DIRECTORY_BASE, self.label()),
            None => Vec::new(),
        };

        tracing::debug!(
            query = %query,
            count = candidates.len(),
            "directory html fallback extraction"
        );

        Ok(candidates)
    }
}

/// Regex product-card extraction, kept behind the source so it can be dropped
/// without touching pipeline logic. Fragile by nature: it matches the
/// directory's current markup for tool links.
fn extract_cards_from_html(html: &str, base: &str, source: &str) -> Vec<Candidate> {
    let link = match regex::Regex::new(
        r#"<a[^>]+href="(/ai/[^"]+)"[^>]*>\s*([^<>]{2,80}?)\s*</a>"#,
    ) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(error = %e, "card extraction regex failed to compile");
            return Vec::new();
        }
    };

    let mut seen = std::collections::HashSet::new();
    let mut candidates = Vec::new();

    for caps in link.captures_iter(html) {
        let (Some(href), Some(name)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        let name = name.as_str().trim();
        if name.is_empty() || !seen.insert(href.as_str().to_string()) {
            continue;
        }

        candidates.push(Candidate {
            name: name.to_string(),
            url: format!("{}{}", base, href.as_str()),
            description: String::new(),
            source: source.to_string(),
            upvotes: None,
            tagline: None,
        });
    }

    candidates
}

fn absolutize(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with('/') {
        format!("{}{}", DIRECTORY_BASE, trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Generic web-search source: maps search result documents to candidates.
pub struct WebSearchSource {
    scraper: Arc<dyn ScrapeApi>,
}

impl WebSearchSource {
    pub fn new(scraper: Arc<dyn ScrapeApi>) -> Self {
        Self { scraper }
    }
}

#[async_trait::async_trait]
impl CandidateSource for WebSearchSource {
    fn label(&self) -> &'static str {
        "web_search"
    }

    async fn discover(&self, query: &str) -> Result<Vec<Candidate>, ScrapeError> {
        let options = SearchOptions::default();
        let documents = self
            .scraper
            .search(&format!("{query} AI tool"), &options)
            .await?;

        let candidates: Vec<Candidate> = documents
            .iter()
            .filter_map(|doc| {
                let name = doc.page_title()?.trim();
                let url = doc.page_url()?;

                let description = doc
                    .description
                    .clone()
                    .or_else(|| doc.metadata.description.clone())
                    .or_else(|| {
                        doc.markdown
                            .as_ref()
                            .map(|md| md.chars().take(200).collect())
                    })
                    .unwrap_or_default();

                Some(Candidate {
                    name: name.to_string(),
                    url: url.to_string(),
                    description,
                    source: self.label().to_string(),
                    upvotes: None,
                    tagline: None,
                })
            })
            .collect();

        tracing::debug!(query = %query, count = candidates.len(), "web search candidates");
        Ok(candidates)
    }
}
