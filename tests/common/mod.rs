//! Shared fakes for pipeline integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use toolscout::finder::record::Candidate;
use toolscout::finder::sources::CandidateSource;
use toolscout::llm::{AnalysisApi, AnalysisTask, LlmError};
use toolscout::scrape::{
    CrawlOptions, Document, ScrapeApi, ScrapeData, ScrapeError, ScrapeOptions, SearchOptions,
};

/// Scraper whose every call fails, as if the remote service were down
pub struct FailingScraper;

#[async_trait]
impl ScrapeApi for FailingScraper {
    async fn scrape(&self, _url: &str, _options: &ScrapeOptions) -> Result<ScrapeData, ScrapeError> {
        Err(ScrapeError::Api("service unavailable".to_string()))
    }

    async fn crawl(&self, _url: &str, _options: &CrawlOptions) -> Result<Vec<Document>, ScrapeError> {
        Err(ScrapeError::Api("service unavailable".to_string()))
    }

    async fn search(
        &self,
        _query: &str,
        _options: &SearchOptions,
    ) -> Result<Vec<Document>, ScrapeError> {
        Err(ScrapeError::Api("service unavailable".to_string()))
    }
}

/// Scraper that answers every deep-extraction scrape with the same JSON
pub struct DetailScraper {
    pub detail: serde_json::Value,
    pub scrape_calls: AtomicU32,
}

impl DetailScraper {
    pub fn new(detail: serde_json::Value) -> Self {
        Self {
            detail,
            scrape_calls: AtomicU32::new(0),
        }
    }

    pub fn complete_detail() -> serde_json::Value {
        serde_json::json!({
            "tagline": "Does the thing",
            "description": "A thorough description of the tool.",
            "pricing": "Free tier, Pro $10/mo",
            "features": ["Fast", "Accurate"],
            "useCases": ["Everyday work"],
            "pros": ["Easy to start"],
            "cons": ["Needs an account"],
            "categories": ["Productivity"]
        })
    }
}

#[async_trait]
impl ScrapeApi for DetailScraper {
    async fn scrape(&self, _url: &str, _options: &ScrapeOptions) -> Result<ScrapeData, ScrapeError> {
        self.scrape_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ScrapeData {
            json: Some(self.detail.clone()),
            ..ScrapeData::default()
        })
    }

    async fn crawl(&self, _url: &str, _options: &CrawlOptions) -> Result<Vec<Document>, ScrapeError> {
        Ok(Vec::new())
    }

    async fn search(
        &self,
        _query: &str,
        _options: &SearchOptions,
    ) -> Result<Vec<Document>, ScrapeError> {
        Ok(Vec::new())
    }
}

/// Analyst whose every call fails
pub struct FailingAnalyst;

#[async_trait]
impl AnalysisApi for FailingAnalyst {
    async fn analyze(&self, _task: AnalysisTask) -> Result<String, LlmError> {
        Err(LlmError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }
}

/// Analyst that answers from a canned reply table keyed by task label;
/// unknown tasks fail.
pub struct ScriptedAnalyst {
    replies: HashMap<&'static str, String>,
    pub calls: AtomicU32,
}

impl ScriptedAnalyst {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_reply(mut self, task_label: &'static str, reply: impl Into<String>) -> Self {
        self.replies.insert(task_label, reply.into());
        self
    }
}

#[async_trait]
impl AnalysisApi for ScriptedAnalyst {
    async fn analyze(&self, task: AnalysisTask) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.replies.get(task.label()) {
            Some(reply) => Ok(reply.clone()),
            None => Err(LlmError::Api {
                status: 500,
                message: format!("no scripted reply for task {}", task.label()),
            }),
        }
    }
}

/// Source returning a fixed candidate list
pub struct StaticSource {
    pub label: &'static str,
    pub candidates: Vec<Candidate>,
}

impl StaticSource {
    pub fn new(label: &'static str, candidates: Vec<Candidate>) -> Self {
        Self { label, candidates }
    }
}

#[async_trait]
impl CandidateSource for StaticSource {
    fn label(&self) -> &'static str {
        self.label
    }

    async fn discover(&self, _query: &str) -> Result<Vec<Candidate>, ScrapeError> {
        Ok(self.candidates.clone())
    }
}

/// Source whose discovery always fails
pub struct FailingSource;

#[async_trait]
impl CandidateSource for FailingSource {
    fn label(&self) -> &'static str {
        "failing"
    }

    async fn discover(&self, _query: &str) -> Result<Vec<Candidate>, ScrapeError> {
        Err(ScrapeError::Api("source down".to_string()))
    }
}

/// Convenience candidate constructor
pub fn candidate(name: &str, url: &str, description: &str) -> Candidate {
    Candidate {
        name: name.to_string(),
        url: url.to_string(),
        description: description.to_string(),
        source: "test".to_string(),
        upvotes: None,
        tagline: None,
    }
}
