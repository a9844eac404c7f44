//! The tool-discovery pipeline: normalize, search sources, enrich, rank.
//!
//! Terminal states are "N >= 1 enriched records" or "one synthesized fallback
//! record"; a non-empty query never resolves to an empty list.

use crate::finder::enrich::Enricher;
use crate::finder::fallback::fallback_record;
use crate::finder::normalize::normalize_query;
use crate::finder::rank::rank_tools;
use crate::finder::record::{Candidate, ToolRecord};
use crate::finder::sources::{CandidateSource, DirectorySource, WebSearchSource};
use crate::llm::AnalysisApi;
use crate::scrape::ScrapeApi;
use std::sync::Arc;

/// Only the first few candidates proceed to detail enrichment, bounding
/// external-call cost per search.
const MAX_ENRICHED_CANDIDATES: usize = 3;

/// Pipeline-level errors
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("query is empty")]
    EmptyQuery,
}

/// Tool discovery pipeline with explicitly injected adapters.
///
/// Each `find_tools` call is an independent run with no shared mutable state;
/// overlapping searches don't interact, and cancellation is the caller's
/// concern (drop the future).
pub struct ToolFinder {
    analyst: Arc<dyn AnalysisApi>,
    sources: Vec<Box<dyn CandidateSource>>,
    enricher: Enricher,
}

impl ToolFinder {
    /// Standard configuration: directory source first, generic web search as
    /// the fallback channel.
    pub fn new(scraper: Arc<dyn ScrapeApi>, analyst: Arc<dyn AnalysisApi>) -> Self {
        let sources: Vec<Box<dyn CandidateSource>> = vec![
            Box::new(DirectorySource::new(Arc::clone(&scraper))),
            Box::new(WebSearchSource::new(Arc::clone(&scraper))),
        ];
        Self::with_sources(scraper, analyst, sources)
    }

    pub fn with_sources(
        scraper: Arc<dyn ScrapeApi>,
        analyst: Arc<dyn AnalysisApi>,
        sources: Vec<Box<dyn CandidateSource>>,
    ) -> Self {
        Self {
            enricher: Enricher::new(scraper, Arc::clone(&analyst)),
            analyst,
            sources,
        }
    }

    /// Run one discovery. Resolves to at least one record for every
    /// non-empty query; empty/whitespace queries are rejected up front.
    pub async fn find_tools(&self, raw_query: &str) -> Result<Vec<ToolRecord>, FinderError> {
        if raw_query.trim().is_empty() {
            return Err(FinderError::EmptyQuery);
        }

        let run_id = uuid::Uuid::new_v4();
        let query = normalize_query(raw_query);

        tracing::info!(
            run_id = %run_id,
            raw_query = %raw_query,
            query = %query,
            "tool discovery start"
        );

        let candidates = self.discover_candidates(&query).await;
        if candidates.is_empty() {
            tracing::info!(run_id = %run_id, "no candidates from any source, synthesizing fallback");
            return Ok(vec![fallback_record(&query)]);
        }

        let mut enriched = Vec::new();
        for candidate in candidates.iter().take(MAX_ENRICHED_CANDIDATES) {
            let record = self.enricher.enrich(candidate, &query).await;
            if record.is_valid() {
                enriched.push(record);
            } else {
                // Defaults make this unreachable for well-formed candidates,
                // but never emit an invalid record.
                tracing::warn!(tool = %candidate.name, "dropping invalid enriched record");
            }
        }

        if enriched.is_empty() {
            return Ok(vec![fallback_record(&query)]);
        }

        let ranked = rank_tools(self.analyst.as_ref(), &query, enriched).await;

        tracing::info!(run_id = %run_id, results = ranked.len(), "tool discovery done");
        Ok(ranked)
    }

    /// Query sources in order, stopping at the first non-empty candidate set.
    /// Listicle headlines are filtered here, before any enrichment spend.
    async fn discover_candidates(&self, query: &str) -> Vec<Candidate> {
        for source in &self.sources {
            match source.discover(query).await {
                Ok(candidates) => {
                    let kept: Vec<Candidate> = candidates
                        .into_iter()
                        .filter(|c| {
                            if c.looks_like_listicle() {
                                tracing::debug!(name = %c.name, "filtered listicle candidate");
                                false
                            } else {
                                true
                            }
                        })
                        .collect();

                    if kept.is_empty() {
                        tracing::debug!(source = source.label(), "source yielded no candidates");
                        continue;
                    }

                    tracing::info!(
                        source = source.label(),
                        count = kept.len(),
                        "source yielded candidates"
                    );
                    return kept;
                }
                Err(e) => {
                    tracing::warn!(
                        source = source.label(),
                        error = %e,
                        "source failed, trying next"
                    );
                }
            }
        }

        Vec::new()
    }
}
