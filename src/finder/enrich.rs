//! Per-candidate enrichment: deep extraction against the tool's own site,
//! LLM gap-filling when that comes back thin, and templated defaults so no
//! record ever reaches the caller with empty detail lists.

use crate::finder::record::{Candidate, Pricing, ToolRecord};
use crate::llm::json::{parse_llm_json, LlmJson};
use crate::llm::{AnalysisApi, AnalysisTask};
use crate::scrape::{ScrapeApi, ScrapeOptions};
use std::sync::Arc;

pub struct Enricher {
    scraper: Arc<dyn ScrapeApi>,
    analyst: Arc<dyn AnalysisApi>,
}

impl Enricher {
    pub fn new(scraper: Arc<dyn ScrapeApi>, analyst: Arc<dyn AnalysisApi>) -> Self {
        Self { scraper, analyst }
    }

    /// Enrich one candidate. Infallible: every failure path degrades to the
    /// templated defaults instead of dropping the candidate.
    pub async fn enrich(&self, candidate: &Candidate, query: &str) -> ToolRecord {
        let mut record = base_record(candidate);

        tracing::debug!(tool = %candidate.name, url = %candidate.url, "enrichment start");

        match self
            .scraper
            .scrape(&candidate.url, &detail_options(&candidate.name))
            .await
        {
            Ok(data) => {
                if let Some(json) = &data.json {
                    apply_detail_json(&mut record, json);
                }
            }
            Err(e) => {
                tracing::warn!(tool = %candidate.name, error = %e, "deep extraction failed");
            }
        }

        if !is_complete(&record) {
            self.enhance(&mut record, query).await;
        }

        apply_defaults(&mut record, query);

        tracing::debug!(
            tool = %record.name,
            features = record.features.len(),
            complete = is_complete(&record),
            "enrichment done"
        );

        record
    }

    /// Ask the LLM to fill the gaps, feeding it whatever we already know.
    async fn enhance(&self, record: &mut ToolRecord, query: &str) {
        let partial =
            serde_json::to_value(&*record).unwrap_or_else(|_| serde_json::json!({}));

        let task = AnalysisTask::Enhance {
            name: record.name.clone(),
            query: query.to_string(),
            partial,
        };

        match self.analyst.analyze(task).await {
            Ok(reply) => match parse_llm_json(&reply) {
                LlmJson::Object(obj) => apply_detail_json(record, &obj),
                LlmJson::Array(_) | LlmJson::Invalid(_) => {
                    tracing::debug!(tool = %record.name, "enhancement reply was not an object");
                }
            },
            Err(e) => {
                tracing::warn!(tool = %record.name, error = %e, "enhancement failed");
            }
        }
    }
}

fn base_record(candidate: &Candidate) -> ToolRecord {
    let mut record = ToolRecord::new(
        candidate.name.trim(),
        candidate.description.trim(),
        candidate.url.trim(),
        candidate.source.as_str(),
    );
    record.upvotes = candidate.upvotes;
    record.tagline = candidate.tagline.clone();
    record
}

fn detail_options(name: &str) -> ScrapeOptions {
    ScrapeOptions::with_extraction(
        detail_schema(),
        format!("Extract product details for the tool \"{name}\" from this page"),
    )
}

fn detail_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "tagline": {"type": "string"},
            "description": {"type": "string"},
            "pricing": {},
            "features": {"type": "array", "items": {"type": "string"}},
            "useCases": {"type": "array", "items": {"type": "string"}},
            "pros": {"type": "array", "items": {"type": "string"}},
            "cons": {"type": "array", "items": {"type": "string"}},
            "categories": {"type": "array", "items": {"type": "string"}},
            "screenshots": {"type": "array", "items": {"type": "string"}},
            "videoEmbed": {"type": "string"},
            "imageUrl": {"type": "string"}
        }
    })
}

/// Merge extracted JSON into the record, filling gaps without clobbering
/// fields the source search already populated.
fn apply_detail_json(record: &mut ToolRecord, json: &serde_json::Value) {
    if record.description.trim().is_empty() {
        if let Some(desc) = string_field(json, "description") {
            record.description = desc;
        }
    }
    if record.tagline.is_none() {
        record.tagline = string_field(json, "tagline");
    }
    if record.pricing.is_none() {
        record.pricing = pricing_field(json.get("pricing"));
    }
    if record.video_embed.is_none() {
        record.video_embed = string_field(json, "videoEmbed");
    }
    if record.image_url.is_none() {
        record.image_url = string_field(json, "imageUrl");
    }

    fill_list(&mut record.features, json, "features");
    fill_list(&mut record.use_cases, json, "useCases");
    fill_list(&mut record.pros, json, "pros");
    fill_list(&mut record.cons, json, "cons");
    fill_list(&mut record.categories, json, "categories");
    fill_list(&mut record.screenshots, json, "screenshots");
}

fn string_field(json: &serde_json::Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn fill_list(target: &mut Vec<String>, json: &serde_json::Value, key: &str) {
    if !target.is_empty() {
        return;
    }

    if let Some(items) = json.get(key).and_then(|v| v.as_array()) {
        *target = items
            .iter()
            .filter_map(|item| item.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

fn pricing_field(value: Option<&serde_json::Value>) -> Option<Pricing> {
    match value? {
        serde_json::Value::String(s) if !s.trim().is_empty() => {
            Some(Pricing::Summary(s.trim().to_string()))
        }
        serde_json::Value::Array(items) => {
            let tiers: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(s) => Some(s.trim().to_string()),
                    serde_json::Value::Object(obj) => {
                        // Tier objects come back as {"plan": ..., "price": ...}
                        let plan = obj.get("plan").and_then(|v| v.as_str())?;
                        let price = obj.get("price").and_then(|v| v.as_str()).unwrap_or("");
                        Some(if price.is_empty() {
                            plan.to_string()
                        } else {
                            format!("{plan}: {price}")
                        })
                    }
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect();

            (!tiers.is_empty()).then_some(Pricing::Tiers(tiers))
        }
        _ => None,
    }
}

fn is_complete(record: &ToolRecord) -> bool {
    !record.description.trim().is_empty()
        && record.tagline.is_some()
        && !record.features.is_empty()
        && !record.use_cases.is_empty()
        && !record.pros.is_empty()
        && !record.cons.is_empty()
}

/// Deterministic templated defaults derived from tool name + query. Applied
/// last, so an emitted record never has empty feature/use-case/pros/cons
/// lists.
fn apply_defaults(record: &mut ToolRecord, query: &str) {
    let name = record.name.clone();

    if record.description.trim().is_empty() {
        record.description = format!("{name} is an AI tool for {query}.");
    }
    if record.tagline.is_none() {
        record.tagline = Some(format!("{name} for {query}"));
    }
    if record.features.is_empty() {
        record.features = vec![format!("Supports {query}")];
    }
    if record.use_cases.is_empty() {
        record.use_cases = vec![query.to_string()];
    }
    if record.pros.is_empty() {
        record.pros = vec![format!("Relevant to {query}")];
    }
    if record.cons.is_empty() {
        record.cons = vec!["Limited public details available".to_string()];
    }
    if record.website_url.is_none() {
        record.website_url = Some(record.url.clone());
    }
    if record.last_updated.is_none() {
        record.last_updated = Some(chrono::Utc::now().to_rfc3339());
    }
}
