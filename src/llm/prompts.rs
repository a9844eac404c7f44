//! Prompt templates and per-task request parameters.
//!
//! Structured tasks run cold (low temperature) in strict JSON mode; the
//! conversational task runs warmer and returns free text.

use crate::llm::AnalysisTask;

/// Fully rendered prompt pair plus sampling parameters for one task
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub json_mode: bool,
}

/// Build the prompt spec for a task
pub fn build(task: &AnalysisTask) -> PromptSpec {
    match task {
        AnalysisTask::Extract { page, query } => PromptSpec {
            system: "You are a data extraction assistant. You extract software product \
                     listings from web page content and respond only with a JSON array. \
                     Each element must have: name, url, description, and optionally \
                     tagline, upvotes, pricing, categories."
                .to_string(),
            user: format!(
                "Extract every AI tool listed on this page that is relevant to \
                 \"{query}\". Skip navigation, ads, and roundup-article links.\n\n\
                 Page content:\n{page}"
            ),
            temperature: 0.1,
            json_mode: true,
        },
        AnalysisTask::ExtractGeneric { page, query } => PromptSpec {
            system: "You are a data extraction assistant. You read one product's web \
                     page and respond only with a JSON object describing that product: \
                     name, tagline, description, pricing, features, useCases, pros, \
                     cons, categories, screenshots, videoEmbed, imageUrl."
                .to_string(),
            user: format!(
                "Describe the product on this page for someone searching for \
                 \"{query}\". Use null for fields the page does not support.\n\n\
                 Page content:\n{page}"
            ),
            temperature: 0.2,
            json_mode: true,
        },
        AnalysisTask::Rank { tools, query } => {
            let listing = tools
                .iter()
                .map(|t| format!("- {}: {}", t.name, t.description))
                .collect::<Vec<_>>()
                .join("\n");
            PromptSpec {
                system: "You rank software tools by relevance. Respond only with a JSON \
                         array of tool names, best match first. Include every input name \
                         exactly once and do not invent new names."
                    .to_string(),
                user: format!(
                    "Rank these tools by how well they satisfy the need \"{query}\":\n\n{listing}"
                ),
                temperature: 0.1,
                json_mode: true,
            }
        }
        AnalysisTask::Enhance {
            name,
            query,
            partial,
        } => PromptSpec {
            system: "You enrich software product records. Respond only with a JSON \
                     object containing: tagline, description, pricing, features, \
                     useCases, pros, cons, categories. Keep existing values when they \
                     are already good; fill in gaps plausibly."
                .to_string(),
            user: format!(
                "Complete the record for the tool \"{name}\", found while searching \
                 for \"{query}\". Known data so far:\n{}",
                serde_json::to_string_pretty(partial).unwrap_or_else(|_| "{}".to_string())
            ),
            temperature: 0.3,
            json_mode: true,
        },
        AnalysisTask::Chat { message, context } => {
            let system = match context {
                Some(ctx) => format!(
                    "You are a friendly assistant helping a user choose an AI tool. \
                     Ground your answers in the current search results:\n{ctx}"
                ),
                None => "You are a friendly assistant helping a user find and choose \
                         AI tools. Be concise and concrete."
                    .to_string(),
            };
            PromptSpec {
                system,
                user: message.clone(),
                temperature: 0.7,
                json_mode: false,
            }
        }
        AnalysisTask::Recommend { page, query } => PromptSpec {
            system: "You analyze web content about software tools and recommend the \
                     best options. Respond only with a JSON array of tool objects, \
                     each with: name, url, description, and a short reason."
                .to_string(),
            user: format!(
                "Based on this content, recommend tools for \"{query}\":\n\n{page}"
            ),
            temperature: 0.3,
            json_mode: true,
        },
    }
}

/// Canned payload returned for extraction-family tasks when the chat API is
/// unreachable. Shaped like the JSON the task would normally produce, so
/// downstream parsing proceeds unchanged.
pub fn fallback_payload(task: &AnalysisTask) -> String {
    match task {
        AnalysisTask::Extract { query, .. } | AnalysisTask::Recommend { query, .. } => {
            serde_json::json!([{
                "name": format!("AI Tool for {query}"),
                "url": search_link(query),
                "description": format!(
                    "A tool matching \"{query}\". Details could not be analyzed right now."
                ),
            }])
            .to_string()
        }
        AnalysisTask::ExtractGeneric { query, .. } => serde_json::json!({
            "name": format!("AI Tool for {query}"),
            "description": format!(
                "A tool matching \"{query}\". Details could not be analyzed right now."
            ),
            "url": search_link(query),
        })
        .to_string(),
        AnalysisTask::Enhance { name, query, .. } => serde_json::json!({
            "tagline": format!("{name} for {query}"),
            "description": format!("{name} helps with {query}."),
            "features": [format!("Supports {query}")],
            "useCases": [query],
            "pros": ["Matches the searched need"],
            "cons": ["Details unavailable right now"],
        })
        .to_string(),
        // Non-extraction tasks never reach this path.
        AnalysisTask::Rank { .. } | AnalysisTask::Chat { .. } => String::new(),
    }
}

fn search_link(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(query)
    )
}
