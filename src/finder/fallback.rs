//! Synthesized fallback record for total discovery failure.
//!
//! The pipeline guarantees at least one result per query; when every source
//! comes back empty this deterministic, templated record stands in.

use crate::finder::record::ToolRecord;

/// Build the fallback record for a (normalized) query.
///
/// Name and URL are pure functions of the query; only `last_updated` varies
/// between calls.
pub fn fallback_record(query: &str) -> ToolRecord {
    let title = title_case(query);

    let mut record = ToolRecord::new(
        format!("AI Tool for {title}"),
        format!(
            "No specific tool could be discovered for \"{query}\" right now. \
             This link searches the web for AI tools covering it."
        ),
        search_link(query),
        "fallback",
    );

    record.tagline = Some(format!("Find {title} tools"));
    record.features = vec![
        format!("Web search scoped to {query}"),
        "Curated starting point when discovery fails".to_string(),
    ];
    record.use_cases = vec![query.to_string()];
    record.pros = vec!["Always available".to_string()];
    record.cons = vec!["Not a specific product recommendation".to_string()];
    record.categories = vec!["AI Tools".to_string()];
    record.last_updated = Some(chrono::Utc::now().to_rfc3339());
    record
}

fn search_link(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}",
        urlencoding::encode(&format!("{query} AI tool"))
    )
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
