//! Query normalization: strip conversational filler so the search terms that
//! reach the external services are the ones that carry meaning.

/// Filler words dropped from queries ("I need a tool that can help with...")
const STOP_WORDS: &[&str] = &[
    "i", "a", "an", "the", "am", "is", "are", "me", "my", "to", "of", "for", "that", "which",
    "can", "could", "would", "should", "please", "need", "needs", "want", "wants", "looking",
    "searching", "find", "help", "helps", "with", "some", "something", "tool", "tools", "app",
    "apps", "software", "recommend", "suggestion", "suggestions",
];

/// Normalize a raw user query: lowercase, strip punctuation, drop stop words,
/// collapse whitespace.
///
/// If stripping would empty a non-empty query ("find me a tool"), the
/// whitespace-collapsed raw query is returned instead, so downstream calls
/// always receive something searchable. Idempotent by construction.
pub fn normalize_query(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let cleaned: String = trimmed
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    let kept: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect();

    if kept.is_empty() {
        // All filler; fall back to the raw query, whitespace-collapsed.
        return trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    kept.join(" ")
}
