use serde::{Deserialize, Serialize};

/// The unit produced by the pipeline and consumed by callers.
///
/// `name`, `description`, `url`, and `source` are always populated; the rest
/// depend on how much detail enrichment recovered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    pub name: String,
    pub description: String,
    pub url: String,
    /// Provenance tag: which discovery path produced this record
    pub source: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<Pricing>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pros: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub screenshots: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_embed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvotes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
}

impl ToolRecord {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            url: url.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// A record may only be emitted once name, description, and url are
    /// non-empty.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.url.trim().is_empty()
    }
}

/// Pricing is either a one-line summary or a list of tier labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pricing {
    Summary(String),
    Tiers(Vec<String>),
}

/// A raw, unenriched tool reference returned by a source search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    #[serde(default)]
    pub upvotes: Option<u64>,
    #[serde(default)]
    pub tagline: Option<String>,
}

/// Markers that indicate an aggregator roundup article rather than a single
/// product ("11 Best AI Tools To Use In 2025" and friends).
const LISTICLE_MARKERS: &[&str] = &["best", "top ", "tools to use", "tools for", "roundup"];

impl Candidate {
    /// True when the candidate's name reads like a listicle headline
    pub fn looks_like_listicle(&self) -> bool {
        let lowered = self.name.to_lowercase();
        LISTICLE_MARKERS.iter().any(|m| lowered.contains(m))
    }
}
