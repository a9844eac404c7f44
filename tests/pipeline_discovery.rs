//! Discovery and ranking behavior with scripted sources and adapters.

mod common;

use common::{
    candidate, DetailScraper, FailingScraper, FailingSource, ScriptedAnalyst, StaticSource,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use toolscout::finder::sources::CandidateSource;
use toolscout::finder::ToolFinder;

#[tokio::test]
async fn test_single_candidate_enriched_end_to_end() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    let analyst = Arc::new(ScriptedAnalyst::new());
    let sources: Vec<Box<dyn CandidateSource>> = vec![Box::new(StaticSource::new(
        "directory",
        vec![candidate(
            "ClipWizard",
            "https://clipwizard.app",
            "Edit videos with AI",
        )],
    ))];

    let finder = ToolFinder::with_sources(scraper.clone(), analyst.clone(), sources);
    let tools = finder.find_tools("video editing").await.unwrap();

    assert_eq!(tools.len(), 1);
    let record = &tools[0];
    assert_eq!(record.name, "ClipWizard");
    assert!(record.is_valid());
    assert!(!record.features.is_empty());
    assert!(!record.use_cases.is_empty());
    assert!(!record.pros.is_empty());
    assert!(!record.cons.is_empty());

    // Complete deep extraction means no LLM call at all for one candidate.
    assert_eq!(analyst.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_enrichment_falls_back_to_llm_when_scrape_fails() {
    let analyst = Arc::new(
        ScriptedAnalyst::new().with_reply(
            "enhance",
            r#"{"tagline": "Clips, fast", "features": ["Auto-cut"], "useCases": ["Shorts"],
                "pros": ["Quick"], "cons": ["Subscription"], "description": "LLM description"}"#,
        ),
    );
    let sources: Vec<Box<dyn CandidateSource>> = vec![Box::new(StaticSource::new(
        "directory",
        vec![candidate("ClipWizard", "https://clipwizard.app", "")],
    ))];

    let finder = ToolFinder::with_sources(Arc::new(FailingScraper), analyst, sources);
    let tools = finder.find_tools("video editing").await.unwrap();

    let record = &tools[0];
    assert_eq!(record.tagline.as_deref(), Some("Clips, fast"));
    assert_eq!(record.features, vec!["Auto-cut"]);
    assert_eq!(record.description, "LLM description");
}

#[tokio::test]
async fn test_templated_defaults_when_everything_is_thin() {
    // Deep scrape fails and the LLM is down: the record still ships with
    // deterministic defaults.
    let analyst = Arc::new(ScriptedAnalyst::new());
    let sources: Vec<Box<dyn CandidateSource>> = vec![Box::new(StaticSource::new(
        "web_search",
        vec![candidate("MysteryTool", "https://mystery.example", "")],
    ))];

    let finder = ToolFinder::with_sources(Arc::new(FailingScraper), analyst, sources);
    let tools = finder.find_tools("audio cleanup").await.unwrap();

    let record = &tools[0];
    assert!(record.is_valid());
    assert!(record.description.contains("audio cleanup"));
    assert!(!record.features.is_empty());
    assert!(!record.pros.is_empty());
    assert!(!record.cons.is_empty());
}

#[tokio::test]
async fn test_second_source_used_when_first_is_empty() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    let analyst = Arc::new(ScriptedAnalyst::new());
    let sources: Vec<Box<dyn CandidateSource>> = vec![
        Box::new(StaticSource::new("directory", vec![])),
        Box::new(StaticSource::new(
            "web_search",
            vec![candidate("BackupTool", "https://backup.example", "desc")],
        )),
    ];

    let finder = ToolFinder::with_sources(scraper, analyst, sources);
    let tools = finder.find_tools("note taking").await.unwrap();

    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "BackupTool");
}

#[tokio::test]
async fn test_failing_source_falls_through_to_next() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    let analyst = Arc::new(ScriptedAnalyst::new());
    let sources: Vec<Box<dyn CandidateSource>> = vec![
        Box::new(FailingSource),
        Box::new(StaticSource::new(
            "web_search",
            vec![candidate("SurvivorTool", "https://survivor.example", "desc")],
        )),
    ];

    let finder = ToolFinder::with_sources(scraper, analyst, sources);
    let tools = finder.find_tools("note taking").await.unwrap();

    assert_eq!(tools[0].name, "SurvivorTool");
}

#[tokio::test]
async fn test_listicle_candidates_are_filtered_out() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    let analyst = Arc::new(ScriptedAnalyst::new());
    let sources: Vec<Box<dyn CandidateSource>> = vec![Box::new(StaticSource::new(
        "directory",
        vec![
            candidate("11 Best AI Video Tools", "https://blog.example/best", "roundup"),
            candidate("ClipWizard", "https://clipwizard.app", "desc"),
        ],
    ))];

    let finder = ToolFinder::with_sources(scraper, analyst, sources);
    let tools = finder.find_tools("video editing").await.unwrap();

    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, "ClipWizard");
}

#[tokio::test]
async fn test_candidate_set_is_bounded() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    let analyst = Arc::new(
        // Ranking reply must cover exactly the enriched set.
        ScriptedAnalyst::new().with_reply("rank", r#"["Tool2", "Tool0", "Tool1"]"#),
    );
    let many: Vec<_> = (0..6)
        .map(|i| {
            candidate(
                &format!("Tool{i}"),
                &format!("https://tool{i}.example"),
                "desc",
            )
        })
        .collect();
    let sources: Vec<Box<dyn CandidateSource>> =
        vec![Box::new(StaticSource::new("directory", many))];

    let finder = ToolFinder::with_sources(scraper.clone(), analyst, sources);
    let tools = finder.find_tools("summarize documents").await.unwrap();

    // Only the first 3 candidates are enriched, one scrape each.
    assert_eq!(tools.len(), 3);
    assert_eq!(scraper.scrape_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_ranking_reorders_results() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    let analyst =
        Arc::new(ScriptedAnalyst::new().with_reply("rank", r#"["Beta", "Alpha"]"#));
    let sources: Vec<Box<dyn CandidateSource>> = vec![Box::new(StaticSource::new(
        "directory",
        vec![
            candidate("Alpha", "https://alpha.example", "first"),
            candidate("Beta", "https://beta.example", "second"),
        ],
    ))];

    let finder = ToolFinder::with_sources(scraper, analyst, sources);
    let tools = finder.find_tools("transcription").await.unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Beta", "Alpha"]);
}

#[tokio::test]
async fn test_truncated_ranking_keeps_discovery_order() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    // One name short of the input set: the partial reorder must be ignored.
    let analyst = Arc::new(ScriptedAnalyst::new().with_reply("rank", r#"["Gamma", "Alpha"]"#));
    let sources: Vec<Box<dyn CandidateSource>> = vec![Box::new(StaticSource::new(
        "directory",
        vec![
            candidate("Alpha", "https://alpha.example", "first"),
            candidate("Beta", "https://beta.example", "second"),
            candidate("Gamma", "https://gamma.example", "third"),
        ],
    ))];

    let finder = ToolFinder::with_sources(scraper, analyst, sources);
    let tools = finder.find_tools("transcription").await.unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta", "Gamma"]);
}

#[tokio::test]
async fn test_ranking_failure_keeps_discovery_order() {
    let scraper = Arc::new(DetailScraper::new(DetailScraper::complete_detail()));
    let analyst = Arc::new(ScriptedAnalyst::new()); // rank task unscripted -> error
    let sources: Vec<Box<dyn CandidateSource>> = vec![Box::new(StaticSource::new(
        "directory",
        vec![
            candidate("Alpha", "https://alpha.example", "first"),
            candidate("Beta", "https://beta.example", "second"),
        ],
    ))];

    let finder = ToolFinder::with_sources(scraper, analyst, sources);
    let tools = finder.find_tools("transcription").await.unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
}
