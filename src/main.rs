use anyhow::Result;
use std::sync::Arc;
use toolscout::config::Config;
use toolscout::finder::{FinderError, ToolFinder, ToolRecord};
use toolscout::llm::{AnalysisApi, AnalysisTask, AzureChatClient};
use toolscout::scrape::FirecrawlClient;

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let config = toolscout::config::load_or_create_config()?;
    let _log_guard = toolscout::logging::init(&config)?;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json_output = args.iter().any(|a| a == "--json");
    args.retain(|a| a != "--json");

    match args.split_first() {
        None => {
            print_usage();
            Ok(())
        }
        Some((cmd, rest)) if cmd == "chat" => run_chat(&config, &rest.join(" ")).await,
        Some(_) => run_search(&config, &args.join(" "), json_output).await,
    }
}

fn print_usage() {
    eprintln!("Usage: toolscout <query> [--json]");
    eprintln!("       toolscout chat <message>");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  toolscout \"I need a tool for image generation\"");
    eprintln!("  toolscout chat \"which of these is free?\"");
}

async fn run_search(config: &Config, query: &str, json_output: bool) -> Result<()> {
    let scraper = Arc::new(FirecrawlClient::new(&config.scrape));
    let analyst = Arc::new(AzureChatClient::new(&config.llm));
    let finder = ToolFinder::new(scraper, analyst);

    match finder.find_tools(query).await {
        Ok(tools) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else {
                print_tools(&tools);
            }
            Ok(())
        }
        Err(FinderError::EmptyQuery) => {
            print_usage();
            Ok(())
        }
    }
}

fn print_tools(tools: &[ToolRecord]) {
    for (idx, tool) in tools.iter().enumerate() {
        println!("{}. {}", idx + 1, tool.name);
        if let Some(tagline) = &tool.tagline {
            println!("   {}", tagline);
        }
        println!("   {}", tool.url);
        println!("   {}", tool.description);
        if !tool.features.is_empty() {
            println!("   Features: {}", tool.features.join("; "));
        }
        if !tool.use_cases.is_empty() {
            println!("   Use cases: {}", tool.use_cases.join("; "));
        }
        if !tool.pros.is_empty() {
            println!("   Pros: {}", tool.pros.join("; "));
        }
        if !tool.cons.is_empty() {
            println!("   Cons: {}", tool.cons.join("; "));
        }
        if let Some(upvotes) = tool.upvotes {
            println!("   Upvotes: {}", upvotes);
        }
        println!("   Source: {}", tool.source);
        println!();
    }
}

async fn run_chat(config: &Config, message: &str) -> Result<()> {
    if message.trim().is_empty() {
        print_usage();
        return Ok(());
    }

    let analyst = AzureChatClient::new(&config.llm);
    let task = AnalysisTask::Chat {
        message: message.to_string(),
        context: None,
    };

    match analyst.analyze(task).await {
        Ok(reply) => println!("{}", reply),
        Err(e) => {
            // Chat failures surface as a friendly message, not a stack trace.
            tracing::warn!(error = %e, "chat turn failed");
            println!("Sorry, I couldn't process that right now. Please try again in a moment.");
        }
    }

    Ok(())
}
