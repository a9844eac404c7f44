//! toolscout library
//!
//! Discovery pipeline and API adapters for finding AI tools that match a
//! natural-language need. The binary in `main.rs` is a thin CLI over this.

pub mod config;
pub mod finder;
pub mod llm;
pub mod logging;
pub mod retry;
pub mod scrape;
