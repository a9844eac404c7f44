use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub struct LogGuard(tracing_appender::non_blocking::WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled, logs are appended to
/// `~/.config/toolscout/toolscout-debug.log`. When disabled, this is a no-op:
/// the CLI stays quiet and external-call diagnostics are dropped.
pub fn init(config: &crate::config::Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let log_path = default_log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    // Default: debug our crate, warn for everything else.
    let filter =
        EnvFilter::try_new("toolscout=debug,warn").unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // If already initialized (e.g., in tests), don't crash.

    tracing::info!(log_file = %log_path.display(), "debug logging enabled");

    Ok(Some(LogGuard(guard)))
}

fn default_log_path() -> Result<PathBuf> {
    let config_path = crate::config::config_path()?;
    Ok(config_path.with_file_name("toolscout-debug.log"))
}

/// Best-effort redaction of API keys before error bodies hit the log.
///
/// Covers the `sk-` (OpenAI-style) and `fc-` (Firecrawl-style) prefixes.
pub fn redact_secrets(input: &str) -> String {
    let mut out = input.to_string();
    for prefix in ["sk-", "fc-"] {
        out = redact_prefix(&out, prefix);
    }
    out
}

fn redact_prefix(input: &str, prefix: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut last = 0usize;
    let mut i = 0usize;

    while i < input.len() {
        if input[i..].starts_with(prefix) && i + prefix.len() < input.len() {
            let mut j = i + prefix.len();
            while j < input.len() {
                match bytes[j] {
                    b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => j += 1,
                    _ => break,
                }
            }

            // Require a minimum length to reduce false positives.
            if j.saturating_sub(i + prefix.len()) >= 8 {
                out.push_str(&input[last..i]);
                out.push_str(prefix);
                out.push_str("***REDACTED***");
                last = j;
                i = j;
                continue;
            }
        }

        match input[i..].chars().next() {
            Some(ch) => i += ch.len_utf8(),
            None => break,
        }
    }

    out.push_str(&input[last..]);
    out
}
