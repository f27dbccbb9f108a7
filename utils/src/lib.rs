//! Shared utilities for the discount monitor workspace.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const PLACEHOLDER_PREFIXES: &[&str] = &["YOUR_", "YOUR-", "REPLACE_", "CHANGEME"];

/// Returns `true` for values that are blank or look like an unfilled template
/// entry, e.g. `YOUR_TELEGRAM_CHAT_ID`, `<chat_id>` or `changeme`.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    if value.starts_with('<') && value.ends_with('>') {
        return true;
    }
    let upper = value.to_ascii_uppercase();
    PLACEHOLDER_PREFIXES
        .iter()
        .any(|prefix| upper.starts_with(prefix))
}

/// Sets up logging to both console and an append-only log file.
///
/// - Console: respects `RUST_LOG`, defaults to `info`
/// - File: `info` for everything, no ANSI colors, never rotated
///
/// The returned guard must be kept alive for the duration of the program so
/// buffered lines are flushed to the file on exit.
pub fn init_logging(log_file: &Path) -> Result<WorkerGuard> {
    let log_dir = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", log_file.display()))?;
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_filter = EnvFilter::new("info");

    let console_layer = fmt::layer().with_target(false).with_filter(console_filter);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(non_blocking_file)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    info!("Logging to file: {}", log_file.display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_placeholders() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("   "));
    }

    #[test]
    fn template_values_are_placeholders() {
        assert!(is_placeholder("YOUR_TELEGRAM_CHAT_ID"));
        assert!(is_placeholder("your_coinmarketcap_api_key"));
        assert!(is_placeholder("<chat_id>"));
        assert!(is_placeholder("changeme"));
        assert!(is_placeholder("REPLACE_ME"));
    }

    #[test]
    fn real_values_pass() {
        assert!(!is_placeholder("-1001234567890"));
        assert!(!is_placeholder("@carrot_alerts"));
        assert!(!is_placeholder("123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11"));
    }
}
