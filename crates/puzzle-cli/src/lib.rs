use std::path::Path;

use puzzle_core::{ErrorMetadata, LogLevel};
use serde_json::{json, Value};

/// Guess a media type from a file name's extension.
pub fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// JSON body printed for a failed command.
pub fn error_body<E>(err: &E) -> Value
where
    E: ErrorMetadata + std::fmt::Display,
{
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, "Command failed"),
        LogLevel::Warn => tracing::warn!(error = %err, "Command failed"),
        LogLevel::Error => tracing::error!(error = %err, "Command failed"),
    }

    json!({
        "success": false,
        "error_code": err.error_code(),
        "message": err.client_message(),
        "recoverable": err.is_recoverable(),
        "suggested_action": err.suggested_action(),
    })
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
