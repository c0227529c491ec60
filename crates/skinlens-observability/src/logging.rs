//! Structured logging setup
//!
//! `RUST_LOG`, when set, takes precedence over the configured level.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{0}': {1}")]
    InvalidFilter(String, String),

    #[error("Failed to install global subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Build the filter from `RUST_LOG` or the configured level
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level)
        .map_err(|e| LoggingError::InvalidFilter(level.to_string(), e.to_string()))?;

    // Connection pool chatter is only useful when debugging the HTTP stack itself
    for directive in ["hyper_util=warn", "reqwest=warn"] {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => tracing::warn!("Failed to set {} log filter: {}", directive, e),
        }
    }

    Ok(filter)
}

/// Install the global subscriber; logs go to stderr so command output stays clean
pub fn init_logging(level: &str, json: bool) -> Result<(), LoggingError> {
    let filter = build_filter(level)?;

    if json {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_levels() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("skinlens_client=debug,warn").is_ok());
    }
}
