//! Error types for pnpm-guard
//!
//! Inspection failures live next to the walker (`core::process_tree::ProcessTreeError`)
//! and never escape it. `GuardError` covers the few things that can go wrong
//! around the check itself.

use std::io;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum GuardError {
    /// Logging could not be set up
    #[error("Logging error: {message}")]
    Logging {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Writing the banner or the ancestry report failed
    #[error("Output error ({target}): {source}")]
    Output {
        target: &'static str,
        #[source]
        source: io::Error,
    },

    /// The report could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GuardError {
    pub fn logging(message: impl Into<String>, source: anyhow::Error) -> Self {
        GuardError::Logging {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn output(target: &'static str, source: io::Error) -> Self {
        GuardError::Output { target, source }
    }
}

pub type GuardResult<T> = Result<T, GuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_error_names_target() {
        let err = GuardError::output("stderr", io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.to_string(), "Output error (stderr): closed");
    }

    #[test]
    fn logging_error_keeps_source() {
        let err = GuardError::logging("bad filter", anyhow::anyhow!("unknown level"));
        assert_eq!(err.to_string(), "Logging error: bad filter");
        let source = std::error::Error::source(&err).expect("source attached");
        assert_eq!(source.to_string(), "unknown level");
    }
}
