//! Core error types for diagram conversion
//!
//! This module defines the error taxonomy shared by discovery, configuration,
//! rendering, and the batch pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Mmd2svgError>;

/// Core error types for diagram conversion
#[derive(Error, Debug)]
pub enum Mmd2svgError {
    #[error("Input not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No Mermaid files found in: {input}")]
    NoFilesFound { input: String },

    #[error("Failed to load config file: {message}")]
    Config { message: String },

    #[error("Failed to render Mermaid diagram: {message}")]
    Render { message: String },

    #[error("Renderer timeout after {timeout_ms}ms")]
    RenderTimeout { timeout_ms: u64 },

    #[error("Failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Output file already exists: {}", path.display())]
    OutputExists { path: PathBuf },
}

impl Mmd2svgError {
    /// Create a new not-found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a new no-files-found error
    pub fn no_files_found(input: impl Into<String>) -> Self {
        Self::NoFilesFound {
            input: input.into(),
        }
    }

    /// Create a new configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new read error for `path`
    pub fn read_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a new write error for `path`
    pub fn write_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether this error belongs to a single batch item rather than the whole run
    ///
    /// Per-item errors are recorded in a [`BatchResult`](crate::batch::BatchResult);
    /// everything else aborts before any item exists.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            Self::Render { .. }
                | Self::RenderTimeout { .. }
                | Self::Read { .. }
                | Self::Write { .. }
                | Self::OutputExists { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = Mmd2svgError::not_found("docs/missing.mmd");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Input not found"));
        assert!(error_msg.contains("docs/missing.mmd"));
    }

    #[test]
    fn test_no_files_found_error() {
        let error = Mmd2svgError::no_files_found("docs/");
        assert_eq!(error.to_string(), "No Mermaid files found in: docs/");
    }

    #[test]
    fn test_timeout_error() {
        let error = Mmd2svgError::RenderTimeout { timeout_ms: 500 };
        assert!(error.to_string().contains("500ms"));
    }

    #[test]
    fn test_write_error_keeps_source() {
        use std::error::Error as _;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error = Mmd2svgError::write_error("out/a.svg", io_err);
        assert!(error.to_string().contains("out/a.svg"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_per_item_classification() {
        assert!(Mmd2svgError::render_error("boom").is_per_item());
        assert!(Mmd2svgError::RenderTimeout { timeout_ms: 1 }.is_per_item());
        assert!(Mmd2svgError::OutputExists {
            path: PathBuf::from("x.svg")
        }
        .is_per_item());
        assert!(!Mmd2svgError::not_found("x").is_per_item());
        assert!(!Mmd2svgError::no_files_found("x").is_per_item());
        assert!(!Mmd2svgError::config_error("bad").is_per_item());
    }
}
