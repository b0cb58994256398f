//! Error types for the retrieval pipeline
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for index build and corpus ingestion
#[derive(Error, Debug)]
pub enum IndexError {
    /// The corpus supplied to the vectorizer contained no documents
    #[error(
        "Cannot build an index from an empty corpus\nSuggestion: Add at least one document before building"
    )]
    EmptyCorpus,

    /// Requested cluster count is outside [1, document count]
    #[error(
        "Invalid cluster count {k} for a corpus of {documents} documents\nSuggestion: Use a cluster count between 1 and the number of documents"
    )]
    InvalidClusterCount { k: usize, documents: usize },

    /// Two documents were ingested under the same id
    #[error(
        "Duplicate document id '{id}'\nSuggestion: Document ids must be unique within a corpus"
    )]
    DuplicateDocument { id: String },

    /// File system errors during corpus loading
    #[error("Failed to read document '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The corpus directory does not exist or holds no matching files
    #[error(
        "No documents found under '{path}'\nSuggestion: Check the path and the configured corpus extensions"
    )]
    EmptyCorpusDir { path: PathBuf },

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },
}

impl IndexError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::EmptyCorpus => "EMPTY_CORPUS",
            Self::InvalidClusterCount { .. } => "INVALID_CLUSTER_COUNT",
            Self::DuplicateDocument { .. } => "DUPLICATE_DOCUMENT",
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::EmptyCorpusDir { .. } => "EMPTY_CORPUS_DIR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::EmptyCorpus | Self::EmptyCorpusDir { .. } => vec![
                "Point the command at a directory containing .txt or .md files",
                "Use 'corral config' to inspect the configured corpus extensions",
            ],
            Self::InvalidClusterCount { .. } => vec![
                "Lower --clusters to at most the number of documents",
                "A cluster count of 0 is never valid",
            ],
            Self::DuplicateDocument { .. } => {
                vec!["Rename one of the conflicting documents so ids stay unique"]
            }
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(IndexError::EmptyCorpus.status_code(), "EMPTY_CORPUS");
        assert_eq!(
            IndexError::InvalidClusterCount { k: 5, documents: 3 }.status_code(),
            "INVALID_CLUSTER_COUNT"
        );
        assert_eq!(
            IndexError::DuplicateDocument {
                id: "doc-1".to_string()
            }
            .status_code(),
            "DUPLICATE_DOCUMENT"
        );
    }

    #[test]
    fn test_messages_carry_suggestions() {
        let err = IndexError::InvalidClusterCount { k: 9, documents: 4 };
        let msg = err.to_string();
        assert!(msg.contains('9'));
        assert!(msg.contains('4'));
        assert!(msg.contains("Suggestion:"));
    }

    #[test]
    fn test_recovery_suggestions_present() {
        assert!(!IndexError::EmptyCorpus.recovery_suggestions().is_empty());
        assert!(
            !IndexError::InvalidClusterCount { k: 0, documents: 1 }
                .recovery_suggestions()
                .is_empty()
        );
    }
}
