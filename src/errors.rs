//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the Hadith API, providing one error type
//! for startup (loading, configuration) and request-time (lookup, search)
//! failures.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from loader, adapter, handlers
//! - **Output**: Structured error types; HTTP responses via `ResponseError`
//! - **Error Categories**: Loading, Configuration, Lookup, Search
//!
//! ## Key Features
//! - Request-time errors map to exactly two response shapes: 404 with a
//!   JSON `error` field (optionally enriched with diagnostics) and 400 for
//!   a missing search keyword
//! - Startup errors (unreadable or malformed source files) are fatal and
//!   abort the process before any traffic is served

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error types for the Hadith API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A source document failed to parse; fatal at startup
    #[error("Failed to parse document {file:?}: {details}")]
    DocumentParse { file: PathBuf, details: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Unknown collection, optionally carrying lookup diagnostics
    #[error("Book not found")]
    BookNotFound {
        requested: Option<String>,
        available: Option<Vec<String>>,
    },

    /// Unknown section within a known collection
    #[error("Section '{section}' not found in '{book}'")]
    SectionNotFound { section: String, book: String },

    /// Document lacks the expected two-level wrapper or section list
    #[error("Invalid book structure")]
    InvalidStructure,

    /// Search called without a keyword
    #[error("Keyword is required")]
    EmptyKeyword,

    /// Translation service failure (offline utility only)
    #[error("Translation failed: {details}")]
    Translation { details: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Shorthand for the diagnostics-free not-found case.
    pub fn book_not_found() -> Self {
        ApiError::BookNotFound {
            requested: None,
            available: None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::Io(_) | ApiError::DocumentParse { .. } => "loading",
            ApiError::Config { .. } => "configuration",
            ApiError::BookNotFound { .. }
            | ApiError::SectionNotFound { .. }
            | ApiError::InvalidStructure => "lookup",
            ApiError::EmptyKeyword => "search",
            ApiError::Translation { .. } => "translation",
            ApiError::Internal { .. } => "generic",
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal {
            message: format!("JSON serialization error: {}", err),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Translation {
            details: err.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BookNotFound { .. }
            | ApiError::SectionNotFound { .. }
            | ApiError::InvalidStructure => StatusCode::NOT_FOUND,
            ApiError::EmptyKeyword => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::BookNotFound {
                requested: Some(requested),
                available: Some(available),
            } => serde_json::json!({
                "error": "Book not found",
                "requested_book": requested,
                "available_books": available,
            }),
            ApiError::BookNotFound { .. } => serde_json::json!({ "error": "Book not found" }),
            ApiError::EmptyKeyword => serde_json::json!({ "error": "Keyword is required" }),
            other => serde_json::json!({ "error": other.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::book_not_found().status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::SectionNotFound {
                section: "faith".into(),
                book: "sahih-muslim".into()
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::EmptyKeyword.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal {
                message: "boom".into()
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_categories() {
        assert_eq!(ApiError::book_not_found().category(), "lookup");
        assert_eq!(ApiError::EmptyKeyword.category(), "search");
        assert_eq!(
            ApiError::Config {
                message: "bad".into()
            }
            .category(),
            "configuration"
        );
    }
}
