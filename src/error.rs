//! Error types for vidshelf
//!
//! Only catalog loading and configuration can fail. Malformed records are
//! absorbed by the pipeline and never show up here.

use thiserror::Error;

/// Coarse error categories, stable across variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Network errors
    NetworkError,

    // Catalog errors
    CatalogParseError,

    // User errors
    InvalidConfig,

    // System errors
    FileError,
}

/// Main error type for vidshelf
#[derive(Error, Debug)]
pub enum VidshelfError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse catalog: {0}")]
    CatalogParse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VidshelfError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::NetworkError,
            Self::CatalogParse(_) => ErrorCode::CatalogParseError,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Self::File(_) => ErrorCode::FileError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::Json(_) => ErrorCode::CatalogParseError,
        }
    }
}

pub type Result<T> = std::result::Result<T, VidshelfError>;
