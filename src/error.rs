//! Error types for spot-scout

use thiserror::Error;

/// Main error type for spot-scout operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Geocoding error: {0}")]
    Geocoding(String),

    #[error("Spot search error: {0}")]
    Search(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Data file error: {0}")]
    DataFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for spot-scout operations
pub type Result<T> = std::result::Result<T, Error>;
