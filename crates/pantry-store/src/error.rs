use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// User input was empty or otherwise unusable. Nothing was written.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The referenced row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A location cannot be deleted while items still point at it.
    #[error("Location {location_id} is still used by {item_count} item(s)")]
    ReferentialIntegrity { location_id: i64, item_count: i64 },

    /// Opening the store or applying the schema failed.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// A JSON-encoded setting could not be written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
