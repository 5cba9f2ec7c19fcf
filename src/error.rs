//! Error types for the ADS client.

/// Errors that can occur when querying the ADS API.
#[derive(Debug, thiserror::Error)]
pub enum AdsError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// ADS API returned a non-2xx status. The body is carried verbatim.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required key was missing from the search response envelope.
    #[error("Malformed search response: missing key {key:?}")]
    ResponseParse { key: String },

    /// The envelope was present but had an unexpected shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// A page came back empty although `numFound` promised more records.
    #[error("Page returned no records after {fetched} of {num_found}")]
    ShortPage { fetched: u64, num_found: u64 },

    /// Query parameters rejected at construction time.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Tree depth must be at least 1.
    #[error("Invalid tree depth {0}: depth must be a positive integer")]
    InvalidDepth(u32),

    /// Lazy field resolution requires the record to carry an `id`.
    #[error("Cannot query an article without an id")]
    MissingId,

    /// Records can only be compared when both carry a bibcode.
    #[error("Cannot compare articles without bibcodes")]
    Incomparable,

    /// Lazy field resolution on a record that is not bound to a client.
    #[error("Record is not attached to a client; cannot resolve fields on demand")]
    Detached,

    /// A lookup query returned no record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error (bad URL, bad header value).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for Results using [`AdsError`].
pub type Result<T> = std::result::Result<T, AdsError>;
