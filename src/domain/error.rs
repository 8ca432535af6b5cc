//! Error types for projstash.
//!
//! This module defines the centralized error type [`ProjstashError`] and a type alias
//! [`Result`] used by the fallible internals of the crate. Note that the public
//! backend and aggregator operations never return these errors: backends absorb
//! them and degrade to an empty or absent result. Only configuration loading and
//! bootstrap surface them to callers.

use thiserror::Error;

/// The main error type for projstash operations.
///
/// Most variants describe why a single backend operation could not complete.
/// They are logged at the backend boundary and then discarded.
///
/// # Examples
///
/// ```
/// use projstash::ProjstashError;
///
/// fn open_jar() -> Result<(), ProjstashError> {
///     Err(ProjstashError::MediumUnavailable("cookies disabled".to_string()))
/// }
///
/// assert!(open_jar().is_err());
/// ```
#[derive(Debug, Error)]
pub enum ProjstashError {
    /// The project cannot be stored as given (for example, its id is empty).
    #[error("Invalid project: {0}")]
    InvalidProject(String),

    /// JSON encoding or decoding of a project failed.
    ///
    /// Automatically converts from `serde_json::Error`.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored text could not be decoded (bad percent-encoding, missing `=`).
    #[error("Decode error: {0}")]
    Decode(String),

    /// The storage medium cannot be accessed at all.
    ///
    /// Mirrors a browser with cookies disabled or a location that cannot be
    /// read. The string describes which medium failed.
    #[error("Medium unavailable: {0}")]
    MediumUnavailable(String),

    /// The medium refused the write, typically because the entry is too large.
    #[error("Medium rejected write: {0}")]
    MediumRejected(String),

    /// Filesystem I/O failed for a file-backed medium.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for projstash operations.
pub type Result<T> = std::result::Result<T, ProjstashError>;
