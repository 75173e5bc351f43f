//! Error types for Starling

use thiserror::Error;

/// Result type alias for Starling operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Starling operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Agent transport error (spawn failure, broken stream, bad exit).
    /// Messages are self-describing; callers add their own framing.
    #[error("{0}")]
    Agent(String),

    /// Configuration or credential error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The review target is missing or not a reviewable file type
    #[error("{0}")]
    Target(String),
}
