//! Error types for the composition engine.

use thiserror::Error;

/// Result type alias for composition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading projects or library pieces.
///
/// Degraded musical input (no match, malformed tempo marks, empty pieces)
/// is never an error; it falls back to defaults and is logged.
#[derive(Debug, Error)]
pub enum Error {
    /// Notation decoding/encoding error
    #[error("Notation error: {0}")]
    Notation(#[from] reelscore_notation::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A library source was asked for a piece it does not hold
    #[error("Piece not found: {0}")]
    PieceNotFound(String),
}
