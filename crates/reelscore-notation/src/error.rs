//! Error types for reading and writing notation documents.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for notation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding, encoding or unpacking a score
///
/// Only the codec produces errors. Edits on an in-memory score never fail;
/// questionable musical content (an unknown beat unit, an unreadable tempo)
/// is handled by the consumer with defaults.
#[derive(Error, Debug)]
pub enum Error {
    /// Input/Output error when reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The document is not well-formed XML
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An element carries a malformed attribute
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// The compressed container could not be read
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The document has no `score-partwise` root
    ///
    /// Timewise scores and arbitrary XML documents are rejected here.
    #[error("Expected a score-partwise document, found <{0}>")]
    UnexpectedRoot(String),

    /// The document ended before its root element was closed
    #[error("Unexpected end of document")]
    UnexpectedEof,

    /// A value could not be converted to the expected type
    ///
    /// For example a non-numeric `<beats>` inside a time signature.
    #[error("Invalid value '{value}' for <{element}>")]
    InvalidValue {
        /// The element whose content was rejected
        element: String,
        /// The rejected text
        value: String,
    },

    /// The container manifest lists no root file
    #[error("No MusicXML root file found in container.xml")]
    NoRootFile,

    /// The container does not hold the file the manifest points to
    #[error("File not found in container: {0}")]
    FileNotFound(PathBuf),
}
