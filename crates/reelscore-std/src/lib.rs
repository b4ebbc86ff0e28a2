//! reelscore standard library.
//!
//! A small set of photoplay pieces (agitato, misterioso, doloroso, love
//! theme) compiled into the binary, so that a composition can be made
//! without any local library configured.
//!
//! # Layout
//!
//! - `library/*.musicxml` - uncompressed partwise MusicXML, one piece per file
//!
//! Every piece carries a work title, a composer credit, a tempo mark and
//! rehearsal marks, which is what the composer needs to match and cut it.
//!
//! # Export
//!
//! [`extract_library`] writes the embedded files to a directory, as a
//! starting point for a local library.

use include_dir::{include_dir, Dir};
use std::path::Path;

/// Embedded library directory (compiled into the binary)
static LIBRARY_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/library");

/// File extension of the embedded pieces.
pub const PIECE_EXTENSION: &str = "musicxml";

/// Get the embedded library directory for direct access.
pub fn embedded_library() -> &'static Dir<'static> {
    &LIBRARY_DIR
}

/// Names of all embedded pieces, sorted.
pub fn piece_names() -> Vec<String> {
    let mut names: Vec<String> = LIBRARY_DIR
        .files()
        .filter(|f| f.path().extension().and_then(|e| e.to_str()) == Some(PIECE_EXTENSION))
        .filter_map(|f| f.path().to_str().map(String::from))
        .collect();
    names.sort();
    names
}

/// Raw contents of the embedded piece `name`.
pub fn read_piece(name: &str) -> Option<&'static [u8]> {
    LIBRARY_DIR.get_file(name).map(|f| f.contents())
}

/// Write every embedded piece into `target`, creating it if needed.
///
/// Existing files with the same names are overwritten. Returns the number of
/// files written.
pub fn extract_library(target: &Path) -> std::io::Result<usize> {
    std::fs::create_dir_all(target)?;

    let mut written = 0;
    for file in LIBRARY_DIR.files() {
        std::fs::write(target.join(file.path()), file.contents())?;
        written += 1;
    }
    Ok(written)
}
