//! Piece libraries.
//!
//! A [`Library`] answers one question: which of its pieces best matches a
//! scene description. Three forms share that contract:
//!
//! - [`InMemoryLibrary`] - pieces already decoded and held in memory
//! - [`FileLibrary`] - pieces decoded from a [`FileSource`] on every lookup
//!   (a directory on disk, or the embedded standard library)
//! - [`MultiSourceLibrary`] - an ordered list of libraries; the best match
//!   across all of them wins, earlier sources winning ties
//!
//! Pieces are matched on their concatenated text: credits, then every
//! words and rehearsal direction in document order.

use crate::error::{Error, Result};
use crate::matcher;
use reelscore_notation::{codec, Score};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File extensions a directory library picks up.
pub const PIECE_EXTENSIONS: &[&str] = &["musicxml", "xml", "mxl"];

/// A matched piece and its similarity to the query.
///
/// Similarity values are only comparable within one lookup.
#[derive(Debug, Clone)]
pub struct CandidateMatch {
    pub piece: Arc<Score>,
    pub similarity: usize,
}

/// Lookup of the piece that best matches a description.
pub trait Library {
    /// Best-matching piece, or `None` when the library holds no pieces.
    fn best_match(&self, description: &str) -> Option<CandidateMatch>;
}

/// Text a piece is matched on.
pub fn match_text(piece: &Score) -> String {
    piece.text_fields().join(" ")
}

/// Rank `pieces` against `description` and return the winner.
fn best_of(description: &str, pieces: Vec<Score>) -> Option<CandidateMatch> {
    let texts: Vec<String> = pieces.iter().map(match_text).collect();
    let best = matcher::best(description, &texts)?;
    let piece = pieces.into_iter().nth(best.index)?;
    Some(CandidateMatch {
        piece: Arc::new(piece),
        similarity: best.score,
    })
}

/// Library of pieces held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLibrary {
    pieces: Vec<Arc<Score>>,
}

impl InMemoryLibrary {
    pub fn new(pieces: Vec<Score>) -> Self {
        Self {
            pieces: pieces.into_iter().map(Arc::new).collect(),
        }
    }

    /// Add a piece.
    pub fn push(&mut self, piece: Score) {
        self.pieces.push(Arc::new(piece));
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl Library for InMemoryLibrary {
    fn best_match(&self, description: &str) -> Option<CandidateMatch> {
        let texts: Vec<String> = self.pieces.iter().map(|p| match_text(p)).collect();
        let best = matcher::best(description, &texts)?;
        Some(CandidateMatch {
            piece: Arc::clone(&self.pieces[best.index]),
            similarity: best.score,
        })
    }
}

/// A named collection of raw piece files.
pub trait FileSource {
    /// Short name used in log messages.
    fn label(&self) -> String;

    /// File names, in a stable order.
    fn names(&self) -> Vec<String>;

    /// Raw contents of one file.
    fn read(&self, name: &str) -> Result<Vec<u8>>;
}

/// MusicXML files in one directory (not recursive).
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn has_piece_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| PIECE_EXTENSIONS.iter().any(|p| e.eq_ignore_ascii_case(p)))
        .unwrap_or(false)
}

impl FileSource for DirectorySource {
    fn label(&self) -> String {
        self.root.display().to_string()
    }

    fn names(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!(
                    "Failed to read library directory {}: {}",
                    self.root.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_piece_extension(path))
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect();
        names.sort();
        names
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        Ok(fs::read(self.root.join(name))?)
    }
}

/// The pieces embedded in the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSource;

impl FileSource for StandardSource {
    fn label(&self) -> String {
        "standard".to_string()
    }

    fn names(&self) -> Vec<String> {
        reelscore_std::piece_names()
    }

    fn read(&self, name: &str) -> Result<Vec<u8>> {
        reelscore_std::read_piece(name)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| Error::PieceNotFound(name.to_string()))
    }
}

/// Library decoding the files of a [`FileSource`] at lookup time.
#[derive(Debug, Clone)]
pub struct FileLibrary<S> {
    source: S,
}

impl<S: FileSource> FileLibrary<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decode one file.
    pub fn load(&self, name: &str) -> Result<Score> {
        let bytes = self.source.read(name)?;
        Ok(codec::decode_bytes(name, &bytes)?)
    }

    /// Decode every file, in name order.
    ///
    /// A file that cannot be read or decoded is logged and left out, so it
    /// never wins a lookup over a readable piece.
    pub fn pieces(&self) -> Vec<Score> {
        let names = self.source.names();
        let pieces: Vec<Score> = names
            .iter()
            .filter_map(|name| match self.load(name) {
                Ok(piece) => Some(piece),
                Err(e) => {
                    log::error!("Failed to decode {} from '{}': {}", name, self.source.label(), e);
                    None
                }
            })
            .collect();

        log::info!(
            "Library '{}' loaded: {} of {} piece(s)",
            self.source.label(),
            pieces.len(),
            names.len()
        );
        pieces
    }
}

impl FileLibrary<DirectorySource> {
    /// Library over the MusicXML files of `root`.
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        Self::new(DirectorySource::new(root))
    }
}

impl FileLibrary<StandardSource> {
    /// Library over the embedded standard pieces.
    pub fn standard() -> Self {
        Self::new(StandardSource)
    }
}

impl<S: FileSource> Library for FileLibrary<S> {
    fn best_match(&self, description: &str) -> Option<CandidateMatch> {
        best_of(description, self.pieces())
    }
}

/// Ordered list of libraries searched as one.
#[derive(Default)]
pub struct MultiSourceLibrary {
    libraries: Vec<Box<dyn Library>>,
}

impl MultiSourceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append a library.
    pub fn with(mut self, library: impl Library + 'static) -> Self {
        self.push(library);
        self
    }

    /// Append a library; later libraries lose ties.
    pub fn push(&mut self, library: impl Library + 'static) {
        self.libraries.push(Box::new(library));
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

impl Library for MultiSourceLibrary {
    fn best_match(&self, description: &str) -> Option<CandidateMatch> {
        let mut best: Option<CandidateMatch> = None;
        for library in &self.libraries {
            let Some(candidate) = library.best_match(description) else {
                continue;
            };
            match &best {
                Some(current) if candidate.similarity <= current.similarity => {}
                _ => best = Some(candidate),
            }
        }
        best
    }
}

impl<L: Library + ?Sized> Library for &L {
    fn best_match(&self, description: &str) -> Option<CandidateMatch> {
        (**self).best_match(description)
    }
}

impl<L: Library + ?Sized> Library for Box<L> {
    fn best_match(&self, description: &str) -> Option<CandidateMatch> {
        (**self).best_match(description)
    }
}
