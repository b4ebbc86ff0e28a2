//! Configuration file support for reelscore
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/reelscore/config.toml`
//! - macOS: `~/Library/Application Support/reelscore/config.toml`
//! - Windows: `%APPDATA%\reelscore\config.toml`

use crate::error::{Error, Result};
use directories::ProjectDirs;
use reelscore_compose::{
    CandidateMatch, DirectorySource, FileLibrary, FileSource, Library, MultiSourceLibrary,
    StandardSource,
};
use reelscore_notation::{codec, Score};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APPLICATION: &str = "reelscore";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where pieces are looked up
    pub library: LibrarySettings,
    /// Where compositions are written
    pub output: OutputSettings,
}

impl Config {
    /// Load configuration from the default config file location
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Err(Error::Config(format!("Config file not found at {:?}", path)))
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration or return default if not found
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Save configuration to the default config file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Default directory for an exported copy of the standard library
    pub fn default_library_dir() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("library"))
    }

    /// Create a default config file with comments
    pub fn create_default_config_file() -> Result<PathBuf> {
        let path = Self::config_path()?;
        Self::write_default_config(&path)?;
        Ok(path)
    }

    fn write_default_config(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = r#"# reelscore configuration file

[library]
# Search the pieces built into reelscore
standard = true

# Local directories with .musicxml, .xml or .mxl pieces.
# Searched after the standard library; on equal similarity the
# earlier source wins.
# directories = ["/home/me/music/photoplay"]
directories = []

[output]
# Directory compositions are written to when no output file is given
directory = "."
"#;

        fs::write(path, content)?;
        Ok(())
    }

    /// Piece sources in search order: the standard library, then directories.
    pub fn sources(&self) -> Vec<PieceSource> {
        let mut sources = Vec::new();
        if self.library.standard {
            sources.push(PieceSource::Standard(FileLibrary::standard()));
        }
        for dir in &self.library.directories {
            sources.push(PieceSource::Directory(FileLibrary::directory(dir.clone())));
        }
        sources
    }

    /// Multi-source library over [`Config::sources`].
    pub fn build_library(&self) -> MultiSourceLibrary {
        self.sources()
            .into_iter()
            .fold(MultiSourceLibrary::new(), |library, source| library.with(source))
    }

    /// Where a composition without an explicit output file is written.
    pub fn output_path(&self, score: &Score) -> PathBuf {
        self.output.directory.join(codec::file_name_for(score))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// Library settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Include the embedded standard library
    pub standard: bool,
    /// Local library directories, in search order
    pub directories: Vec<PathBuf>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            standard: true,
            directories: Vec::new(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory compositions are written to
    pub directory: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// One configured piece source.
pub enum PieceSource {
    Standard(FileLibrary<StandardSource>),
    Directory(FileLibrary<DirectorySource>),
}

impl PieceSource {
    pub fn label(&self) -> String {
        match self {
            Self::Standard(library) => library.source().label(),
            Self::Directory(library) => library.source().label(),
        }
    }

    /// Every piece of the source, decoded.
    pub fn pieces(&self) -> Vec<Score> {
        match self {
            Self::Standard(library) => library.pieces(),
            Self::Directory(library) => library.pieces(),
        }
    }
}

impl Library for PieceSource {
    fn best_match(&self, description: &str) -> Option<CandidateMatch> {
        match self {
            Self::Standard(library) => library.best_match(description),
            Self::Directory(library) => library.best_match(description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.library.standard);
        assert!(config.library.directories.is_empty());
        assert_eq!(config.output.directory, PathBuf::from("."));
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.library.directories.push(PathBuf::from("/srv/library"));
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str("[output]\ndirectory = \"out\"\n").unwrap();
        assert!(config.library.standard);
        assert_eq!(config.output.directory, PathBuf::from("out"));
    }

    #[test]
    fn test_default_config_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::write_default_config(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_default_config_file_uses_absolute_example_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::write_default_config(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let example = content
            .lines()
            .find(|line| line.starts_with("# directories ="))
            .unwrap();
        assert!(!example.contains('~'));

        let uncommented = example.trim_start_matches("# ");
        let parsed: LibrarySettings = toml::from_str(uncommented).unwrap();
        assert!(parsed.directories.iter().all(|d| d.is_absolute()));
    }

    #[test]
    fn test_save_to_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            library: LibrarySettings {
                standard: false,
                directories: vec![dir.path().to_path_buf()],
            },
            output: OutputSettings {
                directory: dir.path().join("out"),
            },
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_sources_in_search_order() {
        let config = Config {
            library: LibrarySettings {
                standard: true,
                directories: vec![PathBuf::from("a"), PathBuf::from("b")],
            },
            ..Default::default()
        };
        let labels: Vec<String> = config.sources().iter().map(PieceSource::label).collect();
        assert_eq!(labels, vec!["standard", "a", "b"]);
        assert_eq!(config.build_library().len(), 3);

        let config = Config {
            library: LibrarySettings {
                standard: false,
                directories: Vec::new(),
            },
            ..Default::default()
        };
        assert!(config.build_library().is_empty());
        assert!(config.build_library().best_match("agitato").is_none());
    }

    #[test]
    fn test_standard_source_matches() {
        let config = Config::default();
        let found = config.build_library().best_match("agitato, storm, pursuit").unwrap();
        assert_eq!(found.piece.title(), "Agitato No. 3");
        assert_eq!(config.sources()[0].pieces().len(), reelscore_std::piece_names().len());
    }

    #[test]
    fn test_output_path() {
        let config = Config {
            output: OutputSettings {
                directory: PathBuf::from("out"),
            },
            ..Default::default()
        };
        let score = Score::new().with_title("Reel One");
        assert_eq!(config.output_path(&score), PathBuf::from("out/Reel_One.musicxml"));
        assert_eq!(
            config.output_path(&Score::new()),
            PathBuf::from("out").join(codec::DEFAULT_FILE_NAME)
        );
    }
}
