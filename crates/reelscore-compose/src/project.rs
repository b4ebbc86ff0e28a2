//! Project files: a named, ordered list of scene requests.
//!
//! Projects are TOML documents:
//!
//! ```toml
//! name = "The Sea Hawk, Reel 1"
//!
//! [[scenes]]
//! keywords = "agitato, storm"
//! description = "Ship in the storm"
//! duration_secs = 95
//! theme = 1
//!
//! [[scenes]]
//! keywords = "love scene"
//! description = "Reunion"
//! duration_secs = 40
//! tempo = 72
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// A film project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    /// Project name, used as the composition title.
    pub name: String,
    /// Scenes in playing order.
    #[serde(default)]
    pub scenes: Vec<SceneRequest>,
}

/// One scene needing music.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneRequest {
    /// Query matched against the library.
    #[serde(default)]
    pub keywords: String,
    /// Free text written above the scene's first measure.
    #[serde(default)]
    pub description: String,
    /// Length of the scene in seconds.
    #[serde(default)]
    pub duration_secs: u64,
    /// Tempo override in BPM; 0 keeps the piece's own tempo mark.
    #[serde(default)]
    pub tempo: u32,
    /// Theme id; scenes sharing an id > 0 share one piece.
    #[serde(default)]
    pub theme: u32,
}

impl SceneRequest {
    pub fn new(keywords: &str, duration_secs: u64) -> Self {
        Self {
            keywords: keywords.to_string(),
            duration_secs,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_tempo(mut self, tempo: u32) -> Self {
        self.tempo = tempo;
        self
    }

    pub fn with_theme(mut self, theme: u32) -> Self {
        self.theme = theme;
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            scenes: Vec::new(),
        }
    }

    /// Builder: append a scene.
    pub fn with_scene(mut self, scene: SceneRequest) -> Self {
        self.scenes.push(scene);
        self
    }

    /// Parse a project from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a project file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let project = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded project '{}' with {} scene(s) from {}",
            project.name,
            project.scenes.len(),
            path.display()
        );
        Ok(project)
    }

    /// Write the project to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Total length of all scenes.
    pub fn duration(&self) -> Duration {
        self.scenes.iter().map(SceneRequest::duration).sum()
    }

    /// A small project to start from.
    pub fn example() -> Self {
        Self::new("Untitled Reel")
            .with_scene(
                SceneRequest::new("misterioso, night", 30)
                    .with_description("Opening: the empty house"),
            )
            .with_scene(
                SceneRequest::new("agitato, storm, pursuit", 75)
                    .with_description("The chase")
                    .with_theme(1),
            )
            .with_scene(
                SceneRequest::new("andante amoroso, love scene", 45)
                    .with_description("Reunion")
                    .with_tempo(72),
            )
            .with_scene(
                SceneRequest::new("agitato, storm, pursuit", 20)
                    .with_description("The chase resumes")
                    .with_theme(1),
            )
    }
}
