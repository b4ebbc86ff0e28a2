//! The composition run: from scene requests to an assembled composition.

use crate::assemble::{assemble, Composition, SceneOutput};
use crate::library::{CandidateMatch, Library};
use crate::materialize::materialize;
use crate::project::{Project, SceneRequest};
use crate::repeats::linearize;
use crate::scheduler::plan_scene;
use crate::sections::extract_sections;
use crate::tempo::{beats_per_measure, first_time_signature, scene_metronome};
use reelscore_notation::Score;
use std::collections::HashMap;

/// Matches made during one composition run, keyed by theme id.
///
/// Only themes > 0 are cached; theme 0 always triggers a fresh lookup.
#[derive(Debug, Default)]
pub struct ThemeCache {
    matches: HashMap<u32, Option<CandidateMatch>>,
}

impl ThemeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match for `scene`, looked up in `library` unless its theme was seen before.
    pub fn lookup<L: Library + ?Sized>(
        &mut self,
        library: &L,
        scene: &SceneRequest,
    ) -> Option<CandidateMatch> {
        if scene.theme > 0 {
            if let Some(cached) = self.matches.get(&scene.theme) {
                log::debug!("Reusing piece for theme {}", scene.theme);
                return cached.clone();
            }
        }

        let found = library.best_match(&scene.keywords);
        if scene.theme > 0 {
            self.matches.insert(scene.theme, found.clone());
        }
        found
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Cut `piece` to fit `scene`.
///
/// Returns `None` when the piece has no measures to play.
pub fn compose_scene(piece: &Score, scene: &SceneRequest) -> Option<SceneOutput> {
    let measures = linearize(piece.measures());
    if measures.is_empty() {
        log::warn!("Piece '{}' has no measures, skipping it", piece.title());
        return None;
    }

    let sections = extract_sections(&measures);
    log::info!(
        "Extracted {} section(s) from '{}'",
        sections.len(),
        piece.title()
    );

    let time = first_time_signature(&measures);
    let mut metronome = scene_metronome(&measures, scene.tempo);
    let beats = beats_per_measure(time, &metronome);
    let requested = metronome.bpm().map(f64::from).unwrap_or_default();

    let plan = plan_scene(scene.duration(), requested, beats, &sections);
    metronome.set_bpm(plan.tempo as u32);

    log::info!(
        "Picked '{}' for '{}': time {}, tempo {} ({} measures)",
        piece.title(),
        scene.keywords,
        time,
        metronome.per_minute,
        plan.measure_count()
    );

    Some(SceneOutput {
        title: piece.title().to_string(),
        composer: piece.composer().to_string(),
        measures: materialize(&measures, &plan, &scene.description, time, &metronome),
    })
}

/// Compose music for every scene of `project` from `library`.
///
/// Scenes without a match, or whose match has no measures, contribute
/// nothing; the run always completes.
pub fn compose_project<L: Library + ?Sized>(library: &L, project: &Project) -> Composition {
    log::info!(
        "Composing '{}': {} scene(s)",
        project.name,
        project.scenes.len()
    );

    let mut themes = ThemeCache::new();
    let mut outputs = Vec::with_capacity(project.scenes.len());

    for scene in &project.scenes {
        let Some(found) = themes.lookup(library, scene) else {
            log::warn!("No piece found for '{}'", scene.keywords);
            continue;
        };
        log::debug!(
            "'{}' matched '{}' with similarity {}",
            scene.keywords,
            found.piece.title(),
            found.similarity
        );

        if let Some(output) = compose_scene(&found.piece, scene) {
            outputs.push(output);
        }
    }

    assemble(&project.name, outputs)
}
