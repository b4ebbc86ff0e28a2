//! reelscore compose - the scene-composition engine.
//!
//! Given a project (an ordered list of scene requests) and a library of
//! pieces, this crate builds one score accompanying the whole film:
//!
//! - **Matching** - [`matcher`] ranks texts by trigram overlap;
//!   [`library`] applies it to pieces in memory, on disk or embedded
//! - **Linearizing** - [`repeats`] removes first endings, repeat signs and
//!   jump directions so a piece can be played straight through
//! - **Cutting** - [`sections`] splits a piece at its rehearsal marks
//! - **Scheduling** - [`scheduler`] picks whole sections to fill a scene and
//!   computes the tempo that makes them fit exactly
//! - **Assembling** - [`materialize`] and [`assemble`] copy the chosen
//!   measures, stamp scene text, time and tempo, and lay out the cue sheet
//!
//! The engine is synchronous and works on owned copies: library pieces are
//! never modified.
//!
//! # Example
//!
//! ```
//! use reelscore_compose::{compose_project, InMemoryLibrary, Project, SceneRequest};
//! use reelscore_notation::{Measure, Metronome, Score};
//!
//! let measures = (0..8)
//!     .map(|i| {
//!         let m = Measure::new();
//!         let m = if i == 0 { m.with_metronome(Metronome::new("quarter", 96)) } else { m };
//!         m.with_words("agitato").with_rest()
//!     })
//!     .collect();
//! let library = InMemoryLibrary::new(vec![Score::new()
//!     .with_title("Hurry")
//!     .with_composer("Minot")
//!     .with_part("P1", measures)]);
//!
//! let project = Project::new("Reel 1").with_scene(SceneRequest::new("agitato", 20));
//! let composition = compose_project(&library, &project);
//!
//! assert_eq!(composition.composer, "Minot");
//! assert_eq!(composition.into_score().title(), "Reel 1");
//! ```

pub mod assemble;
pub mod compose;
pub mod error;
pub mod library;
pub mod materialize;
pub mod matcher;
pub mod project;
pub mod repeats;
pub mod scheduler;
pub mod sections;
pub mod tempo;

pub use assemble::{assemble, Composition, PieceInfo, SceneOutput, NUM_BARS_IN_CUE_SHEET};
pub use compose::{compose_project, compose_scene, ThemeCache};
pub use error::{Error, Result};
pub use library::{
    CandidateMatch, DirectorySource, FileLibrary, FileSource, InMemoryLibrary, Library,
    MultiSourceLibrary, StandardSource,
};
pub use project::{Project, SceneRequest};
pub use scheduler::{plan_scene, ScenePlan, MAX_SCHEDULING_STEPS};
pub use sections::{extract_sections, Section};
pub use tempo::DEFAULT_TEMPO;
