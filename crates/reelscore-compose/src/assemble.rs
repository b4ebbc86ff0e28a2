//! Composition assembly.
//!
//! The scene outputs are joined into one score: first a cue sheet with a
//! short preview of every matched piece, then the scene bodies in order.
//! Barlines mark scene boundaries and the end, redundant clefs are dropped,
//! page and line breaks lay out the cue sheet, and all measures are
//! renumbered from 1.

use reelscore_notation::{
    BarStyle, Barline, Clef, Credit, Defaults, Element, Measure, Part, Score, ScorePart,
};

/// Number of measures in each cue sheet preview.
pub const NUM_BARS_IN_CUE_SHEET: usize = 4;

/// Output of one scene: the matched piece's credits and the scene's measures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneOutput {
    pub title: String,
    pub composer: String,
    pub measures: Vec<Measure>,
}

/// A matched piece as listed on the cue sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PieceInfo {
    pub title: String,
    pub composer: String,
    /// Preview measures, laid out for the cue sheet.
    pub cue: Vec<Measure>,
}

/// The assembled composition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    pub title: String,
    /// Composers of all scenes, comma-joined in scene order.
    pub composer: String,
    /// Cue sheet followed by the scene bodies, numbered 1..N.
    pub measures: Vec<Measure>,
    /// One entry per scene that had a piece.
    pub pieces: Vec<PieceInfo>,
}

/// Number measures 1..N in order.
pub fn renumber(measures: &mut [Measure]) {
    for (i, measure) in measures.iter_mut().enumerate() {
        measure.number = (i + 1).to_string();
    }
}

/// Drop clef declarations identical to the clef currently in force.
///
/// The current clef is tracked across the whole sequence, so a clef at the
/// end of one scene also suppresses the same clef at the start of the next.
pub fn remove_redundant_clefs(measures: &mut [Measure]) {
    let mut current: Option<Clef> = None;
    for measure in measures {
        for element in &mut measure.elements {
            if let Element::Attributes(attributes) = element {
                attributes.clefs.retain(|clef| {
                    let redundant = current.as_ref().map(|c| c.same_as(clef)).unwrap_or(false);
                    if !redundant {
                        current = Some(clef.clone());
                    }
                    !redundant
                });
            }
        }
    }
}

/// Comma-joined composers, duplicates and blanks included.
pub fn join_composers(pieces: &[PieceInfo]) -> String {
    pieces
        .iter()
        .map(|p| p.composer.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Assemble the scene outputs into a composition titled `title`.
pub fn assemble(title: &str, scenes: Vec<SceneOutput>) -> Composition {
    let mut bodies = Vec::new();
    let mut pieces = Vec::with_capacity(scenes.len());

    for scene in scenes {
        let mut measures = scene.measures;
        if let Some(last) = measures.last_mut() {
            last.set_barline_at_end(Barline::styled(BarStyle::LightLight));
        }
        pieces.push(PieceInfo {
            title: scene.title,
            composer: scene.composer,
            cue: measures.iter().take(NUM_BARS_IN_CUE_SHEET).cloned().collect(),
        });
        bodies.extend(measures);
    }

    if let Some(last) = bodies.last_mut() {
        last.set_barline_at_end(Barline::styled(BarStyle::LightHeavy));
    }
    remove_redundant_clefs(&mut bodies);
    if let Some(first) = bodies.first_mut() {
        first.ensure_page_break();
    }

    for (i, piece) in pieces.iter_mut().enumerate() {
        for measure in &mut piece.cue {
            measure.clear_print();
        }
        if let Some(first) = piece.cue.first_mut() {
            if i == 0 {
                first.ensure_page_break();
            } else {
                first.ensure_line_break();
            }
        }
    }

    let mut measures: Vec<Measure> = pieces.iter().flat_map(|p| p.cue.iter().cloned()).collect();
    measures.extend(bodies);
    renumber(&mut measures);

    log::info!(
        "Assembled '{}': {} piece(s), {} measure(s)",
        title,
        pieces.len(),
        measures.len()
    );

    Composition {
        title: title.to_string(),
        composer: join_composers(&pieces),
        measures,
        pieces,
    }
}

impl Composition {
    /// Build the output score: one piano part holding every measure, with
    /// title and composer credits on a standard page.
    pub fn into_score(self) -> Score {
        Score {
            version: Some("4.0".to_string()),
            work_title: Some(self.title.clone()),
            defaults: Some(Defaults::standard_page()),
            credits: vec![Credit::title(&self.title), Credit::composer(&self.composer)],
            part_list: vec![ScorePart {
                id: "P1".to_string(),
                name: Some("Piano".to_string()),
                abbreviation: Some("Pno.".to_string()),
                extra: Vec::new(),
            }],
            parts: vec![Part {
                id: "P1".to_string(),
                measures: self.measures,
            }],
            ..Default::default()
        }
    }
}
