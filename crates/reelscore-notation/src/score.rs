//! Score-level accessors, builders and text extraction.

use crate::model::*;

impl Score {
    /// Create an empty score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the work title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.work_title = Some(title.to_string());
        self
    }

    /// Builder: add a composer credit.
    pub fn with_composer(mut self, composer: &str) -> Self {
        self.credits.push(Credit::composer(composer));
        self
    }

    /// Builder: add a part holding `measures`.
    pub fn with_part(mut self, id: &str, measures: Vec<Measure>) -> Self {
        self.part_list.push(ScorePart {
            id: id.to_string(),
            ..Default::default()
        });
        self.parts.push(Part {
            id: id.to_string(),
            measures,
        });
        self
    }

    /// Work title, or an empty string when the score has none.
    pub fn title(&self) -> &str {
        self.work_title.as_deref().unwrap_or("")
    }

    /// Words of the first composer credit, or an empty string.
    pub fn composer(&self) -> &str {
        self.credits
            .iter()
            .find(|c| c.kinds.iter().any(|k| k == "composer"))
            .and_then(|c| c.words.as_ref())
            .map(|w| w.value.as_str())
            .unwrap_or("")
    }

    /// Measures of the first part; empty when the score has no parts.
    pub fn measures(&self) -> &[Measure] {
        self.parts
            .first()
            .map(|p| p.measures.as_slice())
            .unwrap_or(&[])
    }

    /// All user-visible text in document order.
    ///
    /// Credit words come first, then for every measure of every part the
    /// words and rehearsal text of each direction type. Runs inside one
    /// direction type are concatenated; empty results are skipped.
    pub fn text_fields(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .credits
            .iter()
            .filter_map(|c| c.words.as_ref())
            .map(|w| w.value.clone())
            .collect();

        for part in &self.parts {
            for measure in &part.measures {
                out.extend(measure_text(measure));
            }
        }
        out
    }
}

/// Words and rehearsal text of one measure.
pub fn measure_text(measure: &Measure) -> Vec<String> {
    let mut out = Vec::new();
    for direction in measure.directions() {
        for t in &direction.types {
            let runs = match t {
                DirectionType::Words(runs) | DirectionType::Rehearsal(runs) => runs,
                _ => continue,
            };
            let text: String = runs.iter().map(|r| r.value.as_str()).collect();
            if !text.is_empty() {
                out.push(text);
            }
        }
    }
    out
}

impl Credit {
    /// A centred title credit on page 1.
    pub fn title(title: &str) -> Self {
        Self {
            page: Some("1".into()),
            kinds: vec!["title".into()],
            words: Some(FormattedText {
                value: title.to_string(),
                attributes: vec![
                    ("default-x".into(), "616.9347".into()),
                    ("default-y".into(), "1511.047129".into()),
                    ("justify".into(), "center".into()),
                    ("valign".into(), "top".into()),
                    ("font-size".into(), "22".into()),
                ],
            }),
        }
    }

    /// A right-aligned composer credit on page 1.
    pub fn composer(composer: &str) -> Self {
        Self {
            page: Some("1".into()),
            kinds: vec!["composer".into()],
            words: Some(FormattedText {
                value: composer.to_string(),
                attributes: vec![
                    ("default-x".into(), "1148.144364".into()),
                    ("default-y".into(), "1411.047256".into()),
                    ("justify".into(), "right".into()),
                    ("valign".into(), "bottom".into()),
                    ("font-size".into(), "10".into()),
                ],
            }),
        }
    }
}

impl Defaults {
    /// Letter-size page with uniform margins.
    pub fn standard_page() -> Self {
        let margins = |kind: &str| PageMargins {
            kind: Some(kind.to_string()),
            left: 85.725,
            right: 85.725,
            top: 85.725,
            bottom: 85.725,
        };
        Self {
            scaling: Some(Scaling {
                millimeters: 6.99912,
                tenths: 40.0,
            }),
            page_layout: Some(PageLayout {
                height: Some(1596.77),
                width: Some(1233.87),
                margins: vec![margins("even"), margins("odd")],
            }),
            extra: Vec::new(),
        }
    }
}
