//! Structural edits on measures, plus small builders used to assemble
//! measures in code.
//!
//! New directions and attributes always go in front of the first note of a
//! measure, so that they apply from the downbeat on.

use crate::model::*;
use crate::node::XmlNode;

impl Measure {
    /// Create an empty measure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append an element.
    pub fn with(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Builder: append a direction carrying a rehearsal mark.
    pub fn with_rehearsal_mark(self, mark: &str) -> Self {
        self.with(Element::Direction(Direction {
            types: vec![DirectionType::Rehearsal(vec![FormattedText::plain(mark)])],
            ..Default::default()
        }))
    }

    /// Builder: append a direction carrying words.
    pub fn with_words(self, text: &str) -> Self {
        self.with(Element::Direction(Direction {
            types: vec![DirectionType::Words(vec![FormattedText::plain(text)])],
            ..Default::default()
        }))
    }

    /// Builder: append a direction carrying a metronome mark.
    pub fn with_metronome(self, metronome: Metronome) -> Self {
        self.with(Element::Direction(Direction {
            types: vec![DirectionType::Metronome(metronome)],
            ..Default::default()
        }))
    }

    /// Builder: append an attributes element declaring a clef.
    pub fn with_clef(self, clef: Clef) -> Self {
        self.with(Element::Attributes(Attributes {
            clefs: vec![clef],
            ..Default::default()
        }))
    }

    /// Builder: append an attributes element declaring a time signature.
    pub fn with_time(self, time: TimeSignature) -> Self {
        self.with(Element::Attributes(Attributes {
            time: vec![time],
            ..Default::default()
        }))
    }

    /// Builder: append a barline.
    pub fn with_barline(self, barline: Barline) -> Self {
        self.with(Element::Barline(barline))
    }

    /// Builder: append a print element.
    pub fn with_print(self, print: Print) -> Self {
        self.with(Element::Print(print))
    }

    /// Builder: append a whole-measure rest.
    pub fn with_rest(self) -> Self {
        self.with(Element::Note(
            XmlNode::new("note")
                .child(XmlNode::new("rest").attr("measure", "yes"))
                .child(XmlNode::with_text("duration", "4"))
                .child(XmlNode::with_text("voice", "1")),
        ))
    }

    /// Iterate over the directions of this measure.
    pub fn directions(&self) -> impl Iterator<Item = &Direction> {
        self.elements.iter().filter_map(|e| match e {
            Element::Direction(d) => Some(d),
            _ => None,
        })
    }

    /// Iterate over the barlines of this measure.
    pub fn barlines(&self) -> impl Iterator<Item = &Barline> {
        self.elements.iter().filter_map(|e| match e {
            Element::Barline(b) => Some(b),
            _ => None,
        })
    }

    /// True if any direction carries a rehearsal mark.
    pub fn has_rehearsal_mark(&self) -> bool {
        self.directions().any(|d| {
            d.types
                .iter()
                .any(|t| matches!(t, DirectionType::Rehearsal(marks) if !marks.is_empty()))
        })
    }

    /// Apply `apply` to an element of `kind` at the start of the measure.
    ///
    /// Walks the elements in order. With `reuse_existing`, the first element
    /// of `kind` found before any note is edited in place. Otherwise a new
    /// element is inserted right before the first note, or appended when the
    /// measure holds no notes.
    fn apply_before_first_note(
        &mut self,
        kind: ElementKind,
        reuse_existing: bool,
        apply: impl FnOnce(&mut Element),
    ) {
        let position = self
            .elements
            .iter()
            .position(|e| e.kind() == ElementKind::Note || (reuse_existing && e.kind() == kind));

        match position {
            Some(index) if self.elements[index].kind() == kind => apply(&mut self.elements[index]),
            Some(index) => {
                let mut element = Element::empty(kind);
                apply(&mut element);
                self.elements.insert(index, element);
            }
            None => {
                let mut element = Element::empty(kind);
                apply(&mut element);
                self.elements.push(element);
            }
        }
    }

    /// Write `text` as words at the start of the measure.
    pub fn set_system_text(&mut self, text: &str) {
        self.apply_before_first_note(ElementKind::Direction, true, |element| {
            if let Element::Direction(direction) = element {
                if direction.placement.is_none() {
                    direction.placement = Some("above".into());
                }
                direction
                    .types
                    .push(DirectionType::Words(vec![FormattedText::plain(text)]));
            }
        });
    }

    /// Declare `time` at the start of the measure, replacing any time
    /// signature of the reused attributes element.
    pub fn set_time_signature(&mut self, time: TimeSignature) {
        self.apply_before_first_note(ElementKind::Attributes, true, |element| {
            if let Element::Attributes(attributes) = element {
                attributes.time = vec![time];
            }
        });
    }

    /// Place a tempo mark at the start of the measure.
    pub fn set_tempo(&mut self, metronome: &Metronome) {
        self.apply_before_first_note(ElementKind::Direction, false, |element| {
            if let Element::Direction(direction) = element {
                set_metronome(direction, metronome);
            }
        });
    }

    /// Remove every metronome mark. Directions left without content are dropped.
    pub fn clear_tempo_markings(&mut self) {
        for element in &mut self.elements {
            if let Element::Direction(direction) = element {
                direction
                    .types
                    .retain(|t| !matches!(t, DirectionType::Metronome(_)));
            }
        }
        self.elements
            .retain(|e| !matches!(e, Element::Direction(d) if d.types.is_empty()));
    }

    /// Replace every barline of the measure with `barline`, placed last.
    pub fn set_barline_at_end(&mut self, barline: Barline) {
        self.elements.retain(|e| !matches!(e, Element::Barline(_)));
        self.elements.push(Element::Barline(barline));
    }

    /// Force a page break before this measure.
    pub fn ensure_page_break(&mut self) {
        self.ensure_print(|print| print.new_page = true);
    }

    /// Force a system (line) break before this measure.
    pub fn ensure_line_break(&mut self) {
        self.ensure_print(|print| print.new_system = true);
    }

    fn ensure_print(&mut self, flag: impl FnOnce(&mut Print)) {
        for element in &mut self.elements {
            if let Element::Print(print) = element {
                flag(print);
                return;
            }
        }
        let mut print = Print::default();
        flag(&mut print);
        self.elements.insert(0, Element::Print(print));
    }

    /// Remove every print element.
    pub fn clear_print(&mut self) {
        self.elements.retain(|e| !matches!(e, Element::Print(_)));
    }
}

/// Replace the metronome marks of `direction` with `metronome`, or add one.
fn set_metronome(direction: &mut Direction, metronome: &Metronome) {
    let mut replaced = false;
    for t in &mut direction.types {
        if let DirectionType::Metronome(existing) = t {
            *existing = metronome.clone();
            replaced = true;
        }
    }
    if !replaced {
        direction
            .types
            .push(DirectionType::Metronome(metronome.clone()));
    }
}

impl Barline {
    /// A right-hand barline with the given style.
    pub fn styled(style: BarStyle) -> Self {
        Self {
            location: Some("right".into()),
            style: Some(style),
            ..Default::default()
        }
    }

    /// A barline carrying an ending bracket boundary.
    pub fn ending(number: u32, kind: EndingKind) -> Self {
        Self {
            ending: Some(Ending {
                number: number.to_string(),
                kind,
                text: None,
            }),
            ..Default::default()
        }
    }

    /// A barline carrying a repeat sign.
    pub fn repeat(direction: RepeatDirection) -> Self {
        let (location, style) = match direction {
            RepeatDirection::Forward => ("left", BarStyle::HeavyLight),
            RepeatDirection::Backward => ("right", BarStyle::LightHeavy),
        };
        Self {
            location: Some(location.into()),
            style: Some(style),
            repeat: Some(Repeat {
                direction,
                times: None,
            }),
            ..Default::default()
        }
    }
}

impl Print {
    pub fn new_page() -> Self {
        Self {
            new_page: true,
            ..Default::default()
        }
    }

    pub fn new_system() -> Self {
        Self {
            new_system: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metronomes(measure: &Measure) -> Vec<&Metronome> {
        measure
            .directions()
            .flat_map(|d| d.types.iter())
            .filter_map(|t| match t {
                DirectionType::Metronome(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_system_text_inserted_before_first_note() {
        let mut measure = Measure::new().with_time(TimeSignature::new(3, 4)).with_rest();
        measure.set_system_text("Train arrives");

        assert_eq!(measure.elements.len(), 3);
        assert_eq!(measure.elements[1].kind(), ElementKind::Direction);
        assert_eq!(measure.elements[2].kind(), ElementKind::Note);
    }

    #[test]
    fn test_system_text_reuses_existing_direction() {
        let mut measure = Measure::new().with_rehearsal_mark("A").with_rest();
        measure.set_system_text("Chase");

        assert_eq!(measure.elements.len(), 2);
        let direction = measure.directions().next().unwrap();
        assert_eq!(direction.types.len(), 2);
        assert!(matches!(&direction.types[1], DirectionType::Words(w) if w[0].value == "Chase"));
    }

    #[test]
    fn test_system_text_appended_without_notes() {
        let mut measure = Measure::new().with_barline(Barline::styled(BarStyle::LightLight));
        measure.set_system_text("Title card");
        assert_eq!(measure.elements.len(), 2);
        assert_eq!(measure.elements[1].kind(), ElementKind::Direction);
    }

    #[test]
    fn test_time_signature_replaces_reused_attributes() {
        let mut measure = Measure::new()
            .with_time(TimeSignature::new(4, 4))
            .with_rest();
        measure.set_time_signature(TimeSignature::new(6, 8));

        match &measure.elements[0] {
            Element::Attributes(a) => assert_eq!(a.time, vec![TimeSignature::new(6, 8)]),
            other => panic!("expected attributes, got {:?}", other),
        }
        assert_eq!(measure.elements.len(), 2);
    }

    #[test]
    fn test_set_tempo_does_not_duplicate() {
        let mut measure = Measure::new().with_rest();
        measure.set_tempo(&Metronome::new("quarter", 90));
        assert_eq!(metronomes(&measure).len(), 1);
        assert_eq!(metronomes(&measure)[0].bpm(), Some(90));
        assert_eq!(measure.elements.last().unwrap().kind(), ElementKind::Note);
    }

    #[test]
    fn test_set_metronome_replaces_in_place() {
        let mut direction = Direction {
            types: vec![DirectionType::Metronome(Metronome::new("half", 60))],
            ..Default::default()
        };
        set_metronome(&mut direction, &Metronome::new("quarter", 72));
        assert_eq!(direction.types.len(), 1);
        assert_eq!(direction.types[0], DirectionType::Metronome(Metronome::new("quarter", 72)));
    }

    #[test]
    fn test_clear_tempo_markings_drops_empty_directions() {
        let mut measure = Measure::new()
            .with_metronome(Metronome::new("quarter", 120))
            .with_words("dolce")
            .with_rest();
        measure.clear_tempo_markings();

        assert!(metronomes(&measure).is_empty());
        assert_eq!(measure.directions().count(), 1);
    }

    #[test]
    fn test_set_barline_at_end_replaces_all() {
        let mut measure = Measure::new()
            .with_barline(Barline::repeat(RepeatDirection::Forward))
            .with_rest()
            .with_barline(Barline::styled(BarStyle::Regular));
        measure.set_barline_at_end(Barline::styled(BarStyle::LightHeavy));

        let barlines: Vec<_> = measure.barlines().collect();
        assert_eq!(barlines.len(), 1);
        assert_eq!(barlines[0].style, Some(BarStyle::LightHeavy));
        assert_eq!(measure.elements.last().unwrap().kind(), ElementKind::Barline);
    }

    #[test]
    fn test_page_and_line_breaks() {
        let mut measure = Measure::new().with_rest();
        measure.ensure_page_break();
        assert_eq!(measure.elements[0], Element::Print(Print::new_page()));

        let mut measure = Measure::new().with_rest().with_print(Print::default());
        measure.ensure_line_break();
        assert_eq!(measure.elements.len(), 2);
        assert_eq!(measure.elements[1], Element::Print(Print::new_system()));

        measure.clear_print();
        assert_eq!(measure.elements.len(), 1);
    }

    #[test]
    fn test_has_rehearsal_mark() {
        assert!(Measure::new().with_rehearsal_mark("B").has_rehearsal_mark());
        assert!(!Measure::new().with_words("B").has_rehearsal_mark());
    }
}
