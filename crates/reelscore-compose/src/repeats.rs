//! Linearizing a piece: repeats, endings and jump directions.
//!
//! An excerpt is played straight through, so everything that sends the
//! player elsewhere is removed before the piece is cut into sections:
//!
//! 1. the first-ending bracket and the measures under it (the second
//!    ending is always the path taken)
//! 2. residual ending brackets and repeat signs
//! 3. navigation directions: segno, coda, and words such as "D.S. al Fine",
//!    "Fine" or "To Coda"

use reelscore_notation::{DirectionType, Element, EndingKind, Measure};

/// Single words that mark a navigation instruction. Matched case-sensitively
/// against each word of a direction, ignoring trailing punctuation.
const JUMP_WORDS: &[&str] = &["D.S.", "Fine"];

/// Phrases that mark a navigation instruction anywhere in a direction.
const JUMP_PHRASES: &[&str] = &["To Coda"];

/// First-ending elision state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Elision {
    Keep,
    Suppress,
}

fn has_first_ending(measure: &Measure, kind: EndingKind) -> bool {
    measure.barlines().any(|b| {
        b.ending
            .as_ref()
            .map(|e| e.number.trim() == "1" && e.kind == kind)
            .unwrap_or(false)
    })
}

/// Copy `measures`, leaving out everything under a first-ending bracket.
///
/// The measure where ending #1 starts and every following measure up to and
/// including the one where it stops are dropped.
pub fn elide_first_endings(measures: &[Measure]) -> Vec<Measure> {
    let mut state = Elision::Keep;
    let mut result = Vec::with_capacity(measures.len());

    for measure in measures {
        if has_first_ending(measure, EndingKind::Start) {
            state = Elision::Suppress;
        }
        if has_first_ending(measure, EndingKind::Stop) {
            state = Elision::Keep;
            continue;
        }
        if state == Elision::Keep {
            result.push(measure.clone());
        }
    }
    result
}

/// Remove every barline carrying an ending bracket.
pub fn clear_endings(measures: &mut [Measure]) {
    for measure in measures {
        measure
            .elements
            .retain(|e| !matches!(e, Element::Barline(b) if b.ending.is_some()));
    }
}

/// Remove repeat signs. Barlines left with nothing to show are dropped.
pub fn clear_repeat_signs(measures: &mut [Measure]) {
    for measure in measures {
        for element in &mut measure.elements {
            if let Element::Barline(barline) = element {
                barline.repeat = None;
            }
        }
        measure
            .elements
            .retain(|e| !matches!(e, Element::Barline(b) if b.is_empty()));
    }
}

/// True when `text` reads as a navigation instruction: "D.S.", "D.S. al
/// Coda", "Fine.", "To Coda", ...
pub fn is_jump_text(text: &str) -> bool {
    if JUMP_PHRASES.iter().any(|phrase| text.contains(phrase)) {
        return true;
    }
    text.split_whitespace().any(|word| {
        let word = word.trim_end_matches([',', ';', ':', '!']);
        JUMP_WORDS.contains(&word) || JUMP_WORDS.contains(&word.trim_end_matches('.'))
    })
}

fn is_jump(direction_type: &DirectionType) -> bool {
    match direction_type {
        DirectionType::Segno | DirectionType::Coda => true,
        DirectionType::Words(runs) => {
            let text: String = runs.iter().map(|r| r.value.as_str()).collect();
            is_jump_text(&text)
        }
        _ => false,
    }
}

/// Remove segno and coda signs and the navigation words. Directions left
/// without content are dropped.
pub fn remove_jump_directions(measures: &mut [Measure]) {
    for measure in measures {
        for element in &mut measure.elements {
            if let Element::Direction(direction) = element {
                direction.types.retain(|t| !is_jump(t));
            }
        }
        measure
            .elements
            .retain(|e| !matches!(e, Element::Direction(d) if d.types.is_empty()));
    }
}

/// Apply all three passes and return the playable, straight-through measures.
pub fn linearize(measures: &[Measure]) -> Vec<Measure> {
    let mut result = elide_first_endings(measures);
    clear_endings(&mut result);
    clear_repeat_signs(&mut result);
    remove_jump_directions(&mut result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelscore_notation::{BarStyle, Barline, RepeatDirection};

    fn numbered(n: usize) -> Measure {
        let mut measure = Measure::new().with_rest();
        measure.number = n.to_string();
        measure
    }

    fn numbers(measures: &[Measure]) -> Vec<&str> {
        measures.iter().map(|m| m.number.as_str()).collect()
    }

    fn endings() -> Vec<Measure> {
        vec![
            numbered(1),
            numbered(2).with_barline(Barline::ending(1, EndingKind::Start)),
            numbered(3),
            numbered(4).with_barline(Barline::ending(1, EndingKind::Stop)),
            numbered(5).with_barline(Barline::ending(2, EndingKind::Start)),
        ]
    }

    #[test]
    fn test_first_ending_elided() {
        let result = linearize(&endings());

        assert_eq!(numbers(&result), vec!["1", "5"]);
        assert!(result
            .iter()
            .all(|m| m.barlines().all(|b| b.ending.is_none())));
    }

    #[test]
    fn test_elision_without_endings_copies_everything() {
        let measures: Vec<_> = (1..=4).map(numbered).collect();
        assert_eq!(elide_first_endings(&measures), measures);
    }

    #[test]
    fn test_elision_leaves_source_untouched() {
        let source = endings();
        let mut result = elide_first_endings(&source);
        result[0].set_system_text("changed");
        assert_eq!(source, endings());
    }

    #[test]
    fn test_start_and_stop_on_same_measure() {
        let measures = vec![
            numbered(1),
            numbered(2)
                .with_barline(Barline::ending(1, EndingKind::Start))
                .with_barline(Barline::ending(1, EndingKind::Stop)),
            numbered(3),
        ];
        assert_eq!(numbers(&elide_first_endings(&measures)), vec!["1", "3"]);
    }

    #[test]
    fn test_clear_repeat_signs_keeps_styled_barlines() {
        let mut measures = vec![
            numbered(1).with_barline(Barline::repeat(RepeatDirection::Forward)),
            numbered(2).with_barline(Barline {
                repeat: Barline::repeat(RepeatDirection::Backward).repeat,
                ..Default::default()
            }),
        ];
        clear_repeat_signs(&mut measures);

        let first: Vec<_> = measures[0].barlines().collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].style, Some(BarStyle::HeavyLight));
        assert!(first[0].repeat.is_none());
        assert_eq!(measures[1].barlines().count(), 0);
    }

    #[test]
    fn test_residual_cleanup_is_idempotent() {
        let mut measures = vec![
            numbered(1).with_barline(Barline::repeat(RepeatDirection::Forward)),
            numbered(2).with_barline(Barline::ending(2, EndingKind::Discontinue)),
            numbered(3).with_barline(Barline::repeat(RepeatDirection::Backward)),
        ];
        clear_endings(&mut measures);
        clear_repeat_signs(&mut measures);
        let once = measures.clone();

        clear_endings(&mut measures);
        clear_repeat_signs(&mut measures);
        assert_eq!(measures, once);
    }

    #[test]
    fn test_jump_directions_removed() {
        let mut measures = vec![
            numbered(1).with_words("D.S."),
            numbered(2).with_words("Fine"),
            numbered(3).with_words("To Coda"),
            numbered(4).with_words("dolce"),
            numbered(5).with_words("fine"),
        ];
        measures[0].elements.insert(
            0,
            Element::Direction(reelscore_notation::Direction {
                types: vec![DirectionType::Segno, DirectionType::Coda],
                ..Default::default()
            }),
        );
        remove_jump_directions(&mut measures);

        assert_eq!(measures[0].directions().count(), 0);
        assert_eq!(measures[1].directions().count(), 0);
        assert_eq!(measures[2].directions().count(), 0);
        // Case-sensitive: "dolce" and "fine" are ordinary text.
        assert_eq!(measures[3].directions().count(), 1);
        assert_eq!(measures[4].directions().count(), 1);
    }

    #[test]
    fn test_navigation_phrases_removed() {
        let mut measures = vec![
            numbered(1).with_words("D.S. al Fine"),
            numbered(2).with_words("D.S. al Coda"),
            numbered(3).with_words("To Coda "),
            numbered(4).with_words("Fine."),
            numbered(5).with_words("poco rit., To Coda"),
        ];
        remove_jump_directions(&mut measures);

        let left: Vec<usize> = measures.iter().map(|m| m.directions().count()).collect();
        assert_eq!(left, vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_jump_text_words() {
        assert!(is_jump_text("D.S."));
        assert!(is_jump_text("D.S., al Fine"));
        assert!(is_jump_text("Fine!"));
        assert!(!is_jump_text("dolce"));
        assert!(!is_jump_text("fine"));
        assert!(!is_jump_text("Finale"));
        assert!(!is_jump_text("D.S.A."));
        assert!(!is_jump_text("to coda"));
        assert!(!is_jump_text(""));
    }

    #[test]
    fn test_jump_removal_keeps_other_direction_content() {
        let mut measures = vec![numbered(1).with_rehearsal_mark("A")];
        if let Element::Direction(d) = &mut measures[0].elements[1] {
            d.types.push(DirectionType::Segno);
        }
        remove_jump_directions(&mut measures);

        assert!(measures[0].has_rehearsal_mark());
        assert_eq!(measures[0].directions().next().unwrap().types.len(), 1);
    }
}
