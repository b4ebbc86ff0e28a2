//! Section extraction: cutting a piece at its rehearsal marks.

use reelscore_notation::Measure;
use std::ops::Range;

/// Half-open range `[start, end)` of measure indices within one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub start: usize,
    pub end: usize,
}

impl Section {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of measures in the section.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `measures` into contiguous sections.
///
/// A new section starts at every measure after the first that carries a
/// rehearsal mark. The sections cover every measure exactly once; no
/// measures means no sections, no rehearsal marks means a single section.
pub fn extract_sections(measures: &[Measure]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut start = 0;
    for (i, measure) in measures.iter().enumerate().skip(1) {
        if measure.has_rehearsal_mark() {
            sections.push(Section::new(start, i));
            start = i;
        }
    }
    if !measures.is_empty() {
        sections.push(Section::new(start, measures.len()));
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn measures_with_marks(len: usize, marks: &[usize]) -> Vec<Measure> {
        (0..len)
            .map(|i| {
                let measure = Measure::new();
                let measure = if marks.contains(&i) {
                    measure.with_rehearsal_mark(&((b'A' + i as u8) as char).to_string())
                } else {
                    measure
                };
                measure.with_rest()
            })
            .collect()
    }

    fn assert_covers(sections: &[Section], len: usize) {
        assert_eq!(sections.first().map(|s| s.start), Some(0));
        assert_eq!(sections.last().map(|s| s.end), Some(len));
        for pair in sections.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert!(sections.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_sections_at_rehearsal_marks() {
        let sections = extract_sections(&measures_with_marks(8, &[1, 3]));
        assert_eq!(
            sections,
            vec![Section::new(0, 1), Section::new(1, 3), Section::new(3, 8)]
        );
    }

    #[test]
    fn test_mark_on_first_measure_does_not_split() {
        let sections = extract_sections(&measures_with_marks(5, &[0, 2]));
        assert_eq!(sections, vec![Section::new(0, 2), Section::new(2, 5)]);
    }

    #[test]
    fn test_no_marks_single_section() {
        assert_eq!(
            extract_sections(&measures_with_marks(6, &[])),
            vec![Section::new(0, 6)]
        );
    }

    #[test]
    fn test_no_measures_no_sections() {
        assert!(extract_sections(&[]).is_empty());
    }

    #[test]
    fn test_sections_cover_all_measures() {
        for (len, marks) in [
            (1, vec![]),
            (3, vec![1, 2]),
            (10, vec![0, 4, 5, 9]),
            (12, vec![2, 6, 8, 10, 11]),
        ] {
            assert_covers(&extract_sections(&measures_with_marks(len, &marks)), len);
        }
    }

    proptest! {
        #[test]
        fn test_sections_cover_any_marks(
            len in 0usize..40,
            marks in prop::collection::vec(0usize..40, 0..12),
        ) {
            let measures = measures_with_marks(len, &marks);
            let sections = extract_sections(&measures);

            if len == 0 {
                prop_assert!(sections.is_empty());
            } else {
                assert_covers(&sections, len);
                let splits = (1..len).filter(|i| marks.contains(i)).count();
                prop_assert_eq!(sections.len(), splits + 1);
                for section in sections.iter().skip(1) {
                    prop_assert!(measures[section.start].has_rehearsal_mark());
                }
            }
        }
    }

    #[test]
    fn test_section_len() {
        let section = Section::new(4, 16);
        assert_eq!(section.len(), 12);
        assert_eq!(section.range(), 4..16);
        assert!(Section::new(3, 3).is_empty());
    }
}
