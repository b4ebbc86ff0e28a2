//! Scene duration scheduling.
//!
//! A scene gets whole sections of its piece, cycling through them from the
//! start, until the measure count is as close to the target as whole
//! sections allow. Since sections cannot be cut, the tempo is then adjusted
//! so that the chosen measures fill the scene exactly.

use crate::sections::Section;
use std::time::Duration;

/// Upper bound on the sections considered for one scene.
///
/// Guards the cyclic walk against degenerate section lists (zero-length
/// sections never advance the running total).
pub const MAX_SCHEDULING_STEPS: usize = 1000;

/// Sections chosen for a scene and the tempo they must be played at.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePlan {
    /// Sections in playing order. A section appears more than once when the
    /// piece has to loop.
    pub sections: Vec<Section>,
    /// Achieved tempo in beats per minute.
    pub tempo: f64,
}

impl ScenePlan {
    /// Total number of measures in the plan.
    pub fn measure_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Number of measures that fill `duration` at `tempo`, rounded down.
pub fn target_measure_count(duration: Duration, tempo: f64, beats_per_measure: u32) -> usize {
    let count = duration.as_secs_f64() / 60.0 * tempo / f64::from(beats_per_measure);
    count.floor().max(0.0) as usize
}

/// Choose sections for a scene of `duration` at roughly `tempo`.
///
/// Sections are walked cyclically from the first. A section is taken when
/// ending after it lands closer to the target than stopping before it
/// (`overshoot < remaining`). The walk ends with the first section that
/// would pass the target, whether or not it was taken.
///
/// The returned tempo is the one at which the chosen measures last exactly
/// `duration`. A zero duration gives an empty plan at the requested tempo.
///
/// # Panics
///
/// Panics if `sections` is empty or `beats_per_measure` is zero. Callers
/// skip pieces without measures before planning.
pub fn plan_scene(
    duration: Duration,
    tempo: f64,
    beats_per_measure: u32,
    sections: &[Section],
) -> ScenePlan {
    assert!(!sections.is_empty(), "cannot plan a scene without sections");
    assert!(beats_per_measure > 0, "beats per measure must be positive");

    let target = target_measure_count(duration, tempo, beats_per_measure) as i64;
    let mut chosen = Vec::new();
    let mut total: i64 = 0;

    for section in sections.iter().cycle().take(MAX_SCHEDULING_STEPS) {
        let next = total + section.len() as i64;
        let remaining = target - total;
        let overshoot = next - target;

        if overshoot < remaining {
            chosen.push(*section);
            total = next;
        }
        if next > target {
            break;
        }
    }

    let minutes = duration.as_secs_f64() / 60.0;
    let tempo = if minutes > 0.0 {
        f64::from(beats_per_measure) * total as f64 / minutes
    } else {
        tempo
    };

    ScenePlan {
        sections: chosen,
        tempo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn test_plan_loops_sections() {
        let sections = [Section::new(0, 4), Section::new(4, 16)];
        let plan = plan_scene(minutes(2), 80.0, 4, &sections);

        assert_eq!(
            plan.sections,
            vec![
                Section::new(0, 4),
                Section::new(4, 16),
                Section::new(0, 4),
                Section::new(4, 16),
                Section::new(0, 4),
            ]
        );
        assert_eq!(plan.measure_count(), 36);
        assert!((plan.tempo - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_measure_count() {
        assert_eq!(target_measure_count(minutes(2), 80.0, 4), 40);
        assert_eq!(target_measure_count(Duration::from_secs(45), 82.0, 4), 15);
        assert_eq!(target_measure_count(Duration::ZERO, 120.0, 3), 0);
    }

    #[test]
    fn test_exact_fit() {
        let sections = [Section::new(0, 8), Section::new(8, 16)];
        let plan = plan_scene(minutes(1), 64.0, 4, &sections);
        assert_eq!(plan.measure_count(), 16);
        assert!((plan.tempo - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_overshoot_taken_when_closer() {
        // Target 10: stopping at 8 leaves 2, taking the next 4 overshoots by 2.
        // Equal distance is not closer, so the plan stops short.
        let sections = [Section::new(0, 4)];
        let plan = plan_scene(Duration::from_secs(15), 80.0, 2, &sections);
        assert_eq!(plan.measure_count(), 8);

        // Target 11: overshoot 1 < remaining 3, take it.
        let plan = plan_scene(Duration::from_secs(15), 88.0, 2, &sections);
        assert_eq!(plan.measure_count(), 12);
    }

    #[test]
    fn test_section_longer_than_target() {
        let sections = [Section::new(0, 32)];
        let plan = plan_scene(Duration::from_secs(15), 80.0, 4, &sections);
        assert!(plan.is_empty());
        assert_eq!(plan.tempo, 0.0);
    }

    #[test]
    fn test_zero_duration() {
        let plan = plan_scene(Duration::ZERO, 96.0, 4, &[Section::new(0, 4)]);
        assert!(plan.is_empty());
        assert_eq!(plan.tempo, 96.0);
    }

    #[test]
    fn test_plan_never_splits_sections() {
        let sections = [Section::new(0, 3), Section::new(3, 8), Section::new(8, 10)];
        for secs in [10, 45, 61, 90, 200] {
            let plan = plan_scene(Duration::from_secs(secs), 90.0, 3, &sections);
            assert!(plan.sections.iter().all(|s| sections.contains(s)));
            let expected = 3.0 * plan.measure_count() as f64 / (secs as f64 / 60.0);
            assert!((plan.tempo - expected).abs() < 1e-9);
        }
    }

    fn arb_sections() -> impl Strategy<Value = Vec<Section>> {
        prop::collection::vec(1usize..20, 1..6).prop_map(|lens| {
            let mut start = 0;
            lens.into_iter()
                .map(|len| {
                    let section = Section::new(start, start + len);
                    start += len;
                    section
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn test_plan_for_any_scene(
            sections in arb_sections(),
            secs in 0u64..300,
            tempo in 40u32..200,
            beats in 2u32..8,
        ) {
            let duration = Duration::from_secs(secs);
            let plan = plan_scene(duration, f64::from(tempo), beats, &sections);
            let target = target_measure_count(duration, f64::from(tempo), beats) as i64;
            let total = plan.measure_count() as i64;

            // Whole sections only, walked cyclically from the first.
            for (i, section) in plan.sections.iter().enumerate() {
                prop_assert_eq!(*section, sections[i % sections.len()]);
            }

            // Ending here is at least as close as taking one more section,
            // and the last section taken was closer than stopping before it.
            let next = sections[plan.sections.len() % sections.len()];
            let after = total + next.len() as i64;
            prop_assert!(after > target);
            prop_assert!(after - target >= target - total);
            if let Some(last) = plan.sections.last() {
                let before = total - last.len() as i64;
                prop_assert!(before <= target);
                prop_assert!(total - target < target - before);
            }

            if secs > 0 {
                let expected = f64::from(beats) * total as f64 / (secs as f64 / 60.0);
                prop_assert!((plan.tempo - expected).abs() < 1e-9);
            } else {
                prop_assert_eq!(plan.tempo, f64::from(tempo));
            }
        }
    }

    #[test]
    fn test_step_cap_bounds_zero_length_sections() {
        let plan = plan_scene(minutes(1), 80.0, 4, &[Section::new(2, 2)]);
        assert_eq!(plan.sections.len(), MAX_SCHEDULING_STEPS);
        assert_eq!(plan.measure_count(), 0);
    }

    #[test]
    #[should_panic(expected = "without sections")]
    fn test_empty_sections_panics() {
        plan_scene(minutes(1), 80.0, 4, &[]);
    }
}
