//! Turning a scene plan into measures.

use crate::scheduler::ScenePlan;
use reelscore_notation::{Measure, Metronome, TimeSignature};

/// Copy the planned sections of `measures` and stamp the scene on them.
///
/// Every measure is an independent copy. Tempo marks of the source are
/// removed; the first measure gets the scene description as system text,
/// the time signature `time` and the tempo mark `metronome`. An empty plan
/// gives no measures.
pub fn materialize(
    measures: &[Measure],
    plan: &ScenePlan,
    description: &str,
    time: TimeSignature,
    metronome: &Metronome,
) -> Vec<Measure> {
    let mut output: Vec<Measure> = plan
        .sections
        .iter()
        .flat_map(|section| measures[section.range()].iter().cloned())
        .collect();

    for measure in &mut output {
        measure.clear_tempo_markings();
    }

    if let Some(first) = output.first_mut() {
        first.set_system_text(description);
        first.set_time_signature(time);
        first.set_tempo(metronome);
    }
    output
}
