//! Tempo and meter arithmetic.
//!
//! Beats per measure are counted in the unit of the tempo mark, not in the
//! time signature's denominator: 6/8 under a dotted-quarter mark has two
//! beats per measure, 6/8 under an eighth mark has six.

use reelscore_notation::{DirectionType, Element, Measure, Metronome, TimeSignature};

/// Tempo used when a piece has no usable tempo mark.
pub const DEFAULT_TEMPO: u32 = 82;

/// Beats per measure used when the meter arithmetic gives nothing usable.
pub const DEFAULT_BEATS_PER_MEASURE: u32 = 4;

/// Beat unit of the default tempo mark.
pub const DEFAULT_BEAT_UNIT: &str = "quarter";

/// Denominator of a beat-unit name (quarter = 4, eighth = 8, ...).
pub fn beat_unit_denominator(name: &str) -> Option<u32> {
    let unit = match name.trim() {
        "whole" => 1,
        "half" => 2,
        "quarter" => 4,
        "eighth" => 8,
        "16th" => 16,
        "32nd" => 32,
        "64th" => 64,
        _ => return None,
    };
    Some(unit)
}

/// Length of one beat of `metronome` as the fraction `num / unit` of a whole note.
///
/// Each dot doubles the unit and extends the numerator: a dotted quarter
/// is 3/8, a double-dotted quarter 7/16.
pub fn units_per_beat(metronome: &Metronome) -> (u32, u32) {
    let mut unit = beat_unit_denominator(&metronome.beat_unit).unwrap_or_else(|| {
        log::warn!(
            "Unknown beat unit '{}', assuming {}. Check the tempo mark of the piece",
            metronome.beat_unit,
            DEFAULT_BEAT_UNIT
        );
        4
    });
    let mut num = 1;
    for _ in 0..metronome.beat_unit_dots {
        unit *= 2;
        num = num * 2 + 1;
    }
    (unit, num)
}

/// Number of `metronome` beats in one measure of `time`.
pub fn beats_per_measure(time: TimeSignature, metronome: &Metronome) -> u32 {
    let (unit, num) = units_per_beat(metronome);
    let denominator = time.beat_type * num;
    let beats = if denominator == 0 {
        0
    } else {
        time.beats * unit / denominator
    };

    if beats == 0 {
        log::warn!(
            "No whole beat of {} fits into {}, assuming {} beats per measure",
            metronome.beat_unit,
            time,
            DEFAULT_BEATS_PER_MEASURE
        );
        return DEFAULT_BEATS_PER_MEASURE;
    }
    beats
}

/// A quarter-note mark at [`DEFAULT_TEMPO`].
pub fn default_metronome() -> Metronome {
    Metronome::new(DEFAULT_BEAT_UNIT, DEFAULT_TEMPO)
}

/// First metronome mark in document order.
pub fn first_metronome(measures: &[Measure]) -> Option<&Metronome> {
    measures
        .iter()
        .flat_map(|m| m.directions())
        .flat_map(|d| d.types.iter())
        .find_map(|t| match t {
            DirectionType::Metronome(m) => Some(m),
            _ => None,
        })
}

/// First time signature in document order, or 4/4.
pub fn first_time_signature(measures: &[Measure]) -> TimeSignature {
    measures
        .iter()
        .flat_map(|m| m.elements.iter())
        .find_map(|e| match e {
            Element::Attributes(a) => a.time.first().copied(),
            _ => None,
        })
        .unwrap_or_default()
}

/// Tempo mark a scene is planned with.
///
/// Starts from the piece's first mark (or the default mark). A mark whose
/// per-minute text is not a number falls back to [`DEFAULT_TEMPO`]. A
/// non-zero `tempo_override` replaces the per-minute value.
pub fn scene_metronome(measures: &[Measure], tempo_override: u32) -> Metronome {
    let mut metronome = first_metronome(measures)
        .cloned()
        .unwrap_or_else(default_metronome);

    if metronome.bpm().is_none() {
        log::warn!(
            "Unreadable tempo '{}', using {} BPM",
            metronome.per_minute,
            DEFAULT_TEMPO
        );
        metronome.set_bpm(DEFAULT_TEMPO);
    }
    if tempo_override > 0 {
        metronome.set_bpm(tempo_override);
    }
    metronome
}
