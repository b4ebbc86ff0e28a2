//! Typed notation document model.
//!
//! A [`Score`] follows the partwise MusicXML layout: header data (work title,
//! credits, part list, page defaults) and a list of parts, each an ordered
//! list of [`Measure`]s. A measure holds an ordered list of [`Element`]s,
//! represented as a sum type rather than a struct of optional fields.
//!
//! Copying a measure is a plain `clone()`: the tree is fully owned, so a
//! clone never aliases its source.

use crate::node::XmlNode;

/// A complete score in partwise layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Score {
    /// MusicXML version attribute of the root element.
    pub version: Option<String>,
    /// Title from `<work><work-title>`.
    pub work_title: Option<String>,
    /// Header children the model does not interpret (identification, movement-title, ...).
    pub header_extra: Vec<XmlNode>,
    /// Page layout defaults.
    pub defaults: Option<Defaults>,
    /// Text credits printed on the page (title, composer, ...).
    pub credits: Vec<Credit>,
    /// Declared parts.
    pub part_list: Vec<ScorePart>,
    /// Part contents, in document order.
    pub parts: Vec<Part>,
}

/// A credit printed on a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Credit {
    pub page: Option<String>,
    /// Values of `<credit-type>`, e.g. `"title"` or `"composer"`.
    pub kinds: Vec<String>,
    pub words: Option<FormattedText>,
}

/// Text plus its formatting attributes (justify, font-size, default-x, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormattedText {
    pub value: String,
    pub attributes: Vec<(String, String)>,
}

impl FormattedText {
    /// Unformatted text.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            attributes: Vec::new(),
        }
    }
}

/// An entry of the part list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScorePart {
    pub id: String,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub extra: Vec<XmlNode>,
}

/// Scaling and page layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Defaults {
    pub scaling: Option<Scaling>,
    pub page_layout: Option<PageLayout>,
    pub extra: Vec<XmlNode>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    pub millimeters: f64,
    pub tenths: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub margins: Vec<PageMargins>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageMargins {
    /// `"odd"`, `"even"` or `"both"`; `None` when the attribute is absent.
    pub kind: Option<String>,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// A part: an id matching a [`ScorePart`] and its measures.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Part {
    pub id: String,
    pub measures: Vec<Measure>,
}

/// One bar of music.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measure {
    /// Display number. MusicXML allows non-numeric values, so this stays text.
    pub number: String,
    /// Measure attributes other than `number` (width, implicit, ...).
    pub attributes: Vec<(String, String)>,
    pub elements: Vec<Element>,
}

/// A music-data element inside a measure.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Direction(Direction),
    Attributes(Attributes),
    Barline(Barline),
    Print(Print),
    /// Notes are opaque to the model.
    Note(XmlNode),
    /// Any other music-data element (backup, forward, harmony, sound, ...).
    Other(XmlNode),
}

/// Discriminant of [`Element`], used when placing new elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Direction,
    Attributes,
    Barline,
    Print,
    Note,
    Other,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Direction(_) => ElementKind::Direction,
            Element::Attributes(_) => ElementKind::Attributes,
            Element::Barline(_) => ElementKind::Barline,
            Element::Print(_) => ElementKind::Print,
            Element::Note(_) => ElementKind::Note,
            Element::Other(_) => ElementKind::Other,
        }
    }

    /// A fresh, empty element of the given kind.
    pub(crate) fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Direction => Element::Direction(Direction::default()),
            ElementKind::Attributes => Element::Attributes(Attributes::default()),
            ElementKind::Barline => Element::Barline(Barline::default()),
            ElementKind::Print => Element::Print(Print::default()),
            ElementKind::Note => Element::Note(XmlNode::new("note")),
            ElementKind::Other => Element::Other(XmlNode::new("other")),
        }
    }
}

/// A direction: text, rehearsal marks, tempo marks and navigation symbols.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Direction {
    pub placement: Option<String>,
    /// The `system` attribute (`"only-top"` marks system text).
    pub system: Option<String>,
    pub types: Vec<DirectionType>,
    /// Children after the direction types (offset, staff, sound, ...).
    pub extra: Vec<XmlNode>,
}

/// Content of one `<direction-type>`.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectionType {
    Words(Vec<FormattedText>),
    Rehearsal(Vec<FormattedText>),
    Metronome(Metronome),
    Segno,
    Coda,
    Other(XmlNode),
}

/// A metronome mark: a beat unit (possibly dotted) and a per-minute value.
#[derive(Debug, Clone, PartialEq)]
pub struct Metronome {
    /// Note type name, e.g. `"quarter"`.
    pub beat_unit: String,
    pub beat_unit_dots: usize,
    /// Kept as text; scores in the wild contain values like `"c. 80"`.
    pub per_minute: String,
    pub parentheses: Option<String>,
}

impl Metronome {
    /// Create a metronome mark.
    pub fn new(beat_unit: impl Into<String>, per_minute: u32) -> Self {
        Self {
            beat_unit: beat_unit.into(),
            beat_unit_dots: 0,
            per_minute: per_minute.to_string(),
            parentheses: None,
        }
    }

    /// Per-minute value as a number, if it is one.
    pub fn bpm(&self) -> Option<u32> {
        self.per_minute.trim().parse().ok()
    }

    /// Overwrite the per-minute value.
    pub fn set_bpm(&mut self, bpm: u32) {
        self.per_minute = bpm.to_string();
    }
}

/// Measure attributes: divisions, key, time, staves and clefs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    pub divisions: Option<String>,
    pub keys: Vec<XmlNode>,
    pub time: Vec<TimeSignature>,
    pub staves: Option<String>,
    pub clefs: Vec<Clef>,
    /// Remaining children, including time signatures the model cannot read.
    pub extra: Vec<XmlNode>,
}

/// Musical time signature (numerator/denominator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats: u32,
    pub beat_type: u32,
}

impl TimeSignature {
    pub fn new(beats: u32, beat_type: u32) -> Self {
        Self { beats, beat_type }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.beats, self.beat_type)
    }
}

/// A clef declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Clef {
    /// Staff number for multi-staff parts.
    pub number: Option<String>,
    pub sign: String,
    pub line: Option<i32>,
    pub octave_change: Option<i32>,
}

impl Clef {
    pub fn new(sign: impl Into<String>, line: i32) -> Self {
        Self {
            number: None,
            sign: sign.into(),
            line: Some(line),
            octave_change: None,
        }
    }

    /// Two clefs are the same when sign, line and octave shift agree.
    pub fn same_as(&self, other: &Clef) -> bool {
        self.sign == other.sign && self.line == other.line && self.octave_change == other.octave_change
    }
}

/// A barline, optionally carrying an ending bracket or repeat sign.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Barline {
    pub location: Option<String>,
    pub style: Option<BarStyle>,
    pub ending: Option<Ending>,
    pub repeat: Option<Repeat>,
    /// Other children (fermata, segno, coda, ...).
    pub extra: Vec<XmlNode>,
}

impl Barline {
    /// True when nothing is left to print.
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.ending.is_none() && self.repeat.is_none() && self.extra.is_empty()
    }
}

/// Visual style of a barline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarStyle {
    Dashed,
    Dotted,
    Heavy,
    HeavyHeavy,
    HeavyLight,
    LightHeavy,
    LightLight,
    Regular,
    Short,
    Tick,
    None,
}

impl BarStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BarStyle::Dashed => "dashed",
            BarStyle::Dotted => "dotted",
            BarStyle::Heavy => "heavy",
            BarStyle::HeavyHeavy => "heavy-heavy",
            BarStyle::HeavyLight => "heavy-light",
            BarStyle::LightHeavy => "light-heavy",
            BarStyle::LightLight => "light-light",
            BarStyle::Regular => "regular",
            BarStyle::Short => "short",
            BarStyle::Tick => "tick",
            BarStyle::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let style = match s.trim() {
            "dashed" => BarStyle::Dashed,
            "dotted" => BarStyle::Dotted,
            "heavy" => BarStyle::Heavy,
            "heavy-heavy" => BarStyle::HeavyHeavy,
            "heavy-light" => BarStyle::HeavyLight,
            "light-heavy" => BarStyle::LightHeavy,
            "light-light" => BarStyle::LightLight,
            "regular" => BarStyle::Regular,
            "short" => BarStyle::Short,
            "tick" => BarStyle::Tick,
            "none" => BarStyle::None,
            _ => return None,
        };
        Some(style)
    }
}

/// An ending (volta) bracket boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Ending {
    /// Ending number list, e.g. `"1"` or `"1, 2"`.
    pub number: String,
    pub kind: EndingKind,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndingKind {
    Start,
    Stop,
    Discontinue,
}

impl EndingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EndingKind::Start => "start",
            EndingKind::Stop => "stop",
            EndingKind::Discontinue => "discontinue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "start" => Some(EndingKind::Start),
            "stop" => Some(EndingKind::Stop),
            "discontinue" => Some(EndingKind::Discontinue),
            _ => None,
        }
    }
}

/// A repeat sign on a barline.
#[derive(Debug, Clone, PartialEq)]
pub struct Repeat {
    pub direction: RepeatDirection,
    pub times: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatDirection {
    Forward,
    Backward,
}

impl RepeatDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatDirection::Forward => "forward",
            RepeatDirection::Backward => "backward",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "forward" => Some(RepeatDirection::Forward),
            "backward" => Some(RepeatDirection::Backward),
            _ => None,
        }
    }
}

/// Layout hint: page and system breaks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Print {
    pub new_page: bool,
    pub new_system: bool,
    /// Attributes other than new-page/new-system.
    pub attributes: Vec<(String, String)>,
    /// Layout children (system-layout, staff-layout, ...).
    pub children: Vec<XmlNode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_style_strings() {
        for style in [
            BarStyle::Dashed,
            BarStyle::HeavyLight,
            BarStyle::LightHeavy,
            BarStyle::LightLight,
            BarStyle::Tick,
        ] {
            assert_eq!(BarStyle::parse(style.as_str()), Some(style));
        }
        assert_eq!(BarStyle::parse("wiggly"), None);
    }

    #[test]
    fn test_clef_same_as_ignores_staff_number() {
        let mut treble = Clef::new("G", 2);
        let other = Clef::new("G", 2);
        treble.number = Some("1".into());
        assert!(treble.same_as(&other));

        let mut octave_down = Clef::new("G", 2);
        octave_down.octave_change = Some(-1);
        assert!(!treble.same_as(&octave_down));
        assert!(!treble.same_as(&Clef::new("F", 4)));
    }

    #[test]
    fn test_metronome_bpm() {
        let mut m = Metronome::new("quarter", 96);
        assert_eq!(m.bpm(), Some(96));
        m.per_minute = "c. 80".into();
        assert_eq!(m.bpm(), None);
        m.set_bpm(72);
        assert_eq!(m.per_minute, "72");
    }
}
