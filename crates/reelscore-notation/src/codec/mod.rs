//! MusicXML codec.
//!
//! Decoding goes text -> [`XmlNode`](crate::node::XmlNode) tree -> [`Score`];
//! encoding takes the reverse path. Elements the model does not interpret are
//! carried through the tree unchanged.

use crate::error::Result;
use crate::model::Score;
use std::fs;
use std::path::Path;

mod container;
mod decode;
mod encode;
mod tree;

pub use container::{unzip_container, CONTAINER_MANIFEST};
pub use tree::{parse_document, write_document};

/// Doctype written in front of every encoded score.
pub const PARTWISE_DOCTYPE: &str = r#"score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd""#;

/// File name used for scores without a title.
pub const DEFAULT_FILE_NAME: &str = "reelscore.musicxml";

/// Decode a partwise MusicXML document.
pub fn decode(content: &str) -> Result<Score> {
    let root = parse_document(content)?;
    decode::score_from_node(&root)
}

/// Encode a score as an indented MusicXML document.
pub fn encode(score: &Score) -> Result<String> {
    write_document(&encode::score_to_node(score), Some(PARTWISE_DOCTYPE))
}

/// Decode raw file contents; `.mxl` names are unpacked from their container first.
pub fn decode_bytes(name: &str, bytes: &[u8]) -> Result<Score> {
    if is_compressed(name) {
        decode(&unzip_container(bytes)?)
    } else {
        decode(&String::from_utf8_lossy(bytes))
    }
}

/// Read a score from disk.
pub fn read_score<P: AsRef<Path>>(path: P) -> Result<Score> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    decode_bytes(&path.to_string_lossy(), &bytes)
}

/// Encode a score and write it to disk.
pub fn write_score<P: AsRef<Path>>(path: P, score: &Score) -> Result<()> {
    fs::write(path, encode(score)?)?;
    Ok(())
}

/// Output file name derived from the work title.
pub fn file_name_for(score: &Score) -> String {
    match score.work_title.as_deref() {
        Some(title) if !title.is_empty() => format!("{}.musicxml", title.replace(' ', "_")),
        _ => DEFAULT_FILE_NAME.to_string(),
    }
}

fn is_compressed(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("mxl"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    const SCORE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="4.0">
  <work><work-title>Hurry No. 1</work-title></work>
  <identification><encoding><software>hand</software></encoding></identification>
  <credit page="1">
    <credit-type>composer</credit-type>
    <credit-words justify="right">Minot</credit-words>
  </credit>
  <part-list>
    <score-part id="P1"><part-name>Piano</part-name></score-part>
  </part-list>
  <part id="P1">
    <measure number="1" width="210">
      <print new-system="yes"><system-layout><top-system-distance>70</top-system-distance></system-layout></print>
      <attributes>
        <divisions>1</divisions>
        <key><fifths>-1</fifths></key>
        <time><beats>2</beats><beat-type>4</beat-type></time>
        <clef><sign>G</sign><line>2</line></clef>
      </attributes>
      <direction placement="above">
        <direction-type><rehearsal>A</rehearsal></direction-type>
        <direction-type><metronome parentheses="no"><beat-unit>quarter</beat-unit><beat-unit-dot/><per-minute>132</per-minute></metronome></direction-type>
        <sound tempo="132"/>
      </direction>
      <note><rest measure="yes"/><duration>2</duration><voice>1</voice></note>
      <barline location="right">
        <bar-style>light-heavy</bar-style>
        <ending number="1" type="stop"/>
        <repeat direction="backward"/>
      </barline>
    </measure>
    <measure number="2">
      <direction><direction-type><segno/></direction-type></direction>
      <direction><direction-type><words>D.S.</words></direction-type></direction>
    </measure>
  </part>
</score-partwise>
"#;

    #[test]
    fn test_decode_score() {
        let score = decode(SCORE).unwrap();

        assert_eq!(score.title(), "Hurry No. 1");
        assert_eq!(score.composer(), "Minot");
        assert_eq!(score.header_extra.len(), 1);
        assert_eq!(score.part_list[0].name.as_deref(), Some("Piano"));

        let measures = score.measures();
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[0].number, "1");
        assert_eq!(measures[0].attributes, vec![("width".to_string(), "210".to_string())]);
        assert!(measures[0].has_rehearsal_mark());

        let kinds: Vec<_> = measures[0].elements.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Print,
                ElementKind::Attributes,
                ElementKind::Direction,
                ElementKind::Note,
                ElementKind::Barline,
            ]
        );

        match &measures[0].elements[1] {
            Element::Attributes(a) => {
                assert_eq!(a.time, vec![TimeSignature::new(2, 4)]);
                assert_eq!(a.clefs, vec![Clef::new("G", 2)]);
            }
            other => panic!("expected attributes, got {:?}", other),
        }

        match &measures[0].elements[2] {
            Element::Direction(d) => {
                assert_eq!(d.extra.len(), 1);
                match &d.types[1] {
                    DirectionType::Metronome(m) => {
                        assert_eq!(m.beat_unit, "quarter");
                        assert_eq!(m.beat_unit_dots, 1);
                        assert_eq!(m.bpm(), Some(132));
                    }
                    other => panic!("expected metronome, got {:?}", other),
                }
            }
            other => panic!("expected direction, got {:?}", other),
        }

        let barline = measures[0].barlines().next().unwrap();
        assert_eq!(barline.style, Some(BarStyle::LightHeavy));
        assert_eq!(barline.ending.as_ref().unwrap().kind, EndingKind::Stop);
        assert_eq!(barline.repeat.as_ref().unwrap().direction, RepeatDirection::Backward);

        let second: Vec<_> = measures[1].directions().map(|d| d.types[0].clone()).collect();
        assert_eq!(second[0], DirectionType::Segno);
        assert!(matches!(&second[1], DirectionType::Words(w) if w[0].value == "D.S."));
    }

    #[test]
    fn test_encode_then_decode_preserves_model() {
        let score = decode(SCORE).unwrap();
        let text = encode(&score).unwrap();

        assert!(text.contains("<!DOCTYPE score-partwise PUBLIC"));
        assert_eq!(decode(&text).unwrap(), score);
    }

    #[test]
    fn test_decode_rejects_other_roots() {
        assert!(matches!(
            decode("<score-timewise/>"),
            Err(crate::Error::UnexpectedRoot(name)) if name == "score-timewise"
        ));
    }

    #[test]
    fn test_decode_invalid_ending_type() {
        let doc = r#"<score-partwise><part id="P1"><measure number="1">
            <barline><ending number="1" type="sideways"/></barline>
        </measure></part></score-partwise>"#;
        assert!(matches!(decode(doc), Err(crate::Error::InvalidValue { .. })));
    }

    #[test]
    fn test_composite_time_signature_kept_verbatim() {
        let doc = r#"<score-partwise><part id="P1"><measure number="1">
            <attributes><time><beats>3+2</beats><beat-type>8</beat-type></time></attributes>
        </measure></part></score-partwise>"#;
        let score = decode(doc).unwrap();
        match &score.measures()[0].elements[0] {
            Element::Attributes(a) => {
                assert!(a.time.is_empty());
                assert_eq!(a.extra[0].name, "time");
            }
            other => panic!("expected attributes, got {:?}", other),
        }
    }

    #[test]
    fn test_file_name_for() {
        assert_eq!(
            file_name_for(&Score::new().with_title("Reel One Chase")),
            "Reel_One_Chase.musicxml"
        );
        assert_eq!(file_name_for(&Score::new()), DEFAULT_FILE_NAME);
    }

    #[test]
    fn test_write_and_read_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.musicxml");
        let score = Score::new()
            .with_title("Out")
            .with_part("P1", vec![Measure::new().with_rest()]);

        write_score(&path, &score).unwrap();
        let read = read_score(&path).unwrap();
        assert_eq!(read.title(), "Out");
        assert_eq!(read.measures().len(), 1);
    }
}
