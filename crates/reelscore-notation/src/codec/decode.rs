//! [`XmlNode`] tree -> typed [`Score`].

use crate::error::{Error, Result};
use crate::model::*;
use crate::node::XmlNode;
use std::str::FromStr;

/// Map a `score-partwise` root element onto the model.
pub fn score_from_node(root: &XmlNode) -> Result<Score> {
    if root.name != "score-partwise" {
        return Err(Error::UnexpectedRoot(root.name.clone()));
    }

    let mut score = Score {
        version: root.attribute("version").map(String::from),
        ..Default::default()
    };

    for child in root.elements() {
        match child.name.as_str() {
            "work" => score.work_title = child.child_text("work-title"),
            "defaults" => score.defaults = Some(read_defaults(child)?),
            "credit" => score.credits.push(read_credit(child)),
            "part-list" => {
                score.part_list = child
                    .elements()
                    .filter(|n| n.name == "score-part")
                    .map(read_score_part)
                    .collect()
            }
            "part" => score.parts.push(read_part(child)?),
            _ => score.header_extra.push(child.clone()),
        }
    }
    Ok(score)
}

/// Parse the text of child `name`, if present.
fn parse_child<T: FromStr>(node: &XmlNode, name: &str) -> Result<Option<T>> {
    match node.child_text(name) {
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidValue {
                element: name.to_string(),
                value: text,
            }),
        None => Ok(None),
    }
}

fn formatted_text(node: &XmlNode) -> FormattedText {
    FormattedText {
        value: node.text(),
        attributes: node.attributes.clone(),
    }
}

fn read_credit(node: &XmlNode) -> Credit {
    Credit {
        page: node.attribute("page").map(String::from),
        kinds: node
            .elements()
            .filter(|n| n.name == "credit-type")
            .map(|n| n.text().trim().to_string())
            .collect(),
        words: node.find("credit-words").map(formatted_text),
    }
}

fn read_score_part(node: &XmlNode) -> ScorePart {
    ScorePart {
        id: node.attribute("id").unwrap_or_default().to_string(),
        name: node.child_text("part-name"),
        abbreviation: node.child_text("part-abbreviation"),
        extra: node
            .elements()
            .filter(|n| n.name != "part-name" && n.name != "part-abbreviation")
            .cloned()
            .collect(),
    }
}

fn read_defaults(node: &XmlNode) -> Result<Defaults> {
    let mut defaults = Defaults::default();
    for child in node.elements() {
        match child.name.as_str() {
            "scaling" => {
                defaults.scaling = Some(Scaling {
                    millimeters: parse_child(child, "millimeters")?.unwrap_or(7.0),
                    tenths: parse_child(child, "tenths")?.unwrap_or(40.0),
                })
            }
            "page-layout" => {
                let mut layout = PageLayout {
                    height: parse_child(child, "page-height")?,
                    width: parse_child(child, "page-width")?,
                    margins: Vec::new(),
                };
                for margins in child.elements().filter(|n| n.name == "page-margins") {
                    layout.margins.push(PageMargins {
                        kind: margins.attribute("type").map(String::from),
                        left: parse_child(margins, "left-margin")?.unwrap_or(0.0),
                        right: parse_child(margins, "right-margin")?.unwrap_or(0.0),
                        top: parse_child(margins, "top-margin")?.unwrap_or(0.0),
                        bottom: parse_child(margins, "bottom-margin")?.unwrap_or(0.0),
                    });
                }
                defaults.page_layout = Some(layout);
            }
            _ => defaults.extra.push(child.clone()),
        }
    }
    Ok(defaults)
}

fn read_part(node: &XmlNode) -> Result<Part> {
    let measures = node
        .elements()
        .filter(|n| n.name == "measure")
        .map(read_measure)
        .collect::<Result<Vec<_>>>()?;
    Ok(Part {
        id: node.attribute("id").unwrap_or_default().to_string(),
        measures,
    })
}

fn read_measure(node: &XmlNode) -> Result<Measure> {
    let mut measure = Measure {
        number: node.attribute("number").unwrap_or_default().to_string(),
        attributes: node
            .attributes
            .iter()
            .filter(|(k, _)| k != "number")
            .cloned()
            .collect(),
        elements: Vec::new(),
    };

    for child in node.elements() {
        let element = match child.name.as_str() {
            "direction" => Element::Direction(read_direction(child)),
            "attributes" => Element::Attributes(read_attributes(child)?),
            "barline" => Element::Barline(read_barline(child)?),
            "print" => Element::Print(read_print(child)),
            "note" => Element::Note(child.clone()),
            _ => Element::Other(child.clone()),
        };
        measure.elements.push(element);
    }
    Ok(measure)
}

fn read_direction(node: &XmlNode) -> Direction {
    let mut direction = Direction {
        placement: node.attribute("placement").map(String::from),
        system: node.attribute("system").map(String::from),
        ..Default::default()
    };
    for child in node.elements() {
        if child.name == "direction-type" {
            direction.types.push(read_direction_type(child));
        } else {
            direction.extra.push(child.clone());
        }
    }
    direction
}

/// Interpret one `<direction-type>`. Mixed or unknown content is kept verbatim.
fn read_direction_type(node: &XmlNode) -> DirectionType {
    let children: Vec<&XmlNode> = node.elements().collect();
    let all_named = |name: &str| !children.is_empty() && children.iter().all(|c| c.name == name);

    if all_named("words") {
        DirectionType::Words(children.iter().map(|c| formatted_text(c)).collect())
    } else if all_named("rehearsal") {
        DirectionType::Rehearsal(children.iter().map(|c| formatted_text(c)).collect())
    } else if all_named("segno") {
        DirectionType::Segno
    } else if all_named("coda") {
        DirectionType::Coda
    } else if children.len() == 1 && children[0].name == "metronome" {
        match read_metronome(children[0]) {
            Some(metronome) => DirectionType::Metronome(metronome),
            None => DirectionType::Other(node.clone()),
        }
    } else {
        DirectionType::Other(node.clone())
    }
}

/// Read a `beat-unit = per-minute` mark. Metric modulations
/// (`beat-unit = beat-unit`) have no per-minute and are not interpreted.
fn read_metronome(node: &XmlNode) -> Option<Metronome> {
    let per_minute = node.child_text("per-minute")?;
    let mut beat_unit = None;
    let mut beat_unit_dots = 0;
    for child in node.elements() {
        match child.name.as_str() {
            "beat-unit" if beat_unit.is_none() => beat_unit = Some(child.text().trim().to_string()),
            "beat-unit-dot" if beat_unit.is_some() => beat_unit_dots += 1,
            _ => {}
        }
    }
    Some(Metronome {
        beat_unit: beat_unit.unwrap_or_default(),
        beat_unit_dots,
        per_minute,
        parentheses: node.attribute("parentheses").map(String::from),
    })
}

fn read_attributes(node: &XmlNode) -> Result<Attributes> {
    let mut attributes = Attributes::default();
    for child in node.elements() {
        match child.name.as_str() {
            "divisions" => attributes.divisions = Some(child.text().trim().to_string()),
            "key" => attributes.keys.push(child.clone()),
            "time" => match read_time(child) {
                Some(time) => attributes.time.push(time),
                None => {
                    log::warn!("Keeping unsupported time signature verbatim");
                    attributes.extra.push(child.clone());
                }
            },
            "staves" => attributes.staves = Some(child.text().trim().to_string()),
            "clef" => attributes.clefs.push(Clef {
                number: child.attribute("number").map(String::from),
                sign: child.child_text("sign").unwrap_or_default(),
                line: parse_child(child, "line")?,
                octave_change: parse_child(child, "clef-octave-change")?,
            }),
            _ => attributes.extra.push(child.clone()),
        }
    }
    Ok(attributes)
}

/// Simple `beats/beat-type` signatures only; composite ones like `3+2/8` are `None`.
fn read_time(node: &XmlNode) -> Option<TimeSignature> {
    let beats = node.child_text("beats")?.parse().ok()?;
    let beat_type = node.child_text("beat-type")?.parse().ok()?;
    Some(TimeSignature::new(beats, beat_type))
}

fn read_barline(node: &XmlNode) -> Result<Barline> {
    let mut barline = Barline {
        location: node.attribute("location").map(String::from),
        ..Default::default()
    };
    for child in node.elements() {
        match child.name.as_str() {
            "bar-style" => {
                let text = child.text();
                barline.style = BarStyle::parse(&text);
                if barline.style.is_none() {
                    log::warn!("Unknown bar style '{}'", text);
                }
            }
            "ending" => {
                let kind_text = child.attribute("type").unwrap_or_default();
                let kind = EndingKind::parse(kind_text).ok_or_else(|| Error::InvalidValue {
                    element: "ending".into(),
                    value: kind_text.to_string(),
                })?;
                let text = child.text();
                barline.ending = Some(Ending {
                    number: child.attribute("number").unwrap_or_default().to_string(),
                    kind,
                    text: (!text.is_empty()).then_some(text),
                });
            }
            "repeat" => {
                let direction_text = child.attribute("direction").unwrap_or_default();
                let direction =
                    RepeatDirection::parse(direction_text).ok_or_else(|| Error::InvalidValue {
                        element: "repeat".into(),
                        value: direction_text.to_string(),
                    })?;
                barline.repeat = Some(Repeat {
                    direction,
                    times: child.attribute("times").map(String::from),
                });
            }
            _ => barline.extra.push(child.clone()),
        }
    }
    Ok(barline)
}

fn read_print(node: &XmlNode) -> Print {
    Print {
        new_page: node.attribute("new-page") == Some("yes"),
        new_system: node.attribute("new-system") == Some("yes"),
        attributes: node
            .attributes
            .iter()
            .filter(|(k, _)| k != "new-page" && k != "new-system")
            .cloned()
            .collect(),
        children: node.elements().cloned().collect(),
    }
}
