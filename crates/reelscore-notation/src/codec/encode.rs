//! Typed [`Score`] -> [`XmlNode`] tree.

use crate::model::*;
use crate::node::{XmlContent, XmlNode};

/// Build the `score-partwise` root element for `score`.
pub fn score_to_node(score: &Score) -> XmlNode {
    let mut root = XmlNode::new("score-partwise");
    if let Some(version) = &score.version {
        root = root.attr("version", version);
    }

    if let Some(title) = &score.work_title {
        root = root.child(XmlNode::new("work").child(XmlNode::with_text("work-title", title)));
    }
    for extra in &score.header_extra {
        root = root.child(extra.clone());
    }
    if let Some(defaults) = &score.defaults {
        root = root.child(defaults_node(defaults));
    }
    for credit in &score.credits {
        root = root.child(credit_node(credit));
    }

    let mut part_list = XmlNode::new("part-list");
    for part in &score.part_list {
        part_list = part_list.child(score_part_node(part));
    }
    root = root.child(part_list);

    for part in &score.parts {
        let mut node = XmlNode::new("part").attr("id", &part.id);
        for measure in &part.measures {
            node = node.child(measure_node(measure));
        }
        root = root.child(node);
    }
    root
}

fn formatted_node(name: &str, text: &FormattedText) -> XmlNode {
    let mut node = XmlNode::with_text(name, &text.value);
    node.attributes = text.attributes.clone();
    node
}

fn number(value: f64) -> String {
    value.to_string()
}

fn credit_node(credit: &Credit) -> XmlNode {
    let mut node = XmlNode::new("credit");
    if let Some(page) = &credit.page {
        node = node.attr("page", page);
    }
    for kind in &credit.kinds {
        node = node.child(XmlNode::with_text("credit-type", kind));
    }
    if let Some(words) = &credit.words {
        node = node.child(formatted_node("credit-words", words));
    }
    node
}

fn score_part_node(part: &ScorePart) -> XmlNode {
    let mut node = XmlNode::new("score-part").attr("id", &part.id);
    node = node.child(XmlNode::with_text(
        "part-name",
        part.name.as_deref().unwrap_or(""),
    ));
    if let Some(abbreviation) = &part.abbreviation {
        node = node.child(XmlNode::with_text("part-abbreviation", abbreviation));
    }
    for extra in &part.extra {
        node = node.child(extra.clone());
    }
    node
}

fn defaults_node(defaults: &Defaults) -> XmlNode {
    let mut node = XmlNode::new("defaults");
    if let Some(scaling) = &defaults.scaling {
        node = node.child(
            XmlNode::new("scaling")
                .child(XmlNode::with_text("millimeters", number(scaling.millimeters)))
                .child(XmlNode::with_text("tenths", number(scaling.tenths))),
        );
    }
    if let Some(layout) = &defaults.page_layout {
        let mut layout_node = XmlNode::new("page-layout");
        if let Some(height) = layout.height {
            layout_node = layout_node.child(XmlNode::with_text("page-height", number(height)));
        }
        if let Some(width) = layout.width {
            layout_node = layout_node.child(XmlNode::with_text("page-width", number(width)));
        }
        for margins in &layout.margins {
            let mut margins_node = XmlNode::new("page-margins");
            if let Some(kind) = &margins.kind {
                margins_node = margins_node.attr("type", kind);
            }
            margins_node = margins_node
                .child(XmlNode::with_text("left-margin", number(margins.left)))
                .child(XmlNode::with_text("right-margin", number(margins.right)))
                .child(XmlNode::with_text("top-margin", number(margins.top)))
                .child(XmlNode::with_text("bottom-margin", number(margins.bottom)));
            layout_node = layout_node.child(margins_node);
        }
        node = node.child(layout_node);
    }
    for extra in &defaults.extra {
        node = node.child(extra.clone());
    }
    node
}

fn measure_node(measure: &Measure) -> XmlNode {
    let mut node = XmlNode::new("measure").attr("number", &measure.number);
    node.attributes.extend(measure.attributes.iter().cloned());
    for element in &measure.elements {
        let child = match element {
            Element::Direction(d) => direction_node(d),
            Element::Attributes(a) => attributes_node(a),
            Element::Barline(b) => barline_node(b),
            Element::Print(p) => print_node(p),
            Element::Note(n) | Element::Other(n) => n.clone(),
        };
        node = node.child(child);
    }
    node
}

fn direction_node(direction: &Direction) -> XmlNode {
    let mut node = XmlNode::new("direction");
    if let Some(placement) = &direction.placement {
        node = node.attr("placement", placement);
    }
    if let Some(system) = &direction.system {
        node = node.attr("system", system);
    }
    for t in &direction.types {
        node = node.child(direction_type_node(t));
    }
    for extra in &direction.extra {
        node = node.child(extra.clone());
    }
    node
}

fn direction_type_node(t: &DirectionType) -> XmlNode {
    let wrap = |children: Vec<XmlNode>| XmlNode {
        name: "direction-type".into(),
        attributes: Vec::new(),
        children: children.into_iter().map(XmlContent::Element).collect(),
    };
    match t {
        DirectionType::Words(runs) => wrap(runs.iter().map(|r| formatted_node("words", r)).collect()),
        DirectionType::Rehearsal(runs) => {
            wrap(runs.iter().map(|r| formatted_node("rehearsal", r)).collect())
        }
        DirectionType::Metronome(m) => wrap(vec![metronome_node(m)]),
        DirectionType::Segno => wrap(vec![XmlNode::new("segno")]),
        DirectionType::Coda => wrap(vec![XmlNode::new("coda")]),
        DirectionType::Other(node) => node.clone(),
    }
}

fn metronome_node(metronome: &Metronome) -> XmlNode {
    let mut node = XmlNode::new("metronome");
    if let Some(parentheses) = &metronome.parentheses {
        node = node.attr("parentheses", parentheses);
    }
    node = node.child(XmlNode::with_text("beat-unit", &metronome.beat_unit));
    for _ in 0..metronome.beat_unit_dots {
        node = node.child(XmlNode::new("beat-unit-dot"));
    }
    node.child(XmlNode::with_text("per-minute", &metronome.per_minute))
}

fn attributes_node(attributes: &Attributes) -> XmlNode {
    let mut node = XmlNode::new("attributes");
    if let Some(divisions) = &attributes.divisions {
        node = node.child(XmlNode::with_text("divisions", divisions));
    }
    for key in &attributes.keys {
        node = node.child(key.clone());
    }
    for time in &attributes.time {
        node = node.child(
            XmlNode::new("time")
                .child(XmlNode::with_text("beats", time.beats.to_string()))
                .child(XmlNode::with_text("beat-type", time.beat_type.to_string())),
        );
    }
    // Unreadable time signatures were parked in `extra`; they precede staves.
    for extra in attributes.extra.iter().filter(|n| n.name == "time") {
        node = node.child(extra.clone());
    }
    if let Some(staves) = &attributes.staves {
        node = node.child(XmlNode::with_text("staves", staves));
    }
    for clef in &attributes.clefs {
        let mut clef_node = XmlNode::new("clef");
        if let Some(number) = &clef.number {
            clef_node = clef_node.attr("number", number);
        }
        clef_node = clef_node.child(XmlNode::with_text("sign", &clef.sign));
        if let Some(line) = clef.line {
            clef_node = clef_node.child(XmlNode::with_text("line", line.to_string()));
        }
        if let Some(octave_change) = clef.octave_change {
            clef_node = clef_node.child(XmlNode::with_text(
                "clef-octave-change",
                octave_change.to_string(),
            ));
        }
        node = node.child(clef_node);
    }
    for extra in attributes.extra.iter().filter(|n| n.name != "time") {
        node = node.child(extra.clone());
    }
    node
}

fn barline_node(barline: &Barline) -> XmlNode {
    let mut node = XmlNode::new("barline");
    if let Some(location) = &barline.location {
        node = node.attr("location", location);
    }
    if let Some(style) = barline.style {
        node = node.child(XmlNode::with_text("bar-style", style.as_str()));
    }
    for extra in &barline.extra {
        node = node.child(extra.clone());
    }
    if let Some(ending) = &barline.ending {
        let mut ending_node = match &ending.text {
            Some(text) => XmlNode::with_text("ending", text),
            None => XmlNode::new("ending"),
        };
        ending_node = ending_node
            .attr("number", &ending.number)
            .attr("type", ending.kind.as_str());
        node = node.child(ending_node);
    }
    if let Some(repeat) = &barline.repeat {
        let mut repeat_node = XmlNode::new("repeat").attr("direction", repeat.direction.as_str());
        if let Some(times) = &repeat.times {
            repeat_node = repeat_node.attr("times", times);
        }
        node = node.child(repeat_node);
    }
    node
}

fn print_node(print: &Print) -> XmlNode {
    let mut node = XmlNode::new("print");
    if print.new_page {
        node = node.attr("new-page", "yes");
    }
    if print.new_system {
        node = node.attr("new-system", "yes");
    }
    node.attributes.extend(print.attributes.iter().cloned());
    for child in &print.children {
        node = node.child(child.clone());
    }
    node
}
