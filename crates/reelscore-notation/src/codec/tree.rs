//! quick-xml event stream <-> [`XmlNode`] tree.

use crate::error::{Error, Result};
use crate::node::{XmlContent, XmlNode};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

/// Parse a document and return its root element.
///
/// Declarations, comments, processing instructions and the doctype are
/// skipped. Whitespace-only text between elements is dropped.
pub fn parse_document(content: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(start_node(&e)?),
            Event::Empty(e) => {
                let node = start_node(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlContent::Element(node)),
                    None => return Ok(node),
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or(Error::UnexpectedEof)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlContent::Element(node)),
                    None => return Ok(node),
                }
            }
            Event::Text(t) => {
                if let Some(parent) = stack.last_mut() {
                    let text = t.unescape()?;
                    if !text.is_empty() {
                        parent.children.push(XmlContent::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(c) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                    parent.children.push(XmlContent::Text(text));
                }
            }
            Event::Eof => return Err(Error::UnexpectedEof),
            _ => {}
        }
    }
}

fn start_node(e: &BytesStart) -> Result<XmlNode> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut node = XmlNode::new(name);
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

/// Serialize `root` with an XML declaration and an optional doctype,
/// indented by two spaces.
pub fn write_document(root: &XmlNode, doctype: Option<&str>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    if let Some(doctype) = doctype {
        writer.write_event(Event::DocType(BytesText::from_escaped(doctype)))?;
    }
    write_node(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<()> {
    let start = BytesStart::new(node.name.as_str()).with_attributes(
        node.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str())),
    );

    if node.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &node.children {
        match child {
            XmlContent::Element(n) => write_node(writer, n)?,
            XmlContent::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}
