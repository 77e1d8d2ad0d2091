//! XML loader for DatexII publications.
//!
//! Builds a [`Node`] tree from the whole document using the usual XML-to-dict
//! mapping: attributes become `@name` keys, repeated sibling elements collapse
//! into a sequence, and text beside attributes or children lands in `#text`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::DatexError;
use crate::node::Node;

/// Decodes raw bytes as UTF-8, dropping invalid byte sequences and a leading BOM.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    match out.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

/// Element being assembled while its end tag has not been seen yet.
struct Frame {
    name: String,
    entries: Vec<(String, Node)>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, DatexError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut entries = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DatexError::malformed(position, e.to_string()))?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr
                .unescape_value()
                .map_err(|e| DatexError::malformed(position, e.to_string()))?;
            entries.push((key, Node::Scalar(value.into_owned())));
        }
        Ok(Frame {
            name,
            entries,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Node) {
        let text = self.text.trim();
        let node = if self.entries.is_empty() {
            if text.is_empty() {
                Node::Null
            } else {
                Node::Scalar(text.to_string())
            }
        } else {
            let mut entries = self.entries;
            if !text.is_empty() {
                entries.push(("#text".to_string(), Node::Scalar(text.to_string())));
            }
            Node::Mapping(entries)
        };
        (self.name, node)
    }
}

/// Adds a child element, turning a repeated name into a sequence at the
/// position of its first occurrence.
fn push_child(entries: &mut Vec<(String, Node)>, name: String, child: Node) {
    match entries.iter_mut().find(|(k, _)| *k == name) {
        Some((_, Node::Sequence(items))) => items.push(child),
        Some((_, existing)) => {
            let first = std::mem::take(existing);
            *existing = Node::Sequence(vec![first, child]);
        }
        None => entries.push((name, child)),
    }
}

/// Parses a complete XML document into a single-key mapping
/// `{root element name: root content}`. Namespace prefixes are kept.
///
/// # Errors
///
/// Returns [`DatexError::MalformedXml`] if the text is not well-formed XML
/// or contains no root element.
pub fn parse_document(xml: &str) -> Result<Node, DatexError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| DatexError::malformed(position, e.to_string()))?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(DatexError::malformed(position, "content after root element"));
                }
                stack.push(Frame::open(&start, position)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(DatexError::malformed(position, "content after root element"));
                }
                let (name, node) = Frame::open(&start, position)?.close();
                attach(&mut stack, &mut root, name, node);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| DatexError::malformed(position, "unmatched end tag"))?;
                let (name, node) = frame.close();
                attach(&mut stack, &mut root, name, node);
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| DatexError::malformed(position, e.to_string()))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            // declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DatexError::malformed(
            reader.buffer_position() as u64,
            format!("unexpected end of document inside <{}>", open.name),
        ));
    }

    let (name, node) =
        root.ok_or_else(|| DatexError::malformed(0, "document has no root element"))?;
    Ok(Node::Mapping(vec![(name, node)]))
}

fn attach(stack: &mut [Frame], root: &mut Option<(String, Node)>, name: String, node: Node) {
    match stack.last_mut() {
        Some(parent) => push_child(&mut parent.entries, name, node),
        None => *root = Some((name, node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> Node {
        Node::Scalar(s.to_string())
    }

    #[test]
    fn test_parse_text_only_element_is_scalar() {
        let doc = parse_document("<a><b>hello</b></a>").unwrap();
        assert_eq!(doc.path(&["a", "b"]), Some(&scalar("hello")));
    }

    #[test]
    fn test_parse_attributes_and_text() {
        let doc = parse_document(r#"<a><value lang="de">Wien &amp; Umgebung</value></a>"#).unwrap();
        let value = doc.path(&["a", "value"]).unwrap();
        assert_eq!(value.get("@lang"), Some(&scalar("de")));
        assert_eq!(value.text(), Some("Wien & Umgebung"));
    }

    #[test]
    fn test_parse_repeated_children_become_sequence() {
        let doc = parse_document("<r><x>1</x><y/><x>2</x></r>").unwrap();
        let root = doc.get("r").unwrap();
        assert_eq!(
            root,
            &Node::Mapping(vec![
                ("x".to_string(), Node::Sequence(vec![scalar("1"), scalar("2")])),
                ("y".to_string(), Node::Null),
            ])
        );
    }

    #[test]
    fn test_parse_keeps_namespace_prefixes() {
        let xml = r#"<?xml version="1.0"?>
            <d2:payload xmlns:d2="urn:d2" xmlns:egi="urn:egi">
                <egi:energyInfrastructureTable id="t1"/>
            </d2:payload>"#;
        let doc = parse_document(xml).unwrap();
        let table = doc
            .path(&["d2:payload", "egi:energyInfrastructureTable"])
            .unwrap();
        assert_eq!(table.get("@id"), Some(&scalar("t1")));
    }

    #[test]
    fn test_parse_cdata_counts_as_text() {
        let doc = parse_document("<a><![CDATA[x < y]]></a>").unwrap();
        assert_eq!(doc.get("a"), Some(&scalar("x < y")));
    }

    #[test]
    fn test_parse_unclosed_element_fails() {
        let result = parse_document("<a><b>text</b>");
        assert!(matches!(result, Err(DatexError::MalformedXml { .. })));
    }

    #[test]
    fn test_parse_mismatched_tags_fail() {
        assert!(parse_document("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_parse_empty_input_fails() {
        assert!(parse_document("").is_err());
        assert!(parse_document("   ").is_err());
    }

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        let bytes = b"\xef\xbb\xbf<a>Gr\xffaz</a>";
        assert_eq!(decode_lossy(bytes), "<a>Graz</a>");
    }

    #[test]
    fn test_decode_lossy_keeps_non_ascii() {
        assert_eq!(decode_lossy("Straße 1, Wien".as_bytes()), "Straße 1, Wien");
    }
}
