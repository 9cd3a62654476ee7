//! Parser for `*.rels` relationship parts.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;
use crate::model::{Relationship, Relationships};

/// Parse a relationships part into an ordered table.
///
/// Entries without an `Id` or `Target` are ignored.
pub fn parse_relationships(xml: &str) -> Result<Relationships> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut relationships = Relationships::new();
    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                if let Some(rel) = read_relationship(&e)? {
                    relationships.push(rel);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(relationships)
}

fn read_relationship(e: &BytesStart) -> Result<Option<Relationship>> {
    let mut id = None;
    let mut rel_type = String::new();
    let mut target = None;
    let mut external = false;

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"Id" => id = Some(value),
            b"Type" => rel_type = value,
            b"Target" => target = Some(value),
            b"TargetMode" => external = value.eq_ignore_ascii_case("External"),
            _ => {}
        }
    }

    Ok(match (id, target) {
        (Some(id), Some(target)) => Some(Relationship {
            id,
            rel_type,
            target,
            external,
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.jpeg"/>
  <Relationship Id="rId6" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="https://example.com/image.png" TargetMode="External"/>
  <Relationship Type="broken" Target="nowhere.xml"/>
</Relationships>"#;

    #[test]
    fn test_parse_relationships_in_order() {
        let rels = parse_relationships(RELS).unwrap();
        assert_eq!(rels.len(), 3);

        let ids: Vec<_> = rels.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId5", "rId6"]);

        let image = rels.get("rId5").unwrap();
        assert!(image.is_image());
        assert_eq!(image.part_name().as_deref(), Some("word/media/image1.jpeg"));
        assert!(rels.get("rId6").unwrap().external);
    }

    #[test]
    fn test_empty_relationships() {
        let rels = parse_relationships(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#,
        )
        .unwrap();
        assert!(rels.is_empty());
    }
}
