//! WordprocessingML part templates.

use std::collections::BTreeSet;
use std::fmt::Write;

use quick_xml::escape::escape;

use crate::model::{mime_type_for_extension, Alignment};

use super::options::TextStyle;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Relationship id reserved for the styles part.
pub const STYLES_RELATIONSHIP_ID: &str = "rId1";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// `[Content_Types].xml` with a default entry per picture extension.
pub fn content_types_xml<'a, I>(image_extensions: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let extensions: BTreeSet<String> = image_extensions
        .into_iter()
        .map(str::to_ascii_lowercase)
        .filter(|ext| ext != "xml" && ext != "rels")
        .collect();

    let mut xml = format!("{}\n<Types xmlns=\"{}\">", XML_DECL, NS_CT);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for ext in &extensions {
        let _ = write!(
            xml,
            r#"<Default Extension="{}" ContentType="{}"/>"#,
            ext,
            mime_type_for_extension(ext)
        );
    }
    xml.push_str(r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#);
    xml.push_str("</Types>");
    xml
}

/// `_rels/.rels`.
pub fn package_rels_xml() -> String {
    format!(
        r#"{}
<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}" Target="word/document.xml"/></Relationships>"#,
        XML_DECL, NS_RELS, REL_OFFICE_DOCUMENT
    )
}

/// `word/_rels/document.xml.rels` for the styles part and each picture.
///
/// `media` holds `(relationship id, target relative to word/)` pairs.
pub fn document_rels_xml(media: &[(String, String)]) -> String {
    let mut xml = format!("{}\n<Relationships xmlns=\"{}\">", XML_DECL, NS_RELS);
    let _ = write!(
        xml,
        r#"<Relationship Id="{}" Type="{}" Target="styles.xml"/>"#,
        STYLES_RELATIONSHIP_ID, REL_STYLES
    );
    for (id, target) in media {
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape(id.as_str()),
            REL_IMAGE,
            escape(target.as_str())
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// `word/styles.xml` with document defaults taken from the body style.
pub fn styles_xml(body: &TextStyle) -> String {
    let font = escape(body.font.as_str());
    format!(
        r#"{decl}
<w:styles xmlns:w="{ns}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}" w:cs="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/><w:lang w:val="en-US" w:eastAsia="zh-CN"/></w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style></w:styles>"#,
        decl = XML_DECL,
        ns = NS_W,
        font = font,
        size = body.size_half_points(),
    )
}

/// `word/document.xml` around already rendered body paragraphs, on A4.
pub fn document_xml(paragraphs: &str) -> String {
    format!(
        r#"{decl}
<w:document xmlns:w="{w}" xmlns:r="{r}" xmlns:wp="{wp}" xmlns:a="{a}" xmlns:pic="{pic}"><w:body>{body}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1440" w:right="1800" w:bottom="1440" w:left="1800" w:header="851" w:footer="992" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        decl = XML_DECL,
        w = NS_W,
        r = NS_R,
        wp = NS_WP,
        a = NS_A,
        pic = NS_PIC,
        body = paragraphs,
    )
}

/// A paragraph with the given alignment and pre-rendered runs.
pub fn paragraph_xml(alignment: Alignment, runs: &str) -> String {
    if alignment == Alignment::Left {
        return format!("<w:p>{}</w:p>", runs);
    }
    format!(
        r#"<w:p><w:pPr><w:jc w:val="{}"/></w:pPr>{}</w:p>"#,
        alignment.as_ooxml(),
        runs
    )
}

/// An empty paragraph.
pub fn empty_paragraph_xml() -> String {
    "<w:p/>".to_string()
}

fn run_properties_xml(style: &TextStyle) -> String {
    let font = escape(style.font.as_str());
    let bold = if style.bold { "<w:b/><w:bCs/>" } else { "" };
    format!(
        r#"<w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:eastAsia="{font}"/>{bold}<w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr>"#,
        font = font,
        bold = bold,
        size = style.size_half_points(),
    )
}

/// A styled run. Newlines become `w:br` and tabs become `w:tab`.
pub fn run_xml(text: &str, style: &TextStyle) -> String {
    let mut xml = String::from("<w:r>");
    xml.push_str(&run_properties_xml(style));

    let mut first_line = true;
    for line in text.split('\n') {
        if !first_line {
            xml.push_str("<w:br/>");
        }
        first_line = false;

        let mut first_cell = true;
        for cell in line.split('\t') {
            if !first_cell {
                xml.push_str("<w:tab/>");
            }
            first_cell = false;
            if !cell.is_empty() {
                let _ = write!(
                    xml,
                    r#"<w:t xml:space="preserve">{}</w:t>"#,
                    escape(cell)
                );
            }
        }
    }

    xml.push_str("</w:r>");
    xml
}

/// An inline picture run.
///
/// `id` must be unique among drawings of the document.
pub fn picture_run_xml(relationship_id: &str, id: usize, name: &str, cx: u64, cy: u64) -> String {
    let name = escape(name);
    let rid = escape(relationship_id);
    format!(
        r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id="{id}" name="Picture {id}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="{pic_ns}"><pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
        cx = cx,
        cy = cy,
        id = id,
        name = name,
        rid = rid,
        pic_ns = NS_PIC,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types_lists_each_extension_once() {
        let xml = content_types_xml(["png", "JPEG", "png"]);
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
        assert!(xml.contains(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#));
        assert!(xml.contains("/word/styles.xml"));
    }

    #[test]
    fn test_run_escapes_and_breaks() {
        let style = TextStyle::new("宋体", 12.0, false);
        let xml = run_xml("a<b>&\nc\td", &style);
        assert!(xml.contains("a&lt;b&gt;&amp;"));
        assert!(xml.contains("<w:br/>"));
        assert!(xml.contains("<w:tab/>"));
        assert!(xml.contains(r#"<w:sz w:val="24"/>"#));
        assert!(!xml.contains("<w:b/>"));
    }

    #[test]
    fn test_bold_run() {
        let style = TextStyle::new("黑体", 16.0, true);
        let xml = run_xml("标题", &style);
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"w:eastAsia="黑体""#));
    }

    #[test]
    fn test_centered_paragraph() {
        let xml = paragraph_xml(Alignment::Center, "<w:r/>");
        assert_eq!(xml, r#"<w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r/></w:p>"#);
        assert_eq!(paragraph_xml(Alignment::Left, ""), "<w:p></w:p>");
    }

    #[test]
    fn test_document_rels() {
        let xml = document_rels_xml(&[("rId2".into(), "media/image_0.png".into())]);
        assert!(xml.contains(r#"Id="rId1""#));
        assert!(xml.contains(r#"Target="media/image_0.png""#));
    }

    #[test]
    fn test_generated_parts_are_well_formed() {
        let style = TextStyle::new("宋体", 12.0, false);
        let body = paragraph_xml(Alignment::Center, &picture_run_xml("rId2", 1, "p.png", 10, 20))
            + &paragraph_xml(Alignment::Left, &run_xml("x", &style));
        for xml in [
            content_types_xml(["png"]),
            package_rels_xml(),
            document_rels_xml(&[]),
            styles_xml(&style),
            document_xml(&body),
        ] {
            let mut reader = quick_xml::Reader::from_str(&xml);
            loop {
                match reader.read_event() {
                    Ok(quick_xml::events::Event::Eof) => break,
                    Ok(_) => {}
                    Err(e) => panic!("malformed part: {}", e),
                }
            }
        }
    }
}
