//! Streaming parser for `word/document.xml`.
//!
//! Only paragraphs that are direct children of `w:body` are collected, the
//! same set Word exposes as the document's top-level paragraphs. Paragraphs
//! inside tables, content controls and text boxes are not part of it.
//! Elements are matched by local name so unusual namespace prefixes still work.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;
use crate::model::{Alignment, ImageRef, ImageRefKind, Paragraph, Run};

/// What an open element means to the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Body,
    Paragraph,
    ParagraphProps,
    Hyperlink,
    Run,
    RunProps,
    Text,
    Drawing,
    Inline,
    Anchor,
    Other,
}

#[derive(Default)]
struct BodyWalker {
    stack: Vec<Frame>,
    paragraphs: Vec<Paragraph>,
    paragraph: Option<Paragraph>,
    run: Option<Run>,
}

impl BodyWalker {
    fn top(&self) -> Option<Frame> {
        self.stack.last().copied()
    }

    fn in_drawing(&self) -> bool {
        self.stack.contains(&Frame::Drawing)
    }

    /// Innermost picture wrapper, `Drawing` when there is none.
    fn picture_kind(&self) -> ImageRefKind {
        for frame in self.stack.iter().rev() {
            match frame {
                Frame::Inline => return ImageRefKind::Inline,
                Frame::Anchor => return ImageRefKind::Anchor,
                Frame::Drawing => break,
                _ => {}
            }
        }
        ImageRefKind::Drawing
    }

    fn classify(&self, name: &[u8]) -> Frame {
        let top = self.top();
        match name {
            b"body" if top.is_none() || self.stack.len() == 1 => Frame::Body,
            b"p" if top == Some(Frame::Body) => Frame::Paragraph,
            b"pPr" if top == Some(Frame::Paragraph) => Frame::ParagraphProps,
            b"hyperlink" if top == Some(Frame::Paragraph) => Frame::Hyperlink,
            b"r" if matches!(top, Some(Frame::Paragraph) | Some(Frame::Hyperlink)) => Frame::Run,
            b"rPr" if top == Some(Frame::Run) => Frame::RunProps,
            b"t" if top == Some(Frame::Run) => Frame::Text,
            b"drawing" if self.run.is_some() && !self.in_drawing() => Frame::Drawing,
            b"inline" if self.in_drawing() => Frame::Inline,
            b"anchor" if self.in_drawing() => Frame::Anchor,
            _ => Frame::Other,
        }
    }

    fn open(&mut self, e: &BytesStart) -> Result<()> {
        let name = e.local_name();
        let name = name.as_ref();
        let frame = self.classify(name);

        match frame {
            Frame::Paragraph => self.paragraph = Some(Paragraph::new()),
            Frame::Run => self.run = Some(Run::default()),
            Frame::Other => self.apply_property(name, e)?,
            _ => {}
        }

        self.stack.push(frame);
        Ok(())
    }

    /// Handle leaf elements that carry properties or inline content.
    fn apply_property(&mut self, name: &[u8], e: &BytesStart) -> Result<()> {
        let top = self.top();

        if top == Some(Frame::ParagraphProps) {
            if let Some(paragraph) = self.paragraph.as_mut() {
                match name {
                    b"jc" => {
                        if let Some(val) = attr(e, b"val")? {
                            paragraph.alignment = Alignment::from_ooxml(&val);
                        }
                    }
                    b"pStyle" => paragraph.style_id = attr(e, b"val")?,
                    _ => {}
                }
            }
            return Ok(());
        }

        if name == b"blip" && self.in_drawing() {
            let kind = self.picture_kind();
            if let (Some(run), Some(id)) = (self.run.as_mut(), attr(e, b"embed")?) {
                log::debug!("found {} picture reference {}", kind, id);
                run.images.push(ImageRef::new(kind, id));
            }
            return Ok(());
        }

        let Some(run) = self.run.as_mut() else {
            return Ok(());
        };

        match (top, name) {
            (Some(Frame::RunProps), b"b") => run.style.bold = !is_off(e)?,
            (Some(Frame::RunProps), b"i") => run.style.italic = !is_off(e)?,
            (Some(Frame::RunProps), b"sz") => {
                run.style.size_half_points = attr(e, b"val")?.and_then(|v| v.parse().ok());
            }
            (Some(Frame::RunProps), b"rFonts") => {
                run.style.font = attr(e, b"ascii")?;
                run.style.east_asia_font = attr(e, b"eastAsia")?;
            }
            (Some(Frame::Run), b"tab") => run.text.push('\t'),
            (Some(Frame::Run), b"br" | b"cr") => run.text.push('\n'),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self) {
        match self.stack.pop() {
            Some(Frame::Run) => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.add_run(run);
                }
            }
            Some(Frame::Paragraph) => {
                if let Some(paragraph) = self.paragraph.take() {
                    self.paragraphs.push(paragraph);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.top() == Some(Frame::Text) {
            if let Some(run) = self.run.as_mut() {
                run.text.push_str(text);
            }
        }
    }
}

/// Parse the main document part into its top-level body paragraphs.
pub fn parse_document_xml(xml: &str) -> Result<Vec<Paragraph>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut walker = BodyWalker::default();
    loop {
        match reader.read_event()? {
            Event::Start(e) => walker.open(&e)?,
            Event::Empty(e) => {
                walker.open(&e)?;
                walker.close();
            }
            Event::End(_) => walker.close(),
            Event::Text(t) => walker.text(&t.unescape()?),
            Event::CData(c) => walker.text(&String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(walker.paragraphs)
}

/// Read an attribute by local name.
fn attr(e: &BytesStart, local: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a?;
        if a.key.local_name().as_ref() == local {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Toggle properties are on unless `w:val` says otherwise.
fn is_off(e: &BytesStart) -> Result<bool> {
    Ok(matches!(
        attr(e, b"val")?.as_deref(),
        Some("0" | "false" | "off")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
 xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing"
 xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
 xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"
 xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>{}<w:sectPr/></w:body></w:document>"#,
            body
        )
    }

    #[test]
    fn test_paragraph_text_and_style() {
        let xml = wrap(
            r#"<w:p><w:pPr><w:jc w:val="center"/><w:rPr><w:b/></w:rPr></w:pPr>
<w:r><w:rPr><w:b/><w:sz w:val="32"/><w:rFonts w:ascii="Arial" w:eastAsia="黑体"/></w:rPr><w:t>我的</w:t></w:r>
<w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t xml:space="preserve">家乡 &amp; 故土</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs.len(), 1);

        let p = &paragraphs[0];
        assert_eq!(p.text(), "我的家乡 & 故土");
        assert_eq!(p.alignment, Alignment::Center);
        assert!(p.runs[0].style.bold);
        assert_eq!(p.runs[0].style.size_half_points, Some(32));
        assert_eq!(p.runs[0].style.east_asia_font.as_deref(), Some("黑体"));
        assert!(!p.runs[1].style.bold);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let xml = wrap(r#"<w:p/><w:p><w:r><w:t>正文</w:t></w:r></w:p><w:p></w:p>"#);
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs.len(), 3);
        assert!(paragraphs[0].is_empty());
        assert!(paragraphs[2].is_empty());
    }

    #[test]
    fn test_three_picture_shapes() {
        let xml = wrap(
            r#"<w:p><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId7"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>
<w:p><w:r><w:drawing><wp:anchor><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId8"><a:extLst/></a:blip></pic:blipFill></pic:pic></a:graphicData></a:graphic></wp:anchor></w:drawing></w:r></w:p>
<w:p><w:r><w:drawing><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId9"/></pic:blipFill></pic:pic></a:graphicData></a:graphic></w:drawing></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        let refs: Vec<_> = paragraphs.iter().flat_map(|p| p.image_refs()).collect();
        assert_eq!(
            refs,
            vec![
                &ImageRef::Inline {
                    relationship_id: "rId7".into()
                },
                &ImageRef::Anchor {
                    relationship_id: "rId8".into()
                },
                &ImageRef::Drawing {
                    relationship_id: "rId9".into()
                },
            ]
        );
        assert!(paragraphs.iter().all(Paragraph::is_image_only));
    }

    #[test]
    fn test_tables_and_text_boxes_are_not_body_paragraphs() {
        let xml = wrap(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
<w:p><w:r><w:t>外</w:t></w:r><w:r><w:drawing><wp:anchor><w:txbxContent><w:p><w:r><w:t>框内</w:t></w:r></w:p></w:txbxContent></wp:anchor></w:drawing></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "外");
    }

    #[test]
    fn test_hyperlink_runs_tabs_and_breaks() {
        let xml = wrap(
            r#"<w:p><w:hyperlink r:id="rId3"><w:r><w:t>链接</w:t></w:r></w:hyperlink><w:r><w:tab/><w:t>a</w:t><w:br/><w:t>b</w:t></w:r></w:p>"#,
        );
        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs[0].text(), "链接\ta\nb");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = parse_document_xml("<w:document><w:body><w:p></w:body>");
        assert!(result.is_err());
    }
}
