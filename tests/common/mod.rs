//! In-memory `.docx` fixtures for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Picture wrapper shape inside `w:drawing`.
#[derive(Clone, Copy)]
pub enum Shape {
    Inline,
    Anchor,
    Bare,
}

/// Builder for a minimal Word package.
#[derive(Default)]
pub struct DocxFixture {
    body: Vec<String>,
    rels: Vec<(String, String)>,
    media: Vec<(String, Vec<u8>)>,
}

impl DocxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push(format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape(text)
        ));
        self
    }

    pub fn empty_paragraph(mut self) -> Self {
        self.body.push("<w:p/>".to_string());
        self
    }

    /// A paragraph holding only a picture.
    pub fn picture(self, shape: Shape, data: Vec<u8>) -> Self {
        self.picture_with_text("", shape, data)
    }

    /// A paragraph with text followed by a picture run.
    pub fn picture_with_text(mut self, text: &str, shape: Shape, data: Vec<u8>) -> Self {
        let id = self.add_media(data);
        let blip = format!(
            r#"<a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="{}"/></pic:blipFill></pic:pic></a:graphicData></a:graphic>"#,
            id
        );
        let drawing = match shape {
            Shape::Inline => format!("<wp:inline>{}</wp:inline>", blip),
            Shape::Anchor => format!(r#"<wp:anchor behindDoc="0">{}</wp:anchor>"#, blip),
            Shape::Bare => blip,
        };
        let text_run = if text.is_empty() {
            String::new()
        } else {
            format!("<w:r><w:t>{}</w:t></w:r>", escape(text))
        };
        self.body.push(format!(
            "<w:p>{}<w:r><w:drawing>{}</w:drawing></w:r></w:p>",
            text_run, drawing
        ));
        self
    }

    /// A picture part with a relationship but no reference from the body.
    pub fn unbound_picture(mut self, data: Vec<u8>) -> Self {
        self.add_media(data);
        self
    }

    fn add_media(&mut self, data: Vec<u8>) -> String {
        let n = self.media.len() + 1;
        let id = format!("rId{}", n + 10);
        let target = format!("media/image{}.png", n);
        self.rels.push((id.clone(), target.clone()));
        self.media.push((format!("word/{}", target), data));
        id
    }

    pub fn document_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>{}<w:sectPr/></w:body></w:document>"#,
            self.body.concat()
        )
    }

    fn rels_xml(&self) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, target) in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id, IMAGE_REL, target
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="png" ContentType="image/png"/></Types>"#,
        )
        .unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(self.document_xml().as_bytes()).unwrap();
        zip.start_file("word/_rels/document.xml.rels", options).unwrap();
        zip.write_all(self.rels_xml().as_bytes()).unwrap();
        for (name, data) in &self.media {
            zip.start_file(name.as_str(), options).unwrap();
            zip.write_all(data).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.bytes()).unwrap();
        path
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Encode a solid PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::from_pixel(width, height, image::Rgb([20, 120, 200]))
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Read one part of a written package as text.
pub fn read_part(path: &Path, name: &str) -> String {
    let data = std::fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    let mut text = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    text
}

/// Names of the package entries under `word/media/`.
pub fn media_entries(path: &Path) -> Vec<String> {
    let data = std::fs::read(path).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("word/media/"))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

/// File names in a folder, sorted; empty when the folder is missing.
pub fn list(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
