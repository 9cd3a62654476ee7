//! Folder batch tests.

mod common;

use std::path::Path;

use common::{list, png, DocxFixture, Shape};
use redocx::convert::NO_IMAGES_WARNING;
use redocx::{BatchProcessor, CancelFlag, FailureKind, FileEvent, Redocx, ReformatOptions};
use tempfile::TempDir;

fn with_pictures() -> DocxFixture {
    DocxFixture::new()
        .paragraph("我的家乡")
        .paragraph("8522101 张三")
        .paragraph("家乡的河水清又清。")
        .picture(Shape::Inline, png(16, 16))
        .picture(Shape::Anchor, png(16, 8))
}

fn without_pictures() -> DocxFixture {
    DocxFixture::new()
        .paragraph("秋天的校园")
        .paragraph("落叶铺满了小路。")
}

fn without_author() -> DocxFixture {
    DocxFixture::new()
        .paragraph("无名之作")
        .paragraph("没有任何署名的正文。")
}

/// One file of every outcome plus entries the batch must skip.
fn mixed_folder(dir: &Path) {
    with_pictures().write(dir, "852203101.docx");
    without_pictures().write(dir, "852203102李四.docx");
    without_author().write(dir, "852203103.docx");
    std::fs::write(dir.join("852203104王五.docx"), b"definitely not a zip").unwrap();
    with_pictures().write(dir, "~$852203101.docx");
    std::fs::write(dir.join("notes.txt"), "skip me").unwrap();
}

fn started(events: &[FileEvent]) -> Vec<String> {
    events
        .iter()
        .filter(|e| matches!(e, FileEvent::Started { .. }))
        .map(|e| e.path().file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_mixed_folder() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    mixed_folder(&input);

    let mut events: Vec<FileEvent> = Vec::new();
    let summary = Redocx::new()
        .process_folder_with_sink(&input, &output, &mut events)
        .unwrap();

    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.with_images, 1);
    assert_eq!(summary.without_images, 1);
    assert_eq!(summary.failed, 2);
    assert!(!summary.cancelled);
    assert!(summary.finished_at.is_some());

    assert_eq!(
        started(&events),
        vec![
            "852203101.docx",
            "852203102李四.docx",
            "852203103.docx",
            "852203104王五.docx"
        ]
    );

    assert_eq!(list(&output.join("success")).len(), 1);
    assert!(list(&output.join("success"))[0].starts_with("《张三》我的家乡——"));
    assert_eq!(list(&output.join("no-image-success")).len(), 1);
    assert!(list(&output.join("no-image-success"))[0].starts_with("《李四》秋天的校园——"));

    assert!(events.iter().any(|e| matches!(
        e,
        FileEvent::Warning { path, message }
            if path.ends_with("852203102李四.docx") && message == NO_IMAGES_WARNING
    )));

    let kinds: Vec<FailureKind> = summary.failures.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FailureKind::MissingFields, FailureKind::Corrupted]);
}

#[test]
fn test_failed_folder_contents() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    mixed_folder(&input);

    Redocx::new().process_folder(&input, &output).unwrap();

    let failed = output.join("failed");
    assert_eq!(
        list(&failed),
        vec![
            "852203103.docx",
            "852203104王五.docx",
            "error_log.txt",
            "failed_files.zip"
        ]
    );

    let log = std::fs::read_to_string(failed.join("error_log.txt")).unwrap();
    assert!(log.contains("852203103.docx"));
    assert!(log.contains("author name not extracted"));
    assert!(log.contains("file may be corrupted or not a valid document"));

    let copy = std::fs::read(failed.join("852203104王五.docx")).unwrap();
    assert_eq!(copy, b"definitely not a zip");

    let zip = std::fs::File::open(failed.join("failed_files.zip")).unwrap();
    let archive = zip::ZipArchive::new(zip).unwrap();
    assert_eq!(archive.len(), 2);
}

#[test]
fn test_failure_copies_can_be_disabled() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    without_author().write(&input, "852203103.docx");

    let summary = Redocx::new()
        .without_failure_copies()
        .process_folder(&input, &output)
        .unwrap();

    assert_eq!(summary.failed, 1);
    assert!(!output.join("failed").exists());
}

#[test]
fn test_all_successful_batch_has_no_failed_folder() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    without_pictures().write(&input, "852203102李四.docx");

    let summary = Redocx::new().process_folder(&input, &output).unwrap();

    assert_eq!(summary.succeeded, 1);
    assert!(!output.join("failed").exists());
    assert!(!output.join("success").exists());
}

#[test]
fn test_repeated_output_name_warns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    let output = dir.path().join("out");
    std::fs::create_dir(&input).unwrap();
    without_pictures().write(&input, "852203102李四.docx");
    without_pictures().write(&input, "852203109李四.docx");

    let mut events: Vec<FileEvent> = Vec::new();
    let summary = Redocx::new()
        .process_folder_with_sink(&input, &output, &mut events)
        .unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(list(&output.join("no-image-success")).len(), 1);
    assert!(events.iter().any(|e| matches!(
        e,
        FileEvent::Warning { path, message }
            if path.ends_with("852203109李四.docx") && message.starts_with("overwrote")
    )));
}

#[test]
fn test_rerun_gives_same_names() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    mixed_folder(&input);

    let first = Redocx::new()
        .without_failure_copies()
        .process_folder(&input, dir.path().join("a"))
        .unwrap();
    let second = Redocx::new()
        .without_failure_copies()
        .process_folder(&input, dir.path().join("b"))
        .unwrap();

    let names = |paths: &[std::path::PathBuf]| -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    };
    assert_eq!(names(&first.outputs), names(&second.outputs));
}

#[test]
fn test_cancelled_before_start() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    mixed_folder(&input);

    let flag = CancelFlag::new();
    flag.cancel();
    let processor = BatchProcessor::new(ReformatOptions::default())
        .unwrap()
        .with_cancel_flag(flag);

    let mut events: Vec<FileEvent> = Vec::new();
    let summary = processor
        .process_folder(&input, dir.path().join("out"), &mut events)
        .unwrap();

    assert!(summary.cancelled);
    assert!(events.is_empty());
    assert_eq!(summary.unprocessed(), 4);
}

#[test]
fn test_spawned_batch_streams_events() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    mixed_folder(&input);

    let handle = Redocx::new()
        .without_failure_copies()
        .spawn(&input, dir.path().join("out"))
        .unwrap();

    let events: Vec<FileEvent> = handle.events().iter().collect();
    let summary = handle.join().unwrap();

    assert_eq!(started(&events).len(), 4);
    let saved = events
        .iter()
        .filter(|e| matches!(e, FileEvent::Saved { .. }))
        .count();
    assert_eq!(saved, summary.succeeded);
    assert_eq!(summary.failed, 2);
}

#[test]
fn test_scratch_inside_input_folder_keeps_its_files() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    with_pictures().write(&input, "852203101.docx");
    std::fs::write(input.join("notes.txt"), "keep me").unwrap();

    let summary = Redocx::new()
        .with_scratch_dir(&input)
        .process_folder(&input, dir.path().join("out"))
        .unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.with_images, 1);
    assert_eq!(list(&input), vec!["852203101.docx", "notes.txt"]);
    assert_eq!(
        std::fs::read_to_string(input.join("notes.txt")).unwrap(),
        "keep me"
    );
}

#[test]
fn test_missing_input_folder() {
    let dir = TempDir::new().unwrap();
    let result = Redocx::new().process_folder(dir.path().join("nope"), dir.path().join("out"));
    assert!(matches!(result, Err(redocx::Error::NotFound(_))));
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_batch() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in");
    std::fs::create_dir(&input).unwrap();
    without_pictures().write(&input, "852203102李四.docx");

    let summary = BatchProcessor::new(ReformatOptions::default())
        .unwrap()
        .process_folder_async(input, dir.path().join("out"))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.without_images, 1);
}
