//! Per-file events and batch summaries.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

use crate::error::{Error, FailureKind};

use super::naming::Placement;

/// Progress of one source file through a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FileEvent {
    /// Processing of a file has begun.
    Started {
        /// Source file
        path: PathBuf,
        /// Zero-based position in the batch
        index: usize,
        /// Number of files in the batch
        total: usize,
    },

    /// Something was skipped or looked off; the file still continues.
    Warning {
        /// Source file
        path: PathBuf,
        /// Description
        message: String,
    },

    /// The rebuilt document was written.
    Saved {
        /// Source file
        path: PathBuf,
        /// Written file
        output: PathBuf,
        /// Folder the output went to
        placement: Placement,
        /// Number of embedded pictures
        images: usize,
    },

    /// The file could not be reformatted.
    Failed {
        /// Source file
        path: PathBuf,
        /// Failure category
        kind: FailureKind,
        /// Description
        message: String,
    },
}

impl FileEvent {
    /// Build a failure event from an error.
    pub fn failed(path: impl Into<PathBuf>, error: &Error) -> Self {
        FileEvent::Failed {
            path: path.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    /// Source file the event refers to.
    pub fn path(&self) -> &Path {
        match self {
            FileEvent::Started { path, .. }
            | FileEvent::Warning { path, .. }
            | FileEvent::Saved { path, .. }
            | FileEvent::Failed { path, .. } => path,
        }
    }
}

/// Receives events as a batch progresses.
pub trait EventSink {
    /// Handle one event.
    fn emit(&mut self, event: FileEvent);
}

impl<F> EventSink for F
where
    F: FnMut(FileEvent),
{
    fn emit(&mut self, event: FileEvent) {
        self(event)
    }
}

impl EventSink for Vec<FileEvent> {
    fn emit(&mut self, event: FileEvent) {
        self.push(event);
    }
}

impl EventSink for Sender<FileEvent> {
    fn emit(&mut self, event: FileEvent) {
        // A dropped receiver only means nobody is listening any more.
        let _ = self.send(event);
    }
}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: FileEvent) {
        match event {
            FileEvent::Started { path, index, total } => {
                log::info!("[{}/{}] {}", index + 1, total, path.display())
            }
            FileEvent::Warning { path, message } => {
                log::warn!("{}: {}", path.display(), message)
            }
            FileEvent::Saved { output, images, .. } => {
                log::info!("saved {} ({} pictures)", output.display(), images)
            }
            FileEvent::Failed { path, message, .. } => {
                log::error!("{}: {}", path.display(), message)
            }
        }
    }
}

/// A failed source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Source file
    pub path: PathBuf,
    /// Failure category
    pub kind: FailureKind,
    /// Description
    pub message: String,
}

/// Counts and failures of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Candidate files found
    pub total: usize,
    /// Files saved
    pub succeeded: usize,
    /// Files saved with pictures
    pub with_images: usize,
    /// Files saved without pictures
    pub without_images: usize,
    /// Files that failed
    pub failed: usize,
    /// Warnings across all files
    pub warnings: usize,
    /// Written output files
    pub outputs: Vec<PathBuf>,
    /// Failed files with their errors
    pub failures: Vec<FailureRecord>,
    /// Whether the batch stopped early on request
    pub cancelled: bool,
    /// Start time
    pub started_at: DateTime<Local>,
    /// End time
    pub finished_at: Option<DateTime<Local>>,
}

impl BatchSummary {
    /// Start a summary for `total` files.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            with_images: 0,
            without_images: 0,
            failed: 0,
            warnings: 0,
            outputs: Vec::new(),
            failures: Vec::new(),
            cancelled: false,
            started_at: Local::now(),
            finished_at: None,
        }
    }

    /// Update counters from an event.
    pub fn record(&mut self, event: &FileEvent) {
        match event {
            FileEvent::Started { .. } => {}
            FileEvent::Warning { .. } => self.warnings += 1,
            FileEvent::Saved {
                output, placement, ..
            } => {
                self.succeeded += 1;
                match placement {
                    Placement::Success => self.with_images += 1,
                    Placement::NoImageSuccess => self.without_images += 1,
                }
                self.outputs.push(output.clone());
            }
            FileEvent::Failed {
                path,
                kind,
                message,
            } => {
                self.failed += 1;
                self.failures.push(FailureRecord {
                    path: path.clone(),
                    kind: *kind,
                    message: message.clone(),
                });
            }
        }
    }

    /// Mark the summary finished.
    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    /// Files neither saved nor failed.
    pub fn unprocessed(&self) -> usize {
        self.total.saturating_sub(self.succeeded + self.failed)
    }

    /// Run time in seconds, once finished.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MissingFields;

    #[test]
    fn test_summary_counts() {
        let mut summary = BatchSummary::new(3);
        let events = vec![
            FileEvent::Started {
                path: "a.docx".into(),
                index: 0,
                total: 3,
            },
            FileEvent::Saved {
                path: "a.docx".into(),
                output: "out/success/a.docx".into(),
                placement: Placement::Success,
                images: 2,
            },
            FileEvent::Warning {
                path: "b.docx".into(),
                message: "no images found".into(),
            },
            FileEvent::Saved {
                path: "b.docx".into(),
                output: "out/no-image-success/b.docx".into(),
                placement: Placement::NoImageSuccess,
                images: 0,
            },
            FileEvent::failed(
                "c.docx",
                &Error::MissingFields(MissingFields {
                    author: true,
                    title: true,
                }),
            ),
        ];
        for event in &events {
            summary.record(event);
        }
        summary.finish();

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.with_images, 1);
        assert_eq!(summary.without_images, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.unprocessed(), 0);
        assert_eq!(summary.failures[0].kind, FailureKind::MissingFields);
        assert_eq!(
            summary.failures[0].message,
            "author name not extracted; title not extracted"
        );
        assert!(summary.elapsed_secs().is_some());
    }

    #[test]
    fn test_sinks() {
        let mut collected = Vec::new();
        collected.emit(FileEvent::Warning {
            path: "a.docx".into(),
            message: "x".into(),
        });
        assert_eq!(collected.len(), 1);

        let mut count = 0;
        let mut counter = |_event: FileEvent| count += 1;
        counter.emit(collected[0].clone());
        assert_eq!(count, 1);

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut tx = tx;
        tx.emit(collected[0].clone());
        assert_eq!(rx.try_recv().unwrap(), collected[0]);
    }

    #[test]
    fn test_summary_serializes() {
        let mut summary = BatchSummary::new(0);
        summary.finish();
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"total\":0"));
        assert!(json.contains("started_at"));
    }
}
