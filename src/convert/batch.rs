//! Folder-level batch driver.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};

use crate::detect::{is_candidate, SkipReason};
use crate::error::{Error, Result};
use crate::extract::{sort_key, ScratchDir};

use super::events::{BatchSummary, EventSink, FileEvent};
use super::failures::FailureArchive;
use super::options::ReformatOptions;
use super::Reformatter;

/// Shared stop request, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the batch to stop before the next file.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Processes every candidate file of a folder, one at a time.
#[derive(Clone)]
pub struct BatchProcessor {
    reformatter: Reformatter,
    cancel: CancelFlag,
}

impl BatchProcessor {
    /// Create a batch processor from options.
    pub fn new(options: ReformatOptions) -> Result<Self> {
        Ok(Self::from_reformatter(Reformatter::new(options)?))
    }

    /// Wrap an existing pipeline.
    pub fn from_reformatter(reformatter: Reformatter) -> Self {
        Self {
            reformatter,
            cancel: CancelFlag::new(),
        }
    }

    /// Share a cancel flag with the caller.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = flag;
        self
    }

    /// The flag this processor checks between files.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// The underlying pipeline.
    pub fn reformatter(&self) -> &Reformatter {
        &self.reformatter
    }

    /// Top-level `.docx` files of `dir`, in processing order.
    ///
    /// Lock files and other entries are skipped.
    pub fn candidates<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut files = Vec::new();

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            match is_candidate(&path) {
                Ok(()) => files.push(path),
                Err(SkipReason::LockFile) => log::debug!("skipping lock file {}", path.display()),
                Err(reason) => log::debug!("skipping {} ({:?})", path.display(), reason),
            }
        }

        files.sort_by_cached_key(|path| {
            sort_key(&path.file_name().unwrap_or_default().to_string_lossy())
        });
        Ok(files)
    }

    /// Process every candidate of `input_dir` into `output_dir`.
    ///
    /// Per-file problems become events; only an unreadable input folder or
    /// an output or scratch folder that cannot be created is an error.
    pub fn process_folder<P, Q>(
        &self,
        input_dir: P,
        output_dir: Q,
        sink: &mut dyn EventSink,
    ) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let input_dir = input_dir.as_ref();
        let output_dir = output_dir.as_ref();
        let options = self.reformatter.options();

        if !input_dir.is_dir() {
            return Err(Error::NotFound(input_dir.to_path_buf()));
        }
        let files = Self::candidates(input_dir)?;
        fs::create_dir_all(output_dir)?;
        let scratch = ScratchDir::new(options.scratch_dir.as_deref())?;

        log::info!(
            "processing {} files from {} into {}",
            files.len(),
            input_dir.display(),
            output_dir.display()
        );

        let mut summary = BatchSummary::new(files.len());
        let mut written: HashSet<PathBuf> = HashSet::new();
        let mut emit = |summary: &mut BatchSummary, event: FileEvent| {
            summary.record(&event);
            sink.emit(event);
        };

        for (index, path) in files.iter().enumerate() {
            if self.cancel.is_cancelled() {
                log::info!("batch cancelled after {} of {} files", index, files.len());
                summary.cancelled = true;
                break;
            }

            emit(
                &mut summary,
                FileEvent::Started {
                    path: path.clone(),
                    index,
                    total: files.len(),
                },
            );

            match self
                .reformatter
                .process_file(path, output_dir, scratch.path())
            {
                Ok(report) => {
                    let mut warnings = report.warnings;
                    if !written.insert(report.output.clone()) {
                        warnings.push(format!(
                            "overwrote {} written earlier in this run",
                            report.output.display()
                        ));
                    }
                    for message in warnings {
                        emit(
                            &mut summary,
                            FileEvent::Warning {
                                path: path.clone(),
                                message,
                            },
                        );
                    }
                    emit(
                        &mut summary,
                        FileEvent::Saved {
                            path: path.clone(),
                            output: report.output,
                            placement: report.placement,
                            images: report.image_count,
                        },
                    );
                }
                Err(e) => emit(&mut summary, FileEvent::failed(path.clone(), &e)),
            }
        }

        if options.collect_failures {
            let archive = FailureArchive::new(output_dir, &options.placement);
            if let Err(e) = archive.write(&summary.failures) {
                log::warn!("could not write failed folder: {}", e);
            }
        }

        drop(scratch);
        summary.finish();
        Ok(summary)
    }

    /// Run a batch on a background thread, streaming events over a channel.
    pub fn spawn<P, Q>(self, input_dir: P, output_dir: Q) -> BatchHandle
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        let (tx, rx) = unbounded();
        let cancel = self.cancel.clone();
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();

        let handle = thread::spawn(move || {
            let mut tx = tx;
            self.process_folder(&input_dir, &output_dir, &mut tx)
        });

        BatchHandle {
            events: rx,
            cancel,
            handle,
        }
    }

    /// Run a batch on tokio's blocking pool.
    #[cfg(feature = "async")]
    pub async fn process_folder_async<P, Q>(self, input_dir: P, output_dir: Q) -> Result<BatchSummary>
    where
        P: Into<PathBuf>,
        Q: Into<PathBuf>,
    {
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();
        tokio::task::spawn_blocking(move || {
            self.process_folder(&input_dir, &output_dir, &mut super::events::LogSink)
        })
        .await
        .map_err(|e| {
            if e.is_cancelled() {
                Error::Cancelled
            } else {
                Error::Other(format!("batch task failed: {}", e))
            }
        })?
    }
}

/// A batch running on its own thread.
pub struct BatchHandle {
    events: Receiver<FileEvent>,
    cancel: CancelFlag,
    handle: JoinHandle<Result<BatchSummary>>,
}

impl BatchHandle {
    /// Events as they happen; the channel closes when the batch ends.
    pub fn events(&self) -> &Receiver<FileEvent> {
        &self.events
    }

    /// Stop before the next file.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the worker thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the batch to end.
    pub fn join(self) -> Result<BatchSummary> {
        self.handle
            .join()
            .map_err(|_| Error::Other("batch worker panicked".into()))?
    }
}
