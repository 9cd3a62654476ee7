//! Failed folder: copies of failed originals, a zip of them and an error log.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::render::PackageWriter;

use super::events::FailureRecord;
use super::naming::PlacementOptions;

/// Writes the failed folder for a batch.
#[derive(Debug, Clone)]
pub struct FailureArchive {
    dir: PathBuf,
    options: PlacementOptions,
}

impl FailureArchive {
    /// Archive under `output_root` using the configured folder names.
    pub fn new(output_root: &Path, options: &PlacementOptions) -> Self {
        Self {
            dir: options.failed_folder(output_root),
            options: options.clone(),
        }
    }

    /// The failed folder.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the error log.
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.options.error_log)
    }

    /// Copy each failed original, zip them and write the error log.
    ///
    /// Nothing is created when `failures` is empty. Originals that vanished
    /// since they failed are only listed in the log.
    pub fn write(&self, failures: &[FailureRecord]) -> Result<()> {
        if failures.is_empty() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir)?;

        let mut bundle = PackageWriter::new();
        for failure in failures {
            let Some(name) = failure.path.file_name() else {
                continue;
            };
            let name = name.to_string_lossy();
            match fs::read(&failure.path) {
                Ok(data) => {
                    fs::write(self.dir.join(name.as_ref()), &data)?;
                    bundle.add_stored_part(&name, &data)?;
                }
                Err(e) => log::warn!("could not copy {}: {}", failure.path.display(), e),
            }
        }

        if !self.options.failed_archive.is_empty() {
            fs::write(self.dir.join(&self.options.failed_archive), bundle.finish()?)?;
        }

        let mut log = fs::File::create(self.log_path())?;
        writeln!(log, "# {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(log)?;
        for failure in failures {
            writeln!(log, "File: {}", failure.path.display())?;
            writeln!(log, "Error: {}", failure.message)?;
            writeln!(log)?;
        }

        log::info!(
            "{} failed files recorded in {}",
            failures.len(),
            self.dir.display()
        );
        Ok(())
    }
}
