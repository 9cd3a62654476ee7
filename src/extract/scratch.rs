//! Scratch storage for pictures between extraction and rebuild.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

/// Per-run scratch directory.
///
/// Pictures go into a fresh `redocx-*` folder owned by this guard and removed
/// when it drops. With an explicit location that folder is created inside it;
/// nothing else in the explicit location is touched. An explicit location the
/// guard had to create is removed again if it is empty at the end.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    temp: Option<TempDir>,
    root: Option<PathBuf>,
    created_root: bool,
}

impl ScratchDir {
    /// Create a fresh temporary directory.
    pub fn temporary() -> Result<Self> {
        let temp = tempfile::Builder::new().prefix("redocx-").tempdir()?;
        Ok(Self {
            path: temp.path().to_path_buf(),
            temp: Some(temp),
            root: None,
            created_root: false,
        })
    }

    /// Create a fresh run folder inside `root`.
    pub fn at<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let created_root = !root.exists();
        if created_root {
            fs::create_dir_all(root)?;
        }

        let temp = tempfile::Builder::new().prefix("redocx-").tempdir_in(root)?;
        log::debug!("scratch directory {}", temp.path().display());
        Ok(Self {
            path: temp.path().to_path_buf(),
            temp: Some(temp),
            root: Some(root.to_path_buf()),
            created_root,
        })
    }

    /// Run folder inside `explicit` when given, temporary directory otherwise.
    pub fn new(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(root) => Self::at(root),
            None => Self::temporary(),
        }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The explicit location the run folder was created in, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Whether the run folder lives in the system temporary location.
    pub fn is_temporary(&self) -> bool {
        self.root.is_none()
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(temp) = self.temp.take() {
            if let Err(e) = temp.close() {
                log::debug!("could not remove scratch directory {}: {}", self.path.display(), e);
            }
        }
        // remove_dir only succeeds on an empty folder.
        if let (true, Some(root)) = (self.created_root, self.root.as_deref()) {
            if let Err(e) = fs::remove_dir(root) {
                log::debug!("keeping scratch root {}: {}", root.display(), e);
            }
        }
    }
}

/// Picture files written for one source document.
///
/// Every file is deleted when the guard drops, whether or not the rebuilt
/// document was saved.
#[derive(Debug, Default)]
pub struct ScratchImages {
    paths: Vec<PathBuf>,
}

impl ScratchImages {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a written file.
    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Paths in discovery order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if no file was written.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Delete all files now.
    pub fn cleanup(mut self) {
        self.remove_all();
    }

    fn remove_all(&mut self) {
        for path in self.paths.drain(..) {
            if let Err(e) = fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("could not remove scratch file {}: {}", path.display(), e);
                }
            }
        }
    }
}

impl Drop for ScratchImages {
    fn drop(&mut self) {
        self.remove_all();
    }
}
