//! Destinations for generated pages and partials.

use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use tracing::trace;

use crate::{DocsError, Result};

/// Receives every generated file exactly once.
pub trait DocsSink {
    /// Stores `content` at `path`.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole generation run.
    fn write(&mut self, path: &Path, content: &str) -> Result<()>;
}

/// Writes files to disk, creating parent directories as needed.
#[derive(Debug, Default)]
pub struct FsSink;

impl DocsSink for FsSink {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| DocsError::io(err, parent))?;
        }
        fs::write(path, content).map_err(|err| DocsError::io(err, path))
    }
}

/// Keeps generated files in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, String>,
    order: Vec<PathBuf>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Content written to `path`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Paths in the order they were written.
    pub fn order(&self) -> &[PathBuf] {
        &self.order
    }

    /// All files keyed by path.
    pub fn files(&self) -> &BTreeMap<PathBuf, String> {
        &self.files
    }
}

impl DocsSink for MemorySink {
    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.order.push(path.to_path_buf());
        self.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

/// Forwards writes to a sink and refuses to write any path twice.
pub(crate) struct TrackedSink<'s> {
    sink: &'s mut dyn DocsSink,
    written: HashSet<PathBuf>,
}

impl<'s> TrackedSink<'s> {
    pub(crate) fn new(sink: &'s mut dyn DocsSink) -> Self {
        Self {
            sink,
            written: HashSet::new(),
        }
    }

    pub(crate) fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        if !self.written.insert(path.to_path_buf()) {
            return Err(DocsError::PathCollision {
                path: path.to_path_buf(),
            });
        }

        trace!(path = %path.display(), bytes = content.len(), "Writing");
        self.sink.write(path, content)
    }

    pub(crate) fn written(&self) -> usize {
        self.written.len()
    }
}
