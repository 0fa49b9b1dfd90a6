//! Where generated artifacts end up.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use colored::Colorize;
use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Persists one named artifact. `write` takes `&self` so a parallel-capable
/// sink can be shared across worker threads.
pub trait OutputSink: Sync {
    fn write(&self, name: &str, content: &str) -> Result<()>;

    fn supports_parallel_writes(&self) -> bool {
        false
    }
}

/// One file per artifact under `dir`. The directory (and its parents) is
/// created on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for DirectorySink {
    fn write(&self, name: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        let path = self.dir.join(name);
        fs::write(&path, content).map_err(|e| Error::io(path, e))
    }

    fn supports_parallel_writes(&self) -> bool {
        true
    }
}

/// Prints every artifact under a `-- <name>` header.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&self, name: &str, content: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", format!("-- {name}").bold().green())
            .and_then(|_| writeln!(out, "{content}\n"))
            .map_err(|e| Error::io("<stdout>", e))
    }
}

/// Keeps artifacts in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<IndexMap<String, String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn into_inner(self) -> IndexMap<String, String> {
        self.artifacts
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, IndexMap<String, String>> {
        // a panicking writer cannot leave the map half-updated
        self.artifacts.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OutputSink for MemorySink {
    fn write(&self, name: &str, content: &str) -> Result<()> {
        self.lock().insert(name.to_string(), content.to_string());
        Ok(())
    }
}

impl<T: OutputSink + ?Sized> OutputSink for Box<T> {
    fn write(&self, name: &str, content: &str) -> Result<()> {
        (**self).write(name, content)
    }

    fn supports_parallel_writes(&self) -> bool {
        (**self).supports_parallel_writes()
    }
}

impl<T: OutputSink + ?Sized> OutputSink for &T {
    fn write(&self, name: &str, content: &str) -> Result<()> {
        (**self).write(name, content)
    }

    fn supports_parallel_writes(&self) -> bool {
        (**self).supports_parallel_writes()
    }
}

// ------------------------------- Tests ------------------------------------ //
