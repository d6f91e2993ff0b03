use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::error::{FetchFailure, FetchFailureKind};

pub fn query_file_name(dataset: &str) -> String {
    format!("{dataset}.tsv")
}

pub fn judgment_file_name(dataset: &str) -> String {
    format!("{dataset}_result.tsv")
}

pub trait TextSource {
    fn fetch_text(&self, name: &str) -> Result<String, FetchFailure>;
}

#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    name_pattern: Regex,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let name_pattern = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$")
            .context("failed to compile data file name regex")?;
        Ok(Self {
            root: root.into(),
            name_pattern,
        })
    }
}

impl TextSource for DirectorySource {
    fn fetch_text(&self, name: &str) -> Result<String, FetchFailure> {
        if !self.name_pattern.is_match(name) || name.contains("..") {
            return Err(FetchFailure {
                name: name.to_string(),
                kind: FetchFailureKind::InvalidName,
                reason: "names may only contain letters, digits, '_', '-' and '.'".to_string(),
            });
        }

        let path = self.root.join(name);
        debug!(path = %path.display(), "reading data file");
        let bytes = fs::read(&path).map_err(|err| FetchFailure {
            name: name.to_string(),
            kind: match err.kind() {
                io::ErrorKind::NotFound => FetchFailureKind::NotFound,
                io::ErrorKind::PermissionDenied => FetchFailureKind::PermissionDenied,
                _ => FetchFailureKind::Io,
            },
            reason: format!("{}: {err}", path.display()),
        })?;

        // Invalid UTF-8 is replaced, so one bad row cannot sink the whole file.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
    fetches: Cell<usize>,
}

impl MemorySource {
    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.files.insert(name.to_string(), text.to_string());
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }
}

impl TextSource for MemorySource {
    fn fetch_text(&self, name: &str) -> Result<String, FetchFailure> {
        self.fetches.set(self.fetches.get() + 1);
        self.files.get(name).cloned().ok_or_else(|| FetchFailure {
            name: name.to_string(),
            kind: FetchFailureKind::NotFound,
            reason: format!("no in-memory file named {name}"),
        })
    }
}
