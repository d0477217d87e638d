/// Flat high-score log: one integer per line, append-only.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("high-score log {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Clone, Debug)]
pub struct HighScoreLog {
    path: PathBuf,
}

impl HighScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> HighScoreError {
        HighScoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Every line in file order, newline stripped. A missing log is empty.
    pub fn read_all(&self) -> Result<Vec<String>, HighScoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text
                .lines()
                .map(|l| l.trim_end_matches('\r').to_string())
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(self.io_err(e)),
        }
    }

    /// Append one score line, creating the file (and its directory) if needed.
    pub fn append(&self, score: u32) -> Result<(), HighScoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        writeln!(file, "{score}").map_err(|e| self.io_err(e))?;
        tracing::info!(score, path = %self.path.display(), "high score recorded");
        Ok(())
    }

    /// Highest parseable score; lines that are not numbers are skipped.
    pub fn best(&self) -> Result<Option<u32>, HighScoreError> {
        Ok(self
            .read_all()?
            .iter()
            .filter_map(|l| l.trim().parse::<u32>().ok())
            .max())
    }
}
