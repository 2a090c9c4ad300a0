//! Walk file loading for offline replay.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{WalkError, WalkResult};

/// A persisted walk, read back in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkLog {
    source: Option<PathBuf>,
    steps: Vec<String>,
}

impl WalkLog {
    pub fn read(path: &Path) -> WalkResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WalkError::walk_log(path, e))?;
        let mut log = Self::parse(&content);
        log.source = Some(path.to_path_buf());
        debug!(path = %path.display(), steps = log.steps.len(), "walk file read");
        Ok(log)
    }

    /// One step per line. Trailing `\r`/`\n` are stripped and blank lines
    /// skipped; nothing else is normalized.
    pub fn parse(content: &str) -> Self {
        let steps = content
            .split('\n')
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            source: None,
            steps,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
