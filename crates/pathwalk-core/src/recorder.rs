//! Walk recording: the ordered list of steps taken in a live session and its
//! one-shot persistence as a `.wlk` file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{WalkError, WalkResult};

/// Walk file extension.
pub const WALK_FILE_EXTENSION: &str = "wlk";

/// `walk-<unix seconds>.wlk`
pub fn walk_file_name(timestamp: i64) -> String {
    format!("walk-{timestamp}.{WALK_FILE_EXTENSION}")
}

/// Append-only walk, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkRecorder {
    steps: Vec<String>,
}

impl WalkRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Persist under `dir`, named after the current time.
    pub fn persist(&self, dir: &Path) -> WalkResult<PathBuf> {
        self.persist_at(dir, chrono::Utc::now().timestamp())
    }

    /// Persist under `dir` with an explicit timestamp. Never overwrites: an
    /// existing file yields [`WalkError::ArtifactExists`] and stays untouched.
    ///
    /// Steps are written to a temporary file in `dir` first and linked into
    /// place only once complete, so a failed write leaves no walk file behind.
    pub fn persist_at(&self, dir: &Path, timestamp: i64) -> WalkResult<PathBuf> {
        let path = dir.join(walk_file_name(timestamp));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| WalkError::walk_log(&path, e))?;
        let mut content = String::new();
        for step in &self.steps {
            content.push_str(step);
            content.push('\n');
        }
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| WalkError::walk_log(&path, e))?;

        match tmp.persist_noclobber(&path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                return Err(WalkError::ArtifactExists { path });
            }
            Err(e) => return Err(WalkError::walk_log(path, e.error)),
        }

        info!(path = %path.display(), steps = self.steps.len(), "walk saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_file_name() {
        assert_eq!(walk_file_name(1_700_000_000), "walk-1700000000.wlk");
    }

    #[test]
    fn test_persist_keeps_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = WalkRecorder::new();
        for step in ["e_main", "v_wikipedia_main", "e_main", "v_wikipedia_main"] {
            rec.record(step);
        }

        let path = rec.persist_at(dir.path(), 42).unwrap();
        assert_eq!(path, dir.path().join("walk-42.wlk"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "e_main\nv_wikipedia_main\ne_main\nv_wikipedia_main\n"
        );
    }

    #[test]
    fn test_persist_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join(walk_file_name(7));
        std::fs::write(&existing, "v_start\n").unwrap();

        let mut rec = WalkRecorder::new();
        rec.record("e_main");
        match rec.persist_at(dir.path(), 7) {
            Err(WalkError::ArtifactExists { path }) => assert_eq!(path, existing),
            other => panic!("expected ArtifactExists, got {other:?}"),
        }
        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "v_start\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_persist_leaves_only_the_walk_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut rec = WalkRecorder::new();
        rec.record("v_start");

        let path = rec.persist_at(dir.path(), 11).unwrap();

        let names: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(names, [path]);
    }

    #[test]
    fn test_persist_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let rec = WalkRecorder::new();
        let err = rec.persist_at(&dir.path().join("nope"), 1).unwrap_err();
        assert!(matches!(err, WalkError::WalkLog { .. }));
    }

    #[test]
    fn test_persist_empty_walk() {
        let dir = tempfile::tempdir().unwrap();
        let path = WalkRecorder::new().persist_at(dir.path(), 3).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
    }
}
