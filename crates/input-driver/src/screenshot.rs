//! Screenshot file naming and directory management.

use std::path::{Path, PathBuf};

use handmouse_common::clock::unix_timestamp_secs;
use handmouse_common::error::HandmouseResult;

use crate::InputBackend;

/// Chooses screenshot paths under a fixed directory.
///
/// The directory is created on first use only; later captures assume it
/// still exists.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
    dir_ready: bool,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dir_ready: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn dir_ready(&self) -> bool {
        self.dir_ready
    }

    /// File name for a capture at `unix_secs`, kept to the microsecond.
    pub fn file_name(unix_secs: f64) -> String {
        format!("screenshot_{unix_secs:.6}.png")
    }

    /// Path for a capture at `unix_secs`, creating the directory if this is
    /// the first capture.
    pub fn path_for(&mut self, unix_secs: f64) -> HandmouseResult<PathBuf> {
        if !self.dir_ready {
            std::fs::create_dir_all(&self.dir)?;
            tracing::info!(dir = %self.dir.display(), "Screenshot directory ready");
            self.dir_ready = true;
        }
        Ok(self.dir.join(Self::file_name(unix_secs)))
    }

    /// Capture the screen through `backend` and return the written path.
    pub fn capture(&mut self, backend: &mut dyn InputBackend) -> HandmouseResult<PathBuf> {
        let path = self.path_for(unix_timestamp_secs())?;
        backend.screenshot(&path)?;
        tracing::info!(path = %path.display(), "Screenshot saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputCall, RecordingBackend};
    use handmouse_platform_core::ScreenGeometry;

    #[test]
    fn distinct_timestamps_give_distinct_names() {
        let a = ScreenshotStore::file_name(1_700_000_000.000001);
        let b = ScreenshotStore::file_name(1_700_000_000.000002);
        assert_ne!(a, b);
        assert_eq!(a, "screenshot_1700000000.000001.png");
    }

    #[test]
    fn directory_is_created_once_on_first_capture() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Pictures").join("GestureScreenshots");
        let mut store = ScreenshotStore::new(&dir);
        assert!(!dir.exists());
        assert!(!store.dir_ready());

        let first = store.path_for(10.0).unwrap();
        assert!(dir.is_dir());
        assert!(store.dir_ready());
        assert_eq!(first.parent(), Some(dir.as_path()));

        // Later captures do not touch the filesystem again.
        std::fs::remove_dir(&dir).unwrap();
        let second = store.path_for(11.0).unwrap();
        assert!(!dir.exists());
        assert_ne!(first, second);
    }

    #[test]
    fn capture_delegates_to_backend() {
        let root = tempfile::tempdir().unwrap();
        let mut store = ScreenshotStore::new(root.path());
        let handle = RecordingBackend::new(ScreenGeometry::default());
        let mut backend = handle.clone();

        let path = store.capture(&mut backend).unwrap();
        assert_eq!(handle.calls(), vec![InputCall::Screenshot { path }]);
    }
}
