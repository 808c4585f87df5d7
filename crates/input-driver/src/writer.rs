//! Append-only action log writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_hand_model::{ActionLogHeader, ActionRecord};

/// Writes applied actions to a JSONL file in append-only mode.
pub struct ActionLogWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    actions_written: u64,
}

impl ActionLogWriter {
    /// Create a new log, writing the header as the first line.
    pub fn new(path: PathBuf, header: ActionLogHeader) -> HandmouseResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        let mut writer = BufWriter::new(file);

        // Header is a comment line so replay parsers skip it
        let header_json = serde_json::to_string(&header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| HandmouseError::input(format!("Failed to write log header: {e}")))?;

        Ok(Self {
            writer,
            path,
            actions_written: 0,
        })
    }

    /// Write one action as a JSONL line.
    pub fn write_action(&mut self, record: &ActionRecord) -> HandmouseResult<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| HandmouseError::input(format!("Failed to write action: {e}")))?;
        self.actions_written += 1;

        if self.actions_written % 100 == 0 {
            self.flush()?;
        }

        Ok(())
    }

    /// Flush buffered writes to disk.
    pub fn flush(&mut self) -> HandmouseResult<()> {
        self.writer
            .flush()
            .map_err(|e| HandmouseError::input(format!("Failed to flush action log: {e}")))
    }

    pub fn actions_written(&self) -> u64 {
        self.actions_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ActionLogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
