use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{ObserveError, Result};

/// How a missing line is shown in expectation failures.
pub const EMPTY_LINE: &str = "<empty>";

/// Non-blocking, line-at-a-time reader over a file another process appends to.
///
/// The read position lives in the file handle. A line is only handed out
/// once its newline has been written; a partial trailing line is held back
/// until it is complete.
pub struct LogTail {
    reader: BufReader<File>,
    pending: Vec<u8>,
    last_line: Option<String>,
    label: String,
    path: PathBuf,
}

impl LogTail {
    /// Open `path` for tailing from its current beginning.
    ///
    /// `label` names the producing process in expectation failures.
    pub fn open(path: impl AsRef<Path>, label: impl Into<String>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.read(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.custom_flags(libc::O_NONBLOCK);
        }
        let file = options.open(&path)?;

        Ok(Self {
            reader: BufReader::new(file),
            pending: Vec::new(),
            last_line: None,
            label: label.into(),
            path,
        })
    }

    /// Read the next complete line, or record that there is none yet.
    ///
    /// Never blocks. The trailing newline is stripped.
    pub fn advance(&mut self) -> Result<Option<&str>> {
        self.last_line = self.next_line()?;
        trace!(process = %self.label, line = ?self.last_line, "log advanced");
        Ok(self.last_line.as_deref())
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            match self.reader.read_until(b'\n', &mut self.pending) {
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => break,
                Err(err) => return Err(err.into()),
            }
        }

        if self.pending.last() != Some(&b'\n') {
            return Ok(None);
        }
        self.pending.pop();
        let line = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        Ok(Some(line))
    }

    /// The line read by the last [`advance`](Self::advance), `None` if it
    /// found nothing.
    pub fn last_line(&self) -> Option<&str> {
        self.last_line.as_deref()
    }

    /// Advance and compare to `line`.
    pub fn expect_line(&mut self, line: &str) -> Result<bool> {
        Ok(self.advance()? == Some(line))
    }

    /// Advance and check that no new line was there.
    pub fn expect_none(&mut self) -> Result<bool> {
        Ok(self.advance()?.is_none())
    }

    /// Like [`expect_line`](Self::expect_line), but a mismatch is an error.
    pub fn expect_line_or_fail(&mut self, line: &str) -> Result<()> {
        if self.expect_line(line)? {
            return Ok(());
        }
        Err(self.unexpected(line.to_string()))
    }

    /// Like [`expect_none`](Self::expect_none), but trailing output is an
    /// error. `details` describes what was just done, for the message.
    pub fn expect_none_or_fail(&mut self, details: &str) -> Result<()> {
        if self.expect_none()? {
            return Ok(());
        }
        let expected = if details.is_empty() {
            "no further output".to_string()
        } else {
            format!("no further output {details}")
        };
        Err(self.unexpected(expected))
    }

    fn unexpected(&self, expected: String) -> ObserveError {
        ObserveError::UnexpectedLogLine {
            process: self.label.clone(),
            expected,
            actual: self.last_line().unwrap_or(EMPTY_LINE).to_string(),
        }
    }

    /// Discard every complete line currently available.
    ///
    /// Returns how many lines were dropped.
    pub fn drain(&mut self) -> Result<usize> {
        let mut dropped = 0usize;
        while self.advance()?.is_some() {
            dropped += 1;
        }
        Ok(dropped)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for LogTail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogTail")
            .field("label", &self.label)
            .field("path", &self.path)
            .field("last_line", &self.last_line)
            .finish()
    }
}
