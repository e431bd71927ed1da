//! Sequential line reader with position tracking.

use crate::utils::error::ParseError;
use std::io::BufRead;

/// Wraps the input stream and hands out one logical line at a time.
///
/// Keeps the 0-based index of the line it returned last so error reporting
/// can point at the exact offending record. The cursor borrows the reader
/// and never closes it.
pub(crate) struct LineCursor<R> {
    reader: R,
    /// Index of the most recently returned line; `None` before the first read
    index: Option<usize>,
}

impl<R: BufRead> LineCursor<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            index: None,
        }
    }

    /// Read the next line, without its trailing newline.
    /// Returns `Ok(None)` at end of input.
    pub(crate) fn next_line(&mut self) -> Result<Option<String>, ParseError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.index = Some(self.index.map_or(0, |i| i + 1));
        Ok(Some(line))
    }

    /// 0-based index of the last line returned by `next_line`
    pub(crate) fn index(&self) -> usize {
        self.index.unwrap_or(0)
    }

    /// Index one past the last returned line; where the next record would
    /// have started, used when the input ends too early.
    pub(crate) fn eof_index(&self) -> usize {
        self.index.map_or(0, |i| i + 1)
    }
}
