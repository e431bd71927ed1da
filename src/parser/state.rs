//! Line-level state machine driving one pass over a massif file.
//!
//! Each state is bound to one required line prefix; any line that does not
//! match the prefix expected for the current state kills the whole parse.
//! The machine owns the trace being built; `parser::parse` runs it and then
//! selects the peak snapshot.

use super::heap_tree::HeapTreeDecoder;
use super::label::PatternSet;
use super::lines::LineCursor;
use super::merge::merge_below_threshold;
use crate::trace::model::{Snapshot, Trace};
use crate::utils::config::{
    CMD_PREFIX, DESC_PREFIX, HEAP_TREE_PREFIX, MEM_HEAP_EXTRA_PREFIX, MEM_HEAP_PREFIX,
    MEM_STACKS_PREFIX, SNAPSHOT_PREFIX, SNAPSHOT_SEPARATOR, TIME_PREFIX, TIME_UNIT_PREFIX,
};
use crate::utils::error::ParseError;
use log::{debug, warn};
use std::io::BufRead;

/// What the next input line must contain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    FileDesc,
    FileCmd,
    FileTimeUnit,
    SnapshotHeader,
    SnapshotTime,
    SnapshotMemHeap,
    SnapshotMemHeapExtra,
    SnapshotMemStacks,
    SnapshotHeapTree,
}

pub(crate) struct TraceParser<'p, R> {
    cursor: LineCursor<R>,
    patterns: &'p PatternSet,
    state: ParseState,
    trace: Trace,
}

impl<'p, R: BufRead> TraceParser<'p, R> {
    pub(crate) fn new(reader: R, patterns: &'p PatternSet) -> Self {
        Self {
            cursor: LineCursor::new(reader),
            patterns,
            state: ParseState::FileDesc,
            trace: Trace::default(),
        }
    }

    /// Consume the whole stream and return the built trace.
    ///
    /// End of input is only legal exactly where the next snapshot header
    /// would begin; anywhere else a required section is missing.
    pub(crate) fn run(mut self) -> Result<Trace, ParseError> {
        loop {
            let Some(line) = self.cursor.next_line()? else {
                if self.state == ParseState::SnapshotHeader {
                    debug!("parsed {} snapshots", self.trace.snapshots().len());
                    return Ok(self.trace);
                }
                return Err(ParseError::UnexpectedEof {
                    line: self.cursor.eof_index(),
                });
            };

            let handled = match self.state {
                ParseState::FileDesc => self.file_desc(&line),
                ParseState::FileCmd => self.file_cmd(&line),
                ParseState::FileTimeUnit => self.file_time_unit(&line),
                ParseState::SnapshotHeader => self.snapshot_header(&line),
                ParseState::SnapshotTime => self.snapshot_time(&line),
                ParseState::SnapshotMemHeap => self.snapshot_mem_heap(&line),
                ParseState::SnapshotMemHeapExtra => self.snapshot_mem_heap_extra(&line),
                ParseState::SnapshotMemStacks => self.snapshot_mem_stacks(&line),
                ParseState::SnapshotHeapTree => self.snapshot_heap_tree(&line),
            };
            if let Err(error) = handled {
                if let Some(index) = error.line() {
                    warn!("invalid line {}: {:?}", index, error.line_text().unwrap_or(""));
                }
                return Err(error);
            }
        }
    }

    fn file_desc(&mut self, line: &str) -> Result<(), ParseError> {
        let value = self.field(line, DESC_PREFIX)?;
        self.trace.set_description(value.to_string());
        self.state = ParseState::FileCmd;
        Ok(())
    }

    fn file_cmd(&mut self, line: &str) -> Result<(), ParseError> {
        let value = self.field(line, CMD_PREFIX)?;
        self.trace.set_command(value.to_string());
        self.state = ParseState::FileTimeUnit;
        Ok(())
    }

    fn file_time_unit(&mut self, line: &str) -> Result<(), ParseError> {
        let value = self.field(line, TIME_UNIT_PREFIX)?;
        self.trace.set_time_unit(value.to_string());
        self.state = ParseState::SnapshotHeader;
        Ok(())
    }

    /// Consume the three-line header: separator, `snapshot=<N>`, separator
    fn snapshot_header(&mut self, line: &str) -> Result<(), ParseError> {
        if line != SNAPSHOT_SEPARATOR {
            return Err(self.bad_record(line));
        }

        let number_line = self.required_line()?;
        let number_str = self.field(&number_line, SNAPSHOT_PREFIX)?;
        let number: u32 = number_str
            .parse()
            .map_err(|_| self.bad_number(&number_line))?;

        let closing = self.required_line()?;
        if closing != SNAPSHOT_SEPARATOR {
            return Err(self.bad_record(&closing));
        }

        self.trace.push_snapshot(Snapshot::new(number));
        self.state = ParseState::SnapshotTime;
        Ok(())
    }

    fn snapshot_time(&mut self, line: &str) -> Result<(), ParseError> {
        let value = self.field(line, TIME_PREFIX)?;
        let time: f64 = value.parse().map_err(|_| self.bad_number(line))?;
        if let Some(snapshot) = self.trace.current_snapshot_mut() {
            snapshot.time = time;
        }
        self.state = ParseState::SnapshotMemHeap;
        Ok(())
    }

    fn snapshot_mem_heap(&mut self, line: &str) -> Result<(), ParseError> {
        let bytes = self.byte_field(line, MEM_HEAP_PREFIX)?;
        if let Some(snapshot) = self.trace.current_snapshot_mut() {
            snapshot.mem_heap = bytes;
        }
        self.state = ParseState::SnapshotMemHeapExtra;
        Ok(())
    }

    fn snapshot_mem_heap_extra(&mut self, line: &str) -> Result<(), ParseError> {
        let bytes = self.byte_field(line, MEM_HEAP_EXTRA_PREFIX)?;
        if let Some(snapshot) = self.trace.current_snapshot_mut() {
            snapshot.mem_heap_extra = bytes;
        }
        self.state = ParseState::SnapshotMemStacks;
        Ok(())
    }

    fn snapshot_mem_stacks(&mut self, line: &str) -> Result<(), ParseError> {
        let bytes = self.byte_field(line, MEM_STACKS_PREFIX)?;
        if let Some(snapshot) = self.trace.current_snapshot_mut() {
            snapshot.mem_stacks = bytes;
        }
        self.state = ParseState::SnapshotHeapTree;
        Ok(())
    }

    fn snapshot_heap_tree(&mut self, line: &str) -> Result<(), ParseError> {
        let value = self.field(line, HEAP_TREE_PREFIX)?;
        match value {
            "empty" => {}
            "detailed" => self.decode_heap_tree()?,
            "peak" => {
                // Explicitly declared peak; confirmed against the decoded
                // tree once the whole stream is read.
                self.trace
                    .set_peak_index(self.trace.snapshots().len().checked_sub(1));
                self.decode_heap_tree()?;
            }
            _ => return Err(self.bad_record(line)),
        }
        self.state = ParseState::SnapshotHeader;
        Ok(())
    }

    /// Decode exactly one tree block into the current snapshot
    fn decode_heap_tree(&mut self) -> Result<(), ParseError> {
        let Some(first) = self.cursor.next_line()? else {
            // dump ended right before the tree; keep the snapshot without one
            return Ok(());
        };

        let decoded = HeapTreeDecoder::new(&mut self.cursor, self.patterns).decode(&first)?;
        if let Some(mut tree) = decoded.tree {
            if decoded.had_custom_allocators {
                merge_below_threshold(&mut tree, self.patterns);
            }
            if let Some(snapshot) = self.trace.current_snapshot_mut() {
                snapshot.heap_tree = Some(tree);
            }
        }
        Ok(())
    }

    /// Read a line that must exist (mid-header)
    fn required_line(&mut self) -> Result<String, ParseError> {
        self.cursor.next_line()?.ok_or(ParseError::UnexpectedEof {
            line: self.cursor.eof_index(),
        })
    }

    /// Strip the prefix required by the current state
    fn field<'l>(&self, line: &'l str, prefix: &str) -> Result<&'l str, ParseError> {
        line.strip_prefix(prefix).ok_or_else(|| self.bad_record(line))
    }

    /// Strip a prefix and strictly parse the rest as a byte count
    fn byte_field(&self, line: &str, prefix: &str) -> Result<u64, ParseError> {
        self.field(line, prefix)?
            .parse()
            .map_err(|_| self.bad_number(line))
    }

    fn bad_record(&self, line: &str) -> ParseError {
        ParseError::BadRecord {
            line: self.cursor.index(),
            text: line.to_string(),
        }
    }

    fn bad_number(&self, line: &str) -> ParseError {
        ParseError::BadNumber {
            line: self.cursor.index(),
            text: line.to_string(),
        }
    }
}
