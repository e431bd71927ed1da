//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing a massif trace
///
/// Every variant except `Io` pins down the offending input line so callers
/// can report or highlight it. Line indices are 0-based.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The line does not match the grammar expected for the current state:
    /// wrong prefix, missing separator, malformed tree entry.
    #[error("malformed record at line {line}: {text:?}")]
    BadRecord { line: usize, text: String },

    /// A numeric field failed strict base-10 parsing.
    #[error("invalid numeric value at line {line}: {text:?}")]
    BadNumber { line: usize, text: String },

    /// Input ended while a required header or scalar field was still pending.
    /// Input ending mid-tree is NOT reported through this variant; truncated
    /// dumps parse to a partial subtree.
    #[error("unexpected end of input at line {line}")]
    UnexpectedEof { line: usize },

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseError {
    /// 0-based index of the line the parse failed on, if the failure is
    /// tied to a specific line.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::BadRecord { line, .. }
            | ParseError::BadNumber { line, .. }
            | ParseError::UnexpectedEof { line } => Some(*line),
            ParseError::Io(_) => None,
        }
    }

    /// Raw text of the offending line, if any.
    pub fn line_text(&self) -> Option<&str> {
        match self {
            ParseError::BadRecord { text, .. } | ParseError::BadNumber { text, .. } => {
                Some(text.as_str())
            }
            _ => None,
        }
    }
}

/// Errors that can occur during profile output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
