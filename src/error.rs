//! Errors that stop an operation. Problems inside a rule file are not errors:
//! they're `parse::Diagnostic`s.
use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Result type for reading operands
pub type Result<T> = std::result::Result<T, Error>;

/// A file that couldn't be turned into rule text
#[derive(Debug, Error)]
pub enum Error {
    /// The file couldn't be opened or read
    #[error("Can't read file: {path}")]
    UnreadableFile {
        /// The file, formatted for display
        path: String,
        /// What went wrong
        source: io::Error,
    },
    /// The file's contents aren't UTF-8 (or UTF-16 with a Byte Order Mark)
    #[error("File is not UTF-8 text: {path}")]
    InvalidEncoding {
        /// The file, formatted for display
        path: String,
        /// Where decoding failed
        source: FromUtf8Error,
    },
}
