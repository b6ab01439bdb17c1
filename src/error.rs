//! Error types shared by the terminal, document and input layers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to read terminal attributes: {0}")]
    TerminalQuery(#[source] io::Error),

    #[error("Failed to apply raw terminal attributes: {0}")]
    TerminalConfigure(#[source] io::Error),

    #[error("Failed to determine terminal size")]
    TerminalSize,

    #[error("Failed to read from terminal: {0}")]
    InputRead(#[source] io::Error),

    #[error("Failed to write to terminal: {0}")]
    Output(#[source] io::Error),

    #[error("Failed to load {}: {source}", .path.display())]
    FileLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Row lookup past the end of the document. Callers check `line_count` first.
    #[error("Row {row} out of range (document has {count} lines)")]
    Index { row: usize, count: usize },
}

pub type Result<T> = std::result::Result<T, EditorError>;
