//! Immutable line buffer
//!
//! Lines are raw bytes with their terminators stripped. One byte is one column.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{EditorError, Result};

/// One row of the loaded file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line(Vec<u8>);

impl Line {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Ordered lines in file order.
///
/// Rows `0..line_count()` address loaded lines; row `line_count()` is the
/// position past the end of the file.
#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    /// Build a document from already split lines.
    pub fn load<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let lines: Vec<Line> = lines.into_iter().map(Line::new).collect();
        debug!("Loaded document with {} lines", lines.len());
        Self { lines }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_at(&self, row: usize) -> Result<&Line> {
        self.lines.get(row).ok_or(EditorError::Index {
            row,
            count: self.lines.len(),
        })
    }

    pub fn line_length(&self, row: usize) -> Result<usize> {
        self.line_at(row).map(Line::len)
    }
}

/// Read `path` and split it into lines without their `\n` / `\r` terminators.
pub fn read_lines(path: &Path) -> Result<Vec<Vec<u8>>> {
    let load_error = |source| EditorError::FileLoad {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(load_error)?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();

    loop {
        let mut line = Vec::new();
        let n = reader.read_until(b'\n', &mut line).map_err(load_error)?;
        if n == 0 {
            break;
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        lines.push(line);
    }

    Ok(lines)
}
