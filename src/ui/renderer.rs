//! Frame renderer
//!
//! Builds one complete frame (hide cursor, redraw every row, reposition and
//! show cursor) in memory and hands it to the terminal in a single write.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    terminal::{Clear, ClearType},
};
use tracing::trace;

use crate::core::{Document, Extent, ViewportState, VisibleRow};
use crate::error::{EditorError, Result};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Cursor to row 1 col 1
const CURSOR_HOME: &[u8] = b"\x1b[H";

pub struct Renderer {
    /// Drawn at the start of rows past the end of the document
    row_marker: String,
    /// Shown on empty documents, a third of the way down
    banner: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("~")
    }
}

impl Renderer {
    pub fn new(row_marker: impl Into<String>) -> Self {
        Self {
            row_marker: row_marker.into(),
            banner: format!("kiloview -- version {}", VERSION),
        }
    }

    /// Render a frame into a fresh buffer.
    pub fn frame(
        &self,
        view: &ViewportState,
        document: &Document,
        extent: Extent,
    ) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(extent.rows * (extent.cols + 8) + 32);
        self.write_frame(&mut buf, view, document, extent)?;
        Ok(buf)
    }

    fn write_frame<W: Write>(
        &self,
        buf: &mut W,
        view: &ViewportState,
        document: &Document,
        extent: Extent,
    ) -> io::Result<()> {
        queue!(buf, Hide)?;
        buf.write_all(CURSOR_HOME)?;

        let rows = view.visible_slice(document, extent);
        let last = rows.len().saturating_sub(1);
        for (y, row) in rows.into_iter().enumerate() {
            match row {
                VisibleRow::Text(text) => buf.write_all(text)?,
                VisibleRow::Absent if document.is_empty() && y == extent.rows / 3 => {
                    self.write_banner(buf, extent)?;
                }
                VisibleRow::Absent => buf.write_all(self.row_marker.as_bytes())?,
            }

            queue!(buf, Clear(ClearType::UntilNewLine))?;
            if y < last {
                buf.write_all(b"\r\n")?;
            }
        }

        let (row, col) = view.screen_cursor();
        queue!(buf, MoveTo((col - 1) as u16, (row - 1) as u16), Show)?;
        Ok(())
    }

    /// Centered banner. The length clamp uses the row count, as the reference does.
    fn write_banner<W: Write>(&self, buf: &mut W, extent: Extent) -> io::Result<()> {
        let banner = self.banner.as_bytes();
        let len = banner.len().min(extent.rows);
        let mut padding = extent.cols.saturating_sub(len) / 2;
        if padding > 0 {
            buf.write_all(self.row_marker.as_bytes())?;
            padding -= 1;
        }
        buf.write_all(" ".repeat(padding).as_bytes())?;
        buf.write_all(&banner[..len])
    }

    /// Render a frame and write it to `out` in one call.
    pub fn draw<W: Write>(
        &self,
        out: &mut W,
        view: &ViewportState,
        document: &Document,
        extent: Extent,
    ) -> Result<()> {
        let frame = self.frame(view, document, extent).map_err(EditorError::Output)?;
        trace!("Frame: {} bytes", frame.len());
        out.write_all(&frame).map_err(EditorError::Output)?;
        out.flush().map_err(EditorError::Output)
    }

    /// Erase the whole screen and home the cursor.
    pub fn clear_screen<W: Write>(out: &mut W) -> Result<()> {
        let mut buf: Vec<u8> = Vec::new();
        queue!(buf, Clear(ClearType::All)).map_err(EditorError::Output)?;
        buf.extend_from_slice(CURSOR_HOME);
        out.write_all(&buf).map_err(EditorError::Output)?;
        out.flush().map_err(EditorError::Output)
    }
}
