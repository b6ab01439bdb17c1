//! Cursor and scroll bookkeeping
//!
//! The cursor lives in document coordinates. `reconcile_scroll` moves the
//! scroll offset just far enough to keep the cursor on screen; input handling
//! never touches the offset directly.

use crate::core::document::Document;
use crate::ui::keydecoder::KeyEvent;

/// Visible viewport size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub rows: usize,
    pub cols: usize,
}

impl Extent {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

/// Cursor position in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub col: usize,
    /// In `0..=line_count`
    pub row: usize,
}

/// Document coordinate shown at the viewport's top-left cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollOffset {
    pub row: usize,
    pub col: usize,
}

/// One screen row of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibleRow<'a> {
    /// Part of a document line starting at the column offset, at most `cols` bytes.
    Text(&'a [u8]),
    /// Screen row past the end of the document.
    Absent,
}

#[derive(Debug, Clone, Default)]
pub struct ViewportState {
    pub cursor: Cursor,
    pub scroll: ScrollOffset,
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a navigation key. Other events leave the cursor untouched.
    pub fn move_cursor(&mut self, event: KeyEvent, document: &Document, extent: Extent) {
        match event {
            KeyEvent::ArrowLeft => {
                if self.cursor.col > 0 {
                    self.cursor.col -= 1;
                }
            }
            KeyEvent::ArrowRight => {
                if let Ok(len) = document.line_length(self.cursor.row) {
                    if self.cursor.col <= len {
                        self.cursor.col += 1;
                    }
                }
            }
            KeyEvent::ArrowUp => self.step_up(),
            KeyEvent::ArrowDown => self.step_down(document),
            KeyEvent::PageUp => {
                for _ in 0..extent.rows {
                    self.step_up();
                }
            }
            KeyEvent::PageDown => {
                for _ in 0..extent.rows {
                    self.step_down(document);
                }
            }
            KeyEvent::Home => self.cursor.col = 0,
            // Viewport right edge, not the line end.
            KeyEvent::End => self.cursor.col = extent.cols.saturating_sub(1),
            _ => {}
        }
    }

    fn step_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
        }
    }

    fn step_down(&mut self, document: &Document) {
        if self.cursor.row < document.line_count() {
            self.cursor.row += 1;
        }
    }

    /// Shift the scroll offset by the minimum needed to keep the cursor inside
    /// `[offset, offset + extent)` on both axes.
    pub fn reconcile_scroll(&mut self, extent: Extent) {
        let rows = extent.rows.max(1);
        let cols = extent.cols.max(1);

        if self.cursor.row < self.scroll.row {
            self.scroll.row = self.cursor.row;
        }
        if self.cursor.row >= self.scroll.row + rows {
            self.scroll.row = self.cursor.row + 1 - rows;
        }
        if self.cursor.col < self.scroll.col {
            self.scroll.col = self.cursor.col;
        }
        if self.cursor.col >= self.scroll.col + cols {
            self.scroll.col = self.cursor.col + 1 - cols;
        }
    }

    /// The `extent.rows` screen rows of the current frame, top to bottom.
    pub fn visible_slice<'a>(&self, document: &'a Document, extent: Extent) -> Vec<VisibleRow<'a>> {
        (0..extent.rows)
            .map(|y| match document.line_at(y + self.scroll.row) {
                Ok(line) => {
                    let bytes = line.as_bytes();
                    let start = self.scroll.col.min(bytes.len());
                    let end = (start + extent.cols).min(bytes.len());
                    VisibleRow::Text(&bytes[start..end])
                }
                Err(_) => VisibleRow::Absent,
            })
            .collect()
    }

    /// Cursor position on screen, 1-indexed `(row, col)`.
    pub fn screen_cursor(&self) -> (usize, usize) {
        (
            self.cursor.row.saturating_sub(self.scroll.row) + 1,
            self.cursor.col.saturating_sub(self.scroll.col) + 1,
        )
    }
}
