//! Core viewer model and terminal plumbing.
//!
//! - **terminal**: raw-mode session over the controlling terminal (termios)
//! - **document**: immutable line buffer loaded from a file
//! - **viewport**: cursor, scroll offsets and the visible slice of a document
//!
//! # Coordinates
//!
//! ```text
//! document (col, row)  --  minus ScrollOffset  -->  viewport (col, row)
//! viewport (col, row)  --  plus one           -->  terminal (row;col)
//! ```

#[cfg(unix)]
pub mod terminal;
pub mod document;
pub mod viewport;

pub use document::Document;
pub use viewport::{Extent, ViewportState, VisibleRow};
