//! Input decoding and screen output.
//!
//! - **keydecoder**: raw input bytes to logical key events
//! - **renderer**: viewport state to a single-write terminal frame

pub mod keydecoder;
pub mod renderer;

pub use keydecoder::{ByteSource, KeyDecoder, KeyEvent};
pub use renderer::Renderer;
