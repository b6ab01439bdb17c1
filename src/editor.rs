//! Editor state and the input loop
//!
//! Each iteration reconciles scrolling, renders a frame, decodes one key and
//! applies it. Ctrl-Q clears the screen, releases raw mode and ends the loop.

use std::io::Write;

use tracing::info;

use crate::core::{Document, Extent, ViewportState};
use crate::error::Result;
use crate::ui::{ByteSource, KeyDecoder, KeyEvent, Renderer};

/// Something holding the terminal in raw mode.
pub trait RawMode {
    /// Restore the original terminal settings. Calling it again does nothing.
    fn release(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Fatal path: leave raw mode first, then wipe the half-drawn frame.
pub fn abort<W: Write, M: RawMode>(mode: &mut M, out: &mut W) -> Result<()> {
    mode.release();
    Renderer::clear_screen(out)
}

/// Everything the input loop mutates, owned in one place.
pub struct EditorState {
    pub document: Document,
    pub viewport: ViewportState,
    pub extent: Extent,
    pub renderer: Renderer,
}

impl EditorState {
    pub fn new(document: Document, extent: Extent, renderer: Renderer) -> Self {
        Self {
            document,
            viewport: ViewportState::new(),
            extent,
            renderer,
        }
    }

    /// Reconcile scrolling and draw the current frame.
    pub fn refresh<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.viewport.reconcile_scroll(self.extent);
        self.renderer
            .draw(out, &self.viewport, &self.document, self.extent)
    }

    /// Apply one decoded key.
    pub fn handle_key<W: Write, M: RawMode>(
        &mut self,
        key: KeyEvent,
        out: &mut W,
        mode: &mut M,
    ) -> Result<LoopState> {
        match key {
            KeyEvent::Quit => {
                Renderer::clear_screen(out)?;
                mode.release();
                info!("Quit");
                Ok(LoopState::Terminated)
            }
            KeyEvent::ArrowUp
            | KeyEvent::ArrowDown
            | KeyEvent::ArrowLeft
            | KeyEvent::ArrowRight
            | KeyEvent::PageUp
            | KeyEvent::PageDown
            | KeyEvent::Home
            | KeyEvent::End => {
                self.viewport.move_cursor(key, &self.document, self.extent);
                Ok(LoopState::Running)
            }
            _ => Ok(LoopState::Running),
        }
    }

    /// Run until Quit or a fatal error.
    pub fn run<S, W, M>(
        &mut self,
        decoder: &mut KeyDecoder<S>,
        out: &mut W,
        mode: &mut M,
    ) -> Result<()>
    where
        S: ByteSource,
        W: Write,
        M: RawMode,
    {
        let mut state = LoopState::Running;
        while state == LoopState::Running {
            self.refresh(out)?;
            let key = decoder.read_key()?;
            state = self.handle_key(key, out, mode)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Cursor;
    use crate::error::EditorError;
    use crate::ui::keydecoder::{ctrl_key, tests::ScriptedSource};

    #[derive(Default)]
    struct RecordingMode {
        releases: usize,
    }

    impl RawMode for RecordingMode {
        fn release(&mut self) {
            self.releases += 1;
        }
    }

    fn editor(lines: &[&str]) -> EditorState {
        EditorState::new(
            Document::load(lines.iter().copied()),
            Extent::new(24, 80),
            Renderer::default(),
        )
    }

    #[test]
    fn test_arrow_keys_then_quit() {
        let mut state = editor(&["one", "two", "three"]);
        let mut input = b"\x1b[B\x1b[B\x1b[A".to_vec();
        input.push(ctrl_key(b'q'));
        let mut decoder = KeyDecoder::new(ScriptedSource::bytes(&input));
        let mut out: Vec<u8> = Vec::new();
        let mut mode = RecordingMode::default();

        state.run(&mut decoder, &mut out, &mut mode).unwrap();

        assert_eq!(state.viewport.cursor.row, 1);
        assert_eq!(mode.releases, 1);
        assert!(out.ends_with(b"\x1b[2J\x1b[H"));
    }

    #[test]
    fn test_renders_before_each_key() {
        let mut state = editor(&["a"]);
        let input = [b'x', b'y', ctrl_key(b'q')];
        let mut decoder = KeyDecoder::new(ScriptedSource::bytes(&input));
        let mut out: Vec<u8> = Vec::new();
        let mut mode = RecordingMode::default();

        state.run(&mut decoder, &mut out, &mut mode).unwrap();

        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\x1b[?25l").count(), 3);
        assert_eq!(mode.releases, 1);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut state = editor(&["abc"]);
        let mut out: Vec<u8> = Vec::new();
        let mut mode = RecordingMode::default();
        for key in [
            KeyEvent::PrintableByte(b'z'),
            KeyEvent::ControlByte(b'\r'),
            KeyEvent::Delete,
            KeyEvent::Escape,
        ] {
            let next = state.handle_key(key, &mut out, &mut mode).unwrap();
            assert_eq!(next, LoopState::Running);
        }
        assert_eq!(state.viewport.cursor, Cursor::default());
        assert!(out.is_empty());
        assert_eq!(mode.releases, 0);
    }

    #[test]
    fn test_scroll_follows_page_down() {
        let lines: Vec<String> = (0..100).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut state = editor(&refs);
        let mut out: Vec<u8> = Vec::new();
        let mut mode = RecordingMode::default();

        state.handle_key(KeyEvent::PageDown, &mut out, &mut mode).unwrap();
        state.refresh(&mut out).unwrap();

        assert_eq!(state.viewport.cursor.row, 24);
        assert_eq!(state.viewport.scroll.row, 1);
        assert!(out.ends_with(b"\x1b[24;1H\x1b[?25h"));
    }

    #[test]
    fn test_abort_releases_before_clearing() {
        use std::cell::RefCell;
        use std::io;
        use std::rc::Rc;

        struct Mode(Rc<RefCell<Vec<&'static str>>>);
        impl RawMode for Mode {
            fn release(&mut self) {
                self.0.borrow_mut().push("release");
            }
        }

        struct Screen(Rc<RefCell<Vec<&'static str>>>, Vec<u8>);
        impl Write for Screen {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.borrow_mut().push("write");
                self.1.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let events = Rc::new(RefCell::new(Vec::new()));
        let mut mode = Mode(events.clone());
        let mut screen = Screen(events.clone(), Vec::new());

        abort(&mut mode, &mut screen).unwrap();

        assert_eq!(*events.borrow(), vec!["release", "write"]);
        assert_eq!(screen.1, b"\x1b[2J\x1b[H");
    }

    #[test]
    fn test_read_error_aborts_without_release() {
        let mut state = editor(&[]);
        let mut decoder = KeyDecoder::new(ScriptedSource::bytes(b"\x1b[B"));
        let mut out: Vec<u8> = Vec::new();
        let mut mode = RecordingMode::default();

        let result = state.run(&mut decoder, &mut out, &mut mode);
        assert!(matches!(result, Err(EditorError::InputRead(_))));
        // Restoring on the error path is the session guard's job
        assert_eq!(mode.releases, 0);
    }
}
