//! Raw terminal mode session
//!
//! Captures the terminal attributes of stdin, switches the terminal into raw
//! mode with a 100ms read timeout, and restores the captured attributes when
//! the session is released or dropped.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use tracing::{debug, info, warn};

use crate::core::viewport::Extent;
use crate::editor::RawMode;
use crate::error::{EditorError, Result};
use crate::ui::keydecoder::ByteSource;

/// Read returns after 0 bytes within this many tenths of a second.
const READ_TIMEOUT_DECISECONDS: libc::cc_t = 1;

/// Derive raw attributes from the captured ones.
///
/// Disables echo, canonical input, signal keys, extended input processing,
/// output post-processing, parity checking, 8th bit stripping, XON/XOFF and
/// break-to-interrupt. Forces 8-bit characters and a timed read policy.
pub fn make_raw(original: &libc::termios) -> libc::termios {
    let mut raw = *original;

    raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    raw.c_cc[libc::VMIN] = 0;
    raw.c_cc[libc::VTIME] = READ_TIMEOUT_DECISECONDS;

    raw
}

/// Exclusive raw-mode ownership of the controlling terminal.
///
/// The captured attributes are restored exactly once: by `release`, or by
/// `Drop` if the session goes out of scope first (error paths included).
pub struct TerminalSession {
    fd: RawFd,
    original: libc::termios,
    active: bool,
}

impl TerminalSession {
    /// Capture the current attributes of stdin and enter raw mode.
    pub fn acquire() -> Result<Self> {
        Self::acquire_on(io::stdin().as_raw_fd())
    }

    /// Capture the current attributes of `fd` and enter raw mode on it.
    pub fn acquire_on(fd: RawFd) -> Result<Self> {
        let mut termios = std::mem::MaybeUninit::<libc::termios>::uninit();
        let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
        if result != 0 {
            return Err(EditorError::TerminalQuery(io::Error::last_os_error()));
        }
        let original = unsafe { termios.assume_init() };

        let raw = make_raw(&original);
        let result = unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw) };
        if result != 0 {
            return Err(EditorError::TerminalConfigure(io::Error::last_os_error()));
        }

        info!("Entered raw terminal mode");
        Ok(Self {
            fd,
            original,
            active: true,
        })
    }

    /// Viewport dimensions as reported by the terminal.
    pub fn query_extent(&self) -> Result<Extent> {
        let (cols, rows) = crossterm::terminal::size().map_err(|e| {
            warn!("Terminal size query failed: {}", e);
            EditorError::TerminalSize
        })?;
        if cols == 0 || rows == 0 {
            return Err(EditorError::TerminalSize);
        }
        debug!("Terminal size: {}x{}", cols, rows);
        Ok(Extent::new(rows as usize, cols as usize))
    }
}

impl RawMode for TerminalSession {
    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        let result = unsafe { libc::tcsetattr(self.fd, libc::TCSAFLUSH, &self.original) };
        if result != 0 {
            warn!(
                "Failed to restore terminal settings: {}",
                io::Error::last_os_error()
            );
        } else {
            info!("Restored terminal settings");
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.release();
    }
}

/// One-byte timed reads from stdin.
pub struct StdinSource {
    fd: RawFd,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            fd: io::stdin().as_raw_fd(),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(self.fd, (&mut byte as *mut u8).cast(), 1) };
        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(EditorError::InputRead(err)),
                }
            }
        }
    }
}
