//! Key decoder
//!
//! Turns raw terminal input bytes into logical key events. Escape sequences
//! are recognised by a small state machine; a read timeout while a sequence
//! is pending collapses it into a bare `Escape`.

use tracing::{debug, trace};

use crate::error::Result;

/// ESC byte
const ESC: u8 = 0x1B;
/// DEL byte
const DEL: u8 = 0x7F;
/// Ctrl+Q
const QUIT: u8 = ctrl_key(b'q');

/// Control code produced by Ctrl + `key`.
pub const fn ctrl_key(key: u8) -> u8 {
    key & 0x1F
}

/// Logical key produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    PrintableByte(u8),
    ControlByte(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Home,
    End,
    Delete,
    Escape,
    Quit,
}

/// Timed single-byte reads. `Ok(None)` means the read window passed with no input.
pub trait ByteSource {
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// Decoder state between reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DecodeState {
    #[default]
    Idle,
    SawEscape,
    SawBracket,
    SawBracketDigit(u8),
    SawO,
}

/// One input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Byte(u8),
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next(DecodeState),
    Emit(KeyEvent),
}

/// Transition table: (state, input) -> next state or emitted key.
fn step(state: DecodeState, input: Input) -> Step {
    use DecodeState::*;
    use Input::*;

    match (state, input) {
        (Idle, Timeout) => Step::Next(Idle),
        (Idle, Byte(ESC)) => Step::Next(SawEscape),
        (Idle, Byte(b)) => Step::Emit(classify(b)),

        (SawEscape, Byte(b'[')) => Step::Next(SawBracket),
        (SawEscape, Byte(b'O')) => Step::Next(SawO),

        (SawBracket, Byte(d)) if d.is_ascii_digit() => Step::Next(SawBracketDigit(d)),
        (SawBracket, Byte(b'A')) => Step::Emit(KeyEvent::ArrowUp),
        (SawBracket, Byte(b'B')) => Step::Emit(KeyEvent::ArrowDown),
        (SawBracket, Byte(b'C')) => Step::Emit(KeyEvent::ArrowRight),
        (SawBracket, Byte(b'D')) => Step::Emit(KeyEvent::ArrowLeft),
        (SawBracket, Byte(b'H')) => Step::Emit(KeyEvent::Home),
        (SawBracket, Byte(b'F')) => Step::Emit(KeyEvent::End),

        (SawBracketDigit(d), Byte(b'~')) => Step::Emit(tilde_key(d)),

        (SawO, Byte(b'H')) => Step::Emit(KeyEvent::Home),
        (SawO, Byte(b'F')) => Step::Emit(KeyEvent::End),

        // Timeouts mid-sequence and anything unrecognised
        _ => Step::Emit(KeyEvent::Escape),
    }
}

/// Key for `ESC [ <digit> ~`.
fn tilde_key(digit: u8) -> KeyEvent {
    match digit {
        b'1' | b'7' => KeyEvent::Home,
        b'3' => KeyEvent::Delete,
        b'4' | b'8' => KeyEvent::End,
        b'5' => KeyEvent::PageUp,
        b'6' => KeyEvent::PageDown,
        _ => KeyEvent::Escape,
    }
}

/// Key for a byte read outside an escape sequence.
fn classify(byte: u8) -> KeyEvent {
    match byte {
        QUIT => KeyEvent::Quit,
        b if b < 0x20 || b == DEL => KeyEvent::ControlByte(b),
        b => KeyEvent::PrintableByte(b),
    }
}

/// Infinite stream of key events over a byte source.
pub struct KeyDecoder<S> {
    source: S,
}

impl<S: ByteSource> KeyDecoder<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Block until one complete key event is decoded.
    ///
    /// Idle timeouts are retried. After ESC at most three further reads are made.
    pub fn read_key(&mut self) -> Result<KeyEvent> {
        let mut state = DecodeState::Idle;
        loop {
            let input = match self.source.read_byte()? {
                Some(byte) => Input::Byte(byte),
                None => Input::Timeout,
            };
            if state != DecodeState::Idle {
                trace!("Escape sequence {:?} <- {:?}", state, input);
            }
            match step(state, input) {
                Step::Next(next) => state = next,
                Step::Emit(key) => {
                    debug!("Key: {:?}", key);
                    return Ok(key);
                }
            }
        }
    }
}

impl<S: ByteSource> Iterator for KeyDecoder<S> {
    type Item = Result<KeyEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.read_key())
    }
}
