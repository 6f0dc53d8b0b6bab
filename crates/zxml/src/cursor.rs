//! Line/column tracking over a character stream

use crate::error::{Error, ErrorKind, Pos};

/// Position tracker fed one character at a time
#[derive(Clone, Debug, Default)]
pub struct Cursor {
    pos: Pos,
}

impl Cursor {
    /// Create cursor positioned at the start of input
    pub const fn new() -> Self {
        Self { pos: Pos::start() }
    }

    /// Account for one consumed character
    pub fn advance(&mut self, ch: char) {
        self.pos.offset += ch.len_utf8();
        if ch == '\n' {
            self.pos.line += 1;
            self.pos.col = 1;
        } else {
            self.pos.col += 1;
        }
    }

    /// Position of the next character to be consumed
    pub const fn position(&self) -> Pos {
        self.pos
    }

    /// Build an error located at the current position
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>) -> Error {
        Error::with_message(kind, message).at(self.pos)
    }

    /// Reset to the start of input
    pub fn clear(&mut self) {
        self.pos = Pos::start();
    }
}
