//! Error types for zxml

use std::fmt;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Position in the input stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pos {
    /// Byte offset from the start of input
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub col: u32,
}

impl Default for Pos {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {} Coll {}", self.line, self.col)
    }
}

impl Pos {
    /// Create a new position
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Position of the first character of any input
    pub const fn start() -> Self {
        Self::new(0, 1, 1)
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed document text
    Syntax,
    /// Child node, attribute or index lookup failed
    NotFound,
    /// Attribute name already present on the node
    Duplicate,
    /// Children iterator used outside of its valid range
    IteratorState,
    /// File could not be opened, read or written
    Io(io::ErrorKind),
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax error"),
            Self::NotFound => write!(f, "not found"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::IteratorState => write!(f, "invalid iterator state"),
            Self::Io(kind) => write!(f, "io error: {kind}"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for zxml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    pos: Option<Pos>,
    message: String,
}

impl Error {
    /// Unpositioned error of `kind`
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            pos: None,
            message: message.into(),
        }
    }

    /// Syntax error at a specific position
    pub fn syntax(message: impl Into<String>, pos: Pos) -> Self {
        Self::with_message(ErrorKind::Syntax, message).at(pos)
    }

    /// Missing child, attribute or index
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::NotFound, message)
    }

    /// Attribute name already taken
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::Duplicate, message)
    }

    /// Iterator dereferenced or advanced past its range
    pub fn iterator_state(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::IteratorState, message)
    }

    /// Wrap an I/O failure on `path`
    pub fn io(err: &io::Error, path: &Path) -> Self {
        Self::with_message(
            ErrorKind::Io(err.kind()),
            format!("{}: {err}", path.display()),
        )
    }

    /// Attach a position, keeping an already recorded one
    pub fn at(mut self, pos: Pos) -> Self {
        self.pos.get_or_insert(pos);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Position in the input, for errors raised while parsing
    pub fn pos(&self) -> Option<Pos> {
        self.pos
    }

    /// Message without the position suffix
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_syntax(&self) -> bool {
        self.kind == ErrorKind::Syntax
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos {
            Some(pos) => write!(f, "{}, {pos}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Result type alias for zxml
pub type Result<T> = std::result::Result<T, Error>;
