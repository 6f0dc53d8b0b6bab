//! zxml - streaming markup document parser with a name-grouped node tree
//!
//! # Quick Start
//!
//! ```
//! use zxml::from_str;
//! # fn main() -> Result<(), zxml::Error> {
//! let doc = from_str(r#"<?xml ver="1"?><root><item id="1">hi</item><item id="2">bye</item></root>"#)?;
//! assert_eq!(doc.header().get("ver").map(String::as_str), Some("1"));
//!
//! let root = doc.root();
//! assert_eq!(root.count_children("item"), 2);
//! assert_eq!(root.child("item", 1)?.attribute("id")?, "2");
//! assert_eq!(root.child("item", 0)?.value(), "hi");
//! # Ok(())
//! # }
//! ```
//!
//! Children are grouped by tag name: within a group document order is kept,
//! across groups the tree walks names in sorted order. Writing a document
//! back out therefore keeps every node but may reorder differently named
//! siblings.

#![forbid(unsafe_code)]

pub mod cursor;
pub mod document;
pub mod error;
pub mod node;
pub mod parser;
pub mod writer;

use std::io::Read;
use std::path::Path;

pub use cursor::Cursor;
pub use document::{Document, Header};
pub use error::{Error, ErrorKind, Pos, Result};
pub use node::{Attributes, Children, Node};
pub use parser::{Config, Parser};

/// Parse a document from a string
pub fn from_str(s: &str) -> Result<Document> {
    Document::load_from_str(s)
}

/// Parse with custom configuration
pub fn from_str_with_config(s: &str, config: Config) -> Result<Document> {
    Document::load_from_str_with_config(s, config)
}

/// Parse a document from any reader
pub fn from_reader<R: Read>(reader: R) -> Result<Document> {
    Document::load_from_reader(reader)
}

/// Parse a document from a file
pub fn from_file(path: impl AsRef<Path>) -> Result<Document> {
    Document::load_from_file(path)
}

/// Serialize a document to indented text
pub fn to_string(doc: &Document) -> String {
    writer::to_string(doc)
}

/// Serialize a document into a file
pub fn save_to_file(doc: &Document, path: impl AsRef<Path>) -> Result<()> {
    doc.save_to_file(path)
}
