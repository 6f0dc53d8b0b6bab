//! Document container: root node plus header declaration

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::node::Node;
use crate::parser::{Config, Parser};
use crate::writer;

/// Tag name of the `<?xml ...?>` declaration
pub const DECLARATION_NAME: &str = "xml";

/// Attributes of the header declaration, sorted by name
pub type Header = BTreeMap<String, String>;

/// A loaded document
///
/// Writing a document and loading the text back gives an equal document,
/// except for a hand-built unnamed root holding a value or several children
/// (see [`writer::write_document`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    #[cfg_attr(feature = "serde", serde(default))]
    header: Header,
    root: Node,
}

impl Document {
    /// Empty document: unnamed root, no header
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with `root` and no header
    pub fn with_root(root: Node) -> Self {
        Self {
            header: Header::new(),
            root,
        }
    }

    pub(crate) fn from_parts(root: Node, header: Header) -> Self {
        Self { header, root }
    }

    /// Parse a complete string with the default [`Config`]
    pub fn load_from_str(input: &str) -> Result<Self> {
        Self::load_from_str_with_config(input, Config::default())
    }

    /// Parse a complete string with custom limits
    pub fn load_from_str_with_config(input: &str, config: Config) -> Result<Self> {
        Parser::with_config(config).parse_str(input)
    }

    /// Parse everything `reader` yields
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::load_from_reader_with_config(reader, Config::default())
    }

    pub fn load_from_reader_with_config<R: Read>(reader: R, config: Config) -> Result<Self> {
        Parser::with_config(config).parse_reader(reader)
    }

    /// Load a document from disk, reading it in chunks
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_file_with_config(path, Config::default())
    }

    pub fn load_from_file_with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        load_file(path.as_ref(), config)
    }

    /// Write the serialized document to `path`, replacing its contents
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        save_file(self, path.as_ref())
    }

    /// Top-level element
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Attributes of the `<?xml ...?>` declaration
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Drop the whole tree and the header
    pub fn clear(&mut self) {
        self.root = Node::default();
        self.header.clear();
    }
}

#[instrument(level = "debug", skip(config))]
fn load_file(path: &Path, config: Config) -> Result<Document> {
    let file = File::open(path).map_err(|err| Error::io(&err, path))?;
    let doc = Parser::with_config(config).parse_reader(file)?;
    debug!(root = doc.root.name(), "document loaded");
    Ok(doc)
}

#[instrument(level = "debug", skip(doc))]
fn save_file(doc: &Document, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|err| Error::io(&err, path))?;
    let mut out = BufWriter::new(file);
    out.write_all(doc.to_string().as_bytes())
        .and_then(|()| out.flush())
        .map_err(|err| Error::io(&err, path))?;
    debug!("document saved");
    Ok(())
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writer::write_document(self, f)
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::load_from_str(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_str_trait() -> Result<()> {
        let doc: Document = "<root><a/></root>".parse()?;
        assert_eq!(doc.root().count_children("a"), 1);
        Ok(())
    }

    #[test]
    fn test_clear_resets_root_and_header() -> Result<()> {
        let mut doc = Document::load_from_str(r#"<?xml v="1"?><root><a/></root>"#)?;
        doc.clear();
        assert!(doc.header().is_empty());
        assert_eq!(doc.root(), &Node::default());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Document::load_from_file("definitely/not/here.xml").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::Io(std::io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_header_mut() {
        let mut doc = Document::with_root(Node::new("root"));
        doc.header_mut().insert("version".into(), "1.0".into());
        assert_eq!(doc.to_string(), "<?xml version=\"1.0\"?>\n<root/>\n");
    }
}
