//! Indented text output for documents and nodes
//!
//! One tag per line, four spaces per nesting level. Children are written
//! group by group in the same order [`Node::children`] walks them.

use std::fmt::{self, Write};

use crate::document::{Document, DECLARATION_NAME};
use crate::node::{Attributes, Node};

const INDENT: &str = "    ";

/// Write the header line (when present) followed by the root node
///
/// A root without a name has no tag of its own; its children are written at
/// the top level instead and its value is not written. Such output only
/// loads back when the unnamed root has at most one child, which is always
/// the case for a loaded document (only empty input gives an unnamed root).
pub fn write_document<W: Write>(doc: &Document, out: &mut W) -> fmt::Result {
    if !doc.header().is_empty() {
        write_line(
            out,
            0,
            format_args!("<?{DECLARATION_NAME}{}?>", Attrs(doc.header())),
        )?;
    }
    let root = doc.root();
    if root.name().is_empty() {
        root.children()
            .try_for_each(|child| write_node(child, 0, out))
    } else {
        write_node(root, 0, out)
    }
}

/// Write `node` and its subtree starting at nesting `level`
pub fn write_node<W: Write>(node: &Node, level: usize, out: &mut W) -> fmt::Result {
    let attrs = Attrs(node.attributes());
    if node.is_self_closing() {
        return write_line(out, level, format_args!("<{}{attrs}/>", node.name()));
    }

    write_line(out, level, format_args!("<{}{attrs}>", node.name()))?;
    if !node.value().is_empty() {
        write_line(out, level + 1, format_args!("{}", Text(node.value())))?;
    }
    for child in node {
        write_node(child, level + 1, out)?;
    }
    write_line(out, level, format_args!("</{}>", node.name()))
}

/// Serialize `doc` into a new string
pub fn to_string(doc: &Document) -> String {
    doc.to_string()
}

fn write_line<W: Write>(out: &mut W, level: usize, line: fmt::Arguments<'_>) -> fmt::Result {
    for _ in 0..level {
        out.write_str(INDENT)?;
    }
    out.write_fmt(line)?;
    out.write_char('\n')
}

/// ` name="value"` pairs
struct Attrs<'a>(&'a Attributes);

impl fmt::Display for Attrs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in self.0 {
            write!(f, " {name}=\"")?;
            write_escaped(f, value)?;
            f.write_char('"')?;
        }
        Ok(())
    }
}

/// Node value, quoted only when it would not read back unchanged
struct Text<'a>(&'a str);

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if needs_quotes(self.0) {
            f.write_char('"')?;
            write_escaped(f, self.0)?;
            f.write_char('"')
        } else {
            f.write_str(self.0)
        }
    }
}

fn needs_quotes(text: &str) -> bool {
    text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains(['<', '>', '"', '\\'])
}

fn write_escaped<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    for ch in text.chars() {
        if matches!(ch, '"' | '\\') {
            out.write_char('\\')?;
        }
        out.write_char(ch)?;
    }
    Ok(())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(self, 0, f)
    }
}
