//! Character-driven document loader
//!
//! The loader consumes its input one character at a time and never looks
//! ahead, so it can be fed from a string, from byte chunks or from any
//! reader. The document is only handed out by [`Parser::finish`], once the
//! whole input has been seen.

mod state;

use std::io::{self, Read};
use std::mem;

use tracing::trace;

use crate::cursor::Cursor;
use crate::document::{Document, Header, DECLARATION_NAME};
use crate::error::{Error, ErrorKind, Result};
use crate::node::Node;
use state::{HeaderState, Section, TagState};

/// Bytes pulled from a reader per read call
const CHUNK_SIZE: usize = 1024;

/// Configuration for the loader
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum node nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// A node whose closing tag has not been seen yet
#[derive(Debug)]
struct OpenNode {
    node: Node,
    /// Unquoted whitespace after the node's latest text; kept only if more
    /// text follows before the closing tag
    trailing: String,
}

impl OpenNode {
    fn new(node: Node) -> Self {
        Self {
            node,
            trailing: String::new(),
        }
    }
}

/// Streaming state machine building a [`Document`]
///
/// After any error the parser is left mid-state and must be dropped.
#[derive(Debug)]
pub struct Parser {
    config: Config,
    cursor: Cursor,
    section: Section,
    tag: TagState,
    header_state: HeaderState,
    /// Inside a `"..."` run
    in_string: bool,
    /// Previous character was a backslash inside a string
    escaped: bool,
    /// `/` seen after the node name
    self_closing: bool,
    /// `/` seen right after `<`
    closing: bool,
    /// Attribute value written as `""`
    empty_value: bool,
    /// Whitespace followed the attribute name, only `=` may come next
    attr_name_done: bool,
    header_seen: bool,
    /// Node whose `<...>` is being read
    scratch: Node,
    /// Open nodes, outermost first
    open: Vec<OpenNode>,
    root: Option<Node>,
    header: Header,
    text: String,
    /// Unquoted whitespace inside the current text run, held back until
    /// more text follows
    pending_space: String,
    attr_name: String,
    attr_value: String,
    /// Incomplete UTF-8 sequence left over from the last byte chunk
    utf8_tail: Vec<u8>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser with default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new parser with custom configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            cursor: Cursor::new(),
            section: Section::default(),
            tag: TagState::default(),
            header_state: HeaderState::default(),
            in_string: false,
            escaped: false,
            self_closing: false,
            closing: false,
            empty_value: false,
            attr_name_done: false,
            header_seen: false,
            scratch: Node::default(),
            open: Vec::new(),
            root: None,
            header: Header::new(),
            text: String::new(),
            pending_space: String::new(),
            attr_name: String::new(),
            attr_value: String::new(),
            utf8_tail: Vec::new(),
        }
    }

    /// Parse a complete string
    pub fn parse_str(mut self, input: &str) -> Result<Document> {
        self.feed_str(input)?;
        self.finish()
    }

    /// Parse everything `reader` yields, chunk by chunk
    pub fn parse_reader<R: Read>(mut self, mut reader: R) -> Result<Document> {
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let read = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => read,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(Error::with_message(
                        ErrorKind::Io(err.kind()),
                        format!("read failed: {err}"),
                    )
                    .at(self.cursor.position()));
                }
            };
            self.feed_bytes(chunk.get(..read).unwrap_or_default())?;
        }
        self.finish()
    }

    /// Feed a string slice, character by character
    pub fn feed_str(&mut self, input: &str) -> Result<()> {
        input.chars().try_for_each(|ch| self.feed_char(ch))
    }

    /// Feed raw bytes; a UTF-8 sequence cut at the end is kept for the next call
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut buf = mem::take(&mut self.utf8_tail);
        buf.extend_from_slice(bytes);
        match std::str::from_utf8(&buf) {
            Ok(text) => self.feed_str(text),
            Err(err) if err.error_len().is_none() => {
                let (head, tail) = buf.split_at(err.valid_up_to());
                let text = std::str::from_utf8(head).map_err(|_| self.invalid_utf8())?;
                self.feed_str(text)?;
                self.utf8_tail = tail.to_vec();
                Ok(())
            }
            Err(_) => Err(self.invalid_utf8()),
        }
    }

    /// Process a single character
    pub fn feed_char(&mut self, ch: char) -> Result<()> {
        self.check_size(ch)?;
        self.dispatch(ch)?;
        self.cursor.advance(ch);
        Ok(())
    }

    /// End of input: validate the final state and hand out the document
    pub fn finish(mut self) -> Result<Document> {
        if !self.utf8_tail.is_empty() {
            return Err(self.invalid_utf8());
        }
        if self.in_string {
            return Err(self.syntax("Unterminated string"));
        }
        if self.section == Section::Definition {
            return Err(self.syntax("Unterminated node definition"));
        }
        if let Some(open) = self.open.last() {
            return Err(self.syntax(format!("Node {} is not closed", open.node.name())));
        }
        self.pending_space.clear();
        if !self.text.is_empty() {
            return Err(self.syntax("Text outside of root node"));
        }
        Ok(Document::from_parts(
            self.root.unwrap_or_default(),
            self.header,
        ))
    }

    fn dispatch(&mut self, ch: char) -> Result<()> {
        if self.escaped {
            self.escaped = false;
            return self.push_literal(ch);
        }
        match ch {
            '"' => {
                self.toggle_string();
                Ok(())
            }
            '\\' => self.escape(),
            _ if self.in_string => self.push_literal(ch),
            '<' => self.begin_definition(),
            '>' => self.end_definition(),
            '/' => self.slash(),
            '?' => self.question(),
            '=' => self.equals(),
            _ if ch.is_whitespace() => self.whitespace(ch),
            _ => self.plain(ch),
        }
    }

    fn toggle_string(&mut self) {
        self.in_string = !self.in_string;
        if !self.in_string
            && self.section == Section::Definition
            && self.tag == TagState::AttrValue
            && self.attr_value.is_empty()
        {
            self.empty_value = true;
        }
    }

    fn escape(&mut self) -> Result<()> {
        if !self.in_string {
            return Err(self.syntax("Backslash out of the string"));
        }
        self.escaped = true;
        Ok(())
    }

    /// Quoted or escaped character, never structural
    fn push_literal(&mut self, ch: char) -> Result<()> {
        match (self.section, self.tag) {
            (Section::Data, _) => {
                self.push_text(ch);
                Ok(())
            }
            (Section::Definition, TagState::AttrValue) => {
                self.attr_value.push(ch);
                Ok(())
            }
            (Section::Definition, _) => Err(self.syntax("Invalid literal")),
        }
    }

    /// Append to the current text run; whitespace held across child tags
    /// joins the run when it is the first character after them
    fn push_text(&mut self, ch: char) {
        if self.text.is_empty() {
            if let Some(open) = self.open.last_mut() {
                self.text.push_str(&open.trailing);
                open.trailing.clear();
            }
        }
        self.text.push_str(&self.pending_space);
        self.pending_space.clear();
        self.text.push(ch);
    }

    /// Move the current text run into the innermost open node
    fn flush_text(&mut self) -> Result<()> {
        if !self.text.is_empty() && self.open.is_empty() {
            return Err(self.syntax("Text outside of root node"));
        }
        let text = mem::take(&mut self.text);
        let space = mem::take(&mut self.pending_space);
        if let Some(open) = self.open.last_mut() {
            open.node.append_value(&text);
            open.trailing.push_str(&space);
        }
        Ok(())
    }

    /// Whether the innermost open node already holds text
    fn value_started(&self) -> bool {
        self.open
            .last()
            .is_some_and(|open| !open.node.value().is_empty())
    }

    fn begin_definition(&mut self) -> Result<()> {
        if self.section == Section::Definition {
            return Err(self.syntax("Invalid syntax"));
        }
        self.flush_text()?;
        if self.open.is_empty() && self.root.is_some() {
            return Err(self.syntax("Multiple root nodes"));
        }
        self.scratch = Node::default();
        self.section = Section::Definition;
        self.tag = TagState::Name;
        Ok(())
    }

    fn end_definition(&mut self) -> Result<()> {
        if self.section == Section::Data {
            return Err(self.syntax("Unexpected '>' outside of node definition"));
        }
        if self.scratch.name().is_empty() {
            return Err(self.syntax("Empty node name"));
        }
        if !self.attr_name.is_empty() {
            if self.attr_value.is_empty() && !self.empty_value {
                return Err(self.syntax(format!("Attribute {} has no value", self.attr_name)));
            }
            self.commit_attribute()?;
        }

        let node = mem::take(&mut self.scratch);
        if self.header_state != HeaderState::NotSet {
            self.finish_header(node)?;
        } else if self.self_closing {
            self.check_depth()?;
            trace!(name = node.name(), depth = self.open.len(), "self-closing node");
            self.attach(node);
        } else if self.closing {
            self.close_node(&node)?;
        } else {
            self.check_depth()?;
            trace!(name = node.name(), depth = self.open.len(), "node opened");
            self.open.push(OpenNode::new(node));
        }

        self.section = Section::Data;
        self.tag = TagState::Idle;
        self.header_state = HeaderState::NotSet;
        self.self_closing = false;
        self.closing = false;
        self.empty_value = false;
        self.attr_name_done = false;
        Ok(())
    }

    fn finish_header(&mut self, node: Node) -> Result<()> {
        if self.header_state != HeaderState::End {
            return Err(self.syntax("Invalid header syntax"));
        }
        if node.name() != DECLARATION_NAME {
            return Err(self.syntax("Invalid header name"));
        }
        self.header.extend(node.into_attributes());
        self.header_seen = true;
        trace!(attributes = self.header.len(), "header declaration parsed");
        Ok(())
    }

    fn close_node(&mut self, closing: &Node) -> Result<()> {
        if !closing.attributes().is_empty() {
            return Err(self.syntax("Invalid closing node syntax"));
        }
        let Some(OpenNode { node: current, .. }) = self.open.pop() else {
            return Err(self.syntax("Invalid closing node syntax"));
        };
        if current.name() != closing.name() {
            return Err(self.syntax(format!(
                "Invalid closing node syntax, expected </{}> found </{}>",
                current.name(),
                closing.name()
            )));
        }
        trace!(name = current.name(), depth = self.open.len(), "node closed");
        self.attach(current);
        Ok(())
    }

    /// Hand a finished node to the innermost open node, or make it the root
    fn attach(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.node.add_child(node),
            None => self.root = Some(node),
        }
    }

    fn slash(&mut self) -> Result<()> {
        if self.section == Section::Data {
            self.push_text('/');
            return Ok(());
        }
        if self.closing || self.self_closing || self.header_state != HeaderState::NotSet {
            return Err(self.syntax("Invalid slash syntax"));
        }
        if self.scratch.name().is_empty() {
            self.closing = true;
        } else {
            self.self_closing = true;
        }
        Ok(())
    }

    fn question(&mut self) -> Result<()> {
        if self.section == Section::Data {
            self.push_text('?');
            return Ok(());
        }
        match self.header_state {
            HeaderState::NotSet => {
                if self.header_seen {
                    return Err(self.syntax("Duplicate header declaration"));
                }
                let at_document_start = self.open.is_empty() && self.root.is_none();
                if !at_document_start || self.closing || !self.scratch.name().is_empty() {
                    return Err(self.syntax("Invalid header syntax"));
                }
                self.header_state = HeaderState::Begin;
            }
            HeaderState::Begin => self.header_state = HeaderState::End,
            HeaderState::End => return Err(self.syntax("Invalid header syntax")),
        }
        Ok(())
    }

    fn equals(&mut self) -> Result<()> {
        if self.section == Section::Data {
            self.push_text('=');
            return Ok(());
        }
        self.expect_definition_end()?;
        if self.tag != TagState::AttrName || self.attr_name.is_empty() {
            return Err(self.syntax("Invalid property syntax"));
        }
        self.tag = TagState::AttrValue;
        self.attr_name_done = false;
        Ok(())
    }

    fn whitespace(&mut self, ch: char) -> Result<()> {
        if self.section == Section::Data {
            if !self.text.is_empty() || self.value_started() {
                self.pending_space.push(ch);
            }
            return Ok(());
        }

        if self.scratch.name().is_empty() {
            self.tag = TagState::Name;
        } else if self.tag == TagState::AttrValue
            && (!self.attr_value.is_empty() || self.empty_value)
        {
            self.commit_attribute()?;
            self.tag = TagState::AttrName;
        } else if self.tag == TagState::AttrName {
            self.attr_name_done = !self.attr_name.is_empty();
        } else if self.tag != TagState::AttrValue {
            self.tag = TagState::AttrName;
        }
        Ok(())
    }

    fn plain(&mut self, ch: char) -> Result<()> {
        if self.section == Section::Data {
            self.push_text(ch);
            return Ok(());
        }
        self.expect_definition_end()?;
        match self.tag {
            TagState::Name => self.scratch.push_name(ch),
            TagState::AttrName if self.attr_name_done => {
                return Err(self.syntax(format!("Attribute {} has no value", self.attr_name)));
            }
            TagState::AttrName => self.attr_name.push(ch),
            TagState::AttrValue => self.attr_value.push(ch),
            TagState::Idle => return Err(self.syntax("Invalid syntax")),
        }
        Ok(())
    }

    /// After a self-closing `/` or the closing `?` only `>` may follow
    fn expect_definition_end(&self) -> Result<()> {
        if self.self_closing || self.header_state == HeaderState::End {
            return Err(self.syntax("Expected '>'"));
        }
        Ok(())
    }

    fn commit_attribute(&mut self) -> Result<()> {
        let name = mem::take(&mut self.attr_name);
        let value = mem::take(&mut self.attr_value);
        self.empty_value = false;
        self.attr_name_done = false;
        let pos = self.cursor.position();
        self.scratch
            .add_attribute(name, value)
            .map_err(|err| err.at(pos))
    }

    fn check_depth(&self) -> Result<()> {
        let max = self.config.max_depth;
        if max > 0 && self.open.len() >= usize::from(max) {
            return Err(self.cursor.error(
                ErrorKind::MaxDepthExceeded { max },
                format!("Nesting deeper than {max} nodes"),
            ));
        }
        Ok(())
    }

    fn check_size(&self, ch: char) -> Result<()> {
        let max = self.config.max_size;
        let size = self.cursor.position().offset + ch.len_utf8();
        if max > 0 && size > max {
            return Err(self.cursor.error(
                ErrorKind::MaxSizeExceeded { max },
                format!("Input larger than {max} bytes"),
            ));
        }
        Ok(())
    }

    fn syntax(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.cursor.position())
    }

    fn invalid_utf8(&self) -> Error {
        self.syntax("Invalid UTF-8 sequence")
    }
}
