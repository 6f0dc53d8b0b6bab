//! Node tree model
//!
//! Children are grouped by tag name. Order is kept inside a name group, but
//! walking across groups follows the key order of the group map, so two
//! interleaved sibling names do not keep their document order.

mod iter;

pub use iter::Children;

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Attribute storage, kept sorted by name
pub type Attributes = BTreeMap<String, String>;

/// Child storage: tag name -> nodes with that name
pub type ChildGroups = BTreeMap<String, Vec<Node>>;

/// A tagged element with text value, attributes and name-grouped children
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "String::is_empty"))]
    value: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    children: ChildGroups,
}

impl Node {
    /// Create an empty node named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style value setter
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    ///
    /// A node already stored as a child stays in the group of its old name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Text content, empty when the node has none
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the text content
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub(crate) fn push_name(&mut self, ch: char) {
        self.name.push(ch);
    }

    pub(crate) fn append_value(&mut self, text: &str) {
        self.value.push_str(text);
    }

    /// Serialized as `<name/>`: no value and no children
    pub fn is_self_closing(&self) -> bool {
        self.value.is_empty() && self.children.is_empty()
    }

    /// Get the `index`-th child named `name`
    pub fn child(&self, name: &str, index: usize) -> Result<&Self> {
        let group = self
            .children
            .get(name)
            .ok_or_else(|| Error::not_found(format!("Node {name} not found")))?;
        group
            .get(index)
            .ok_or_else(|| Error::not_found(format!("Invalid index {index} for node {name}")))
    }

    /// Mutable access to the `index`-th child named `name`
    pub fn child_mut(&mut self, name: &str, index: usize) -> Result<&mut Self> {
        let group = self
            .children
            .get_mut(name)
            .ok_or_else(|| Error::not_found(format!("Node {name} not found")))?;
        group
            .get_mut(index)
            .ok_or_else(|| Error::not_found(format!("Invalid index {index} for node {name}")))
    }

    /// Look up a child without failing
    pub fn try_child(&self, name: &str, index: usize) -> Option<&Self> {
        self.children.get(name).and_then(|group| group.get(index))
    }

    /// Value of attribute `name`
    pub fn attribute(&self, name: &str) -> Result<&str> {
        self.try_attribute(name)
            .ok_or_else(|| Error::not_found(format!("Attribute {name} not found")))
    }

    /// Mutable access to the value of attribute `name`
    pub fn attribute_mut(&mut self, name: &str) -> Result<&mut String> {
        self.attributes
            .get_mut(name)
            .ok_or_else(|| Error::not_found(format!("Attribute {name} not found")))
    }

    /// Look up an attribute without failing
    pub fn try_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All attributes, sorted by name
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Attribute names in sorted order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    /// Add an attribute; an existing name is never overwritten
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.attributes.contains_key(&name) {
            return Err(Error::duplicate(format!(
                "Attribute {name} already exists in node {}",
                self.name
            )));
        }
        self.attributes.insert(name, value.into());
        Ok(())
    }

    /// Remove attribute `name`, returning its value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Remove every attribute
    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    pub(crate) fn into_attributes(self) -> Attributes {
        self.attributes
    }

    /// Append `node` to the group of its name
    pub fn add_child(&mut self, node: Self) {
        self.children.entry(node.name.clone()).or_default().push(node);
    }

    /// Remove a whole name group, returning its nodes
    pub fn remove_children(&mut self, name: &str) -> Vec<Self> {
        self.children.remove(name).unwrap_or_default()
    }

    /// Remove one node from a name group; an emptied group disappears
    pub fn remove_child(&mut self, name: &str, index: usize) -> Result<Self> {
        let group = self
            .children
            .get_mut(name)
            .ok_or_else(|| Error::not_found(format!("Node {name} not found")))?;
        if index >= group.len() {
            return Err(Error::not_found(format!(
                "Invalid index {index} for node {name}"
            )));
        }
        let removed = group.remove(index);
        if group.is_empty() {
            self.children.remove(name);
        }
        Ok(removed)
    }

    /// Remove every child
    pub fn clear_children(&mut self) {
        self.children.clear();
    }

    /// Whether the node has at least one child
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Children grouped by tag name
    pub fn child_groups(&self) -> &ChildGroups {
        &self.children
    }

    /// Number of direct children named `name`
    pub fn count_children(&self, name: &str) -> usize {
        self.children.get(name).map_or(0, Vec::len)
    }

    /// One `(name, count)` entry per child name group
    pub fn names_and_counts(&self) -> Vec<(&str, usize)> {
        self.children
            .iter()
            .map(|(name, group)| (name.as_str(), group.len()))
            .collect()
    }

    /// Cursor over direct children in group order
    pub fn children(&self) -> Children<'_> {
        Children::new(self)
    }

    /// Apply `f` to every direct child, group by group
    pub fn for_each_child<'a, F>(&'a self, f: F)
    where
        F: FnMut(&'a Self),
    {
        self.children.values().flatten().for_each(f);
    }

    /// Apply `f` to every direct child, group by group, allowing edits
    pub fn for_each_child_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut Self),
    {
        self.children.values_mut().flatten().for_each(f);
    }

    /// Children named `name`; with `recursive` the whole subtree is searched
    pub fn find_by_name(&self, name: &str, recursive: bool) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_matching(recursive, &|node: &Self| node.name == name, &mut found);
        found
    }

    /// Children whose attribute `name` equals `value`
    pub fn find_by_attribute(&self, name: &str, value: &str, recursive: bool) -> Vec<&Self> {
        let mut found = Vec::new();
        self.collect_matching(
            recursive,
            &|node: &Self| node.try_attribute(name) == Some(value),
            &mut found,
        );
        found
    }

    /// Edit every child named `name` in place
    ///
    /// Matches are visited in the same order [`Node::find_by_name`] returns
    /// them. With `recursive` the subtree of a match is searched after `f`
    /// has run on it.
    pub fn find_by_name_mut<F>(&mut self, name: &str, recursive: bool, mut f: F)
    where
        F: FnMut(&mut Self),
    {
        self.visit_matching_mut(recursive, &|node: &Self| node.name == name, &mut f);
    }

    /// Edit every child whose attribute `name` equals `value` in place
    ///
    /// Visiting order follows [`Node::find_by_name_mut`].
    pub fn find_by_attribute_mut<F>(&mut self, name: &str, value: &str, recursive: bool, mut f: F)
    where
        F: FnMut(&mut Self),
    {
        self.visit_matching_mut(
            recursive,
            &|node: &Self| node.try_attribute(name) == Some(value),
            &mut f,
        );
    }

    fn visit_matching_mut<P, F>(&mut self, recursive: bool, matches: &P, f: &mut F)
    where
        P: Fn(&Self) -> bool,
        F: FnMut(&mut Self),
    {
        for child in self.children.values_mut().flatten() {
            if matches(child) {
                f(child);
            }
            if recursive {
                child.visit_matching_mut(recursive, matches, f);
            }
        }
    }

    fn collect_matching<'a, P>(&'a self, recursive: bool, matches: &P, found: &mut Vec<&'a Self>)
    where
        P: Fn(&Self) -> bool,
    {
        self.for_each_child(|child| {
            if matches(child) {
                found.push(child);
            }
            if recursive {
                child.collect_matching(recursive, matches, found);
            }
        });
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;
    type IntoIter = Children<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.children()
    }
}
