//! Cursor-style walk over a node's direct children

use std::ops::Bound;

use crate::error::{Error, Result};
use crate::node::Node;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot<'a> {
    Group { name: &'a str, index: usize },
    End,
}

/// Forward cursor over direct children
///
/// Walks one name group at a time; when a group is exhausted it moves to the
/// next group name in key order. Past the last group it sits on an end
/// sentinel. Also usable as a plain [`Iterator`].
#[derive(Clone, Debug)]
pub struct Children<'a> {
    owner: &'a Node,
    slot: Slot<'a>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(owner: &'a Node) -> Self {
        let mut children = Self {
            owner,
            slot: Slot::End,
        };
        children.begin();
        children
    }

    /// Restart from the first child
    pub fn begin(&mut self) {
        let owner = self.owner;
        self.slot = match owner.child_groups().keys().next() {
            Some(name) => Slot::Group {
                name: name.as_str(),
                index: 0,
            },
            None => Slot::End,
        };
    }

    /// Whether the cursor sits on the end sentinel
    pub fn is_end(&self) -> bool {
        self.slot == Slot::End
    }

    /// Current `(group name, index in group)`, `None` at the end
    pub fn position(&self) -> Option<(&'a str, usize)> {
        match self.slot {
            Slot::Group { name, index } => Some((name, index)),
            Slot::End => None,
        }
    }

    /// Node under the cursor
    pub fn get(&self) -> Result<&'a Node> {
        let (name, index) = self.locate()?;
        let owner = self.owner;
        owner
            .child_groups()
            .get(name)
            .and_then(|group| group.get(index))
            .ok_or_else(|| {
                Error::iterator_state(format!(
                    "Node {name} not found in {} node",
                    owner.name()
                ))
            })
    }

    /// Step to the next child, possibly onto the end sentinel
    pub fn advance(&mut self) -> Result<()> {
        let (name, index) = self.locate()?;
        let owner = self.owner;
        let groups = owner.child_groups();
        let group_len = groups.get(name).map_or(0, Vec::len);

        self.slot = if index + 1 < group_len {
            Slot::Group {
                name,
                index: index + 1,
            }
        } else {
            match groups
                .range::<str, _>((Bound::Excluded(name), Bound::Unbounded))
                .next()
            {
                Some((next, _)) => Slot::Group {
                    name: next.as_str(),
                    index: 0,
                },
                None => Slot::End,
            }
        };
        Ok(())
    }

    fn locate(&self) -> Result<(&'a str, usize)> {
        if !self.owner.has_children() {
            return Err(Error::iterator_state(format!(
                "Node {} is empty",
                self.owner.name()
            )));
        }
        self.position().ok_or_else(|| {
            Error::iterator_state(format!(
                "Iterator is past the last child of node {}",
                self.owner.name()
            ))
        })
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.get().ok()?;
        self.advance().ok().map(|()| node)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::error::ErrorKind;
    use crate::node::Node;

    fn interleaved() -> Node {
        let mut root = Node::new("root");
        root.add_child(Node::new("b").with_value("b0"));
        root.add_child(Node::new("a").with_value("a0"));
        root.add_child(Node::new("b").with_value("b1"));
        root
    }

    #[test]
    fn test_walks_groups_in_key_order() {
        let root = interleaved();
        let values: Vec<_> = root.children().map(Node::value).collect();
        assert_eq!(values, vec!["a0", "b0", "b1"]);
    }

    #[test]
    fn test_positions_and_end() {
        let root = interleaved();
        let mut it = root.children();
        assert_eq!(it.position(), Some(("a", 0)));
        it.advance().unwrap();
        assert_eq!(it.position(), Some(("b", 0)));
        it.advance().unwrap();
        assert_eq!(it.position(), Some(("b", 1)));
        it.advance().unwrap();
        assert!(it.is_end());
        assert_eq!(
            it.get().unwrap_err().kind(),
            &ErrorKind::IteratorState
        );
        assert_eq!(
            it.advance().unwrap_err().kind(),
            &ErrorKind::IteratorState
        );
    }

    #[test]
    fn test_begin_restarts() {
        let root = interleaved();
        let mut it = root.children();
        assert_eq!(it.by_ref().count(), 3);
        it.begin();
        assert_eq!(it.get().unwrap().value(), "a0");
    }

    #[test]
    fn test_empty_owner() {
        let leaf = Node::new("leaf");
        let it = leaf.children();
        assert!(it.is_end());
        let err = it.get().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IteratorState);
        assert_eq!(err.message(), "Node leaf is empty");
    }

    #[test]
    fn test_into_iterator_for_ref() {
        let root = interleaved();
        let mut names = Vec::new();
        for child in &root {
            names.push(child.name());
        }
        assert_eq!(names, vec!["a", "b", "b"]);
    }
}
