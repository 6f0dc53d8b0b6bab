//! Property-based tests for the loader and writer
//!
//! 1. Round trip: write(tree) -> parse == tree
//! 2. Arbitrary input never panics the loader

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use zxml::{from_str, to_string, Document, Node, Parser};

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

/// Text with quotes, backslashes, angle brackets and stray whitespace
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z ]{1,10}",
        "\\PC{0,12}",
        "[<>\"\\\\/?= \t\na-z]{1,12}",
    ]
}

fn build(name: String, value: String, attrs: Vec<(String, String)>, children: Vec<Node>) -> Node {
    let mut node = Node::new(name).with_value(value);
    for (key, value) in attrs {
        node.add_attribute(key, value).unwrap();
    }
    for child in children {
        node.add_child(child);
    }
    node
}

fn arb_attrs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map(arb_name(), arb_text(), 0..4)
        .prop_map(|attrs| attrs.into_iter().collect())
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = (arb_name(), arb_text(), arb_attrs())
        .prop_map(|(name, value, attrs)| build(name, value, attrs, Vec::new()));

    leaf.prop_recursive(4, 48, 6, |inner| {
        (
            arb_name(),
            arb_text(),
            arb_attrs(),
            prop::collection::vec(inner, 0..6),
        )
            .prop_map(|(name, value, attrs, children)| build(name, value, attrs, children))
    })
}

fn arb_document() -> impl Strategy<Value = Document> {
    (arb_node(), prop::collection::btree_map(arb_name(), arb_text(), 0..3)).prop_map(
        |(root, header)| {
            let mut doc = Document::with_root(root);
            doc.header_mut().extend(header);
            doc
        },
    )
}

proptest! {
    #[test]
    fn document_roundtrip(doc in arb_document()) {
        let text = to_string(&doc);
        let parsed = from_str(&text).unwrap();
        prop_assert_eq!(&parsed, &doc);
        prop_assert_eq!(to_string(&parsed), text);
    }

    #[test]
    fn chunked_feed_matches_whole_input(doc in arb_document(), split in 0usize..64) {
        let text = to_string(&doc);
        let bytes = text.as_bytes();
        let (head, tail) = bytes.split_at(split.min(bytes.len()));
        let mut parser = Parser::new();
        parser.feed_bytes(head).unwrap();
        parser.feed_bytes(tail).unwrap();
        prop_assert_eq!(parser.finish().unwrap(), doc);
    }

    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,64}") {
        let _result = from_str(&input);
    }

    #[test]
    fn tag_soup_never_panics(input in "[<>/?=\"\\\\ a-c]{0,48}") {
        let _result = from_str(&input);
    }
}
