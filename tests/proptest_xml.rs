//! Property-based tests for the XML layer.
//!
//! Exercises the parse/serialize round trip at the tree level and checks the
//! public parsers never panic on arbitrary input.

use proptest::prelude::*;
use stig_tools::{XmlElement, canonicalize, extract_metadata, parse_document, parse_scan};

fn element_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,7}"
}

// Parsing trims text nodes, so generated text carries no edge whitespace.
// Markup characters are included to exercise escaping on the write side.
fn text_content() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[A-Za-z0-9&<>]",
        "[A-Za-z0-9&<>][A-Za-z0-9&<> ]{0,18}[A-Za-z0-9&<>]",
    ]
}

// Duplicate attribute names are not well-formed XML; a map keeps keys unique.
fn attributes() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[A-Za-z][A-Za-z0-9_]{0,7}", "[A-Za-z0-9 &\"']{0,12}", 0..3)
        .prop_map(|map| map.into_iter().collect())
}

fn element_tree() -> impl Strategy<Value = XmlElement> {
    let leaf =
        (element_name(), attributes(), text_content()).prop_map(|(name, attributes, text)| {
            XmlElement {
                name,
                attributes,
                children: Vec::new(),
                text,
            }
        });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            element_name(),
            attributes(),
            text_content(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attributes, text, children)| XmlElement {
                name,
                attributes,
                children,
                text,
            })
    })
}

proptest! {
    #[test]
    fn serialized_tree_parses_back_identical(tree in element_tree()) {
        let xml = tree.to_xml().expect("serialize tree");
        let parsed = parse_document(&xml).expect("parse serialized tree");
        prop_assert_eq!(parsed, tree);
    }

    #[test]
    fn canonical_form_is_a_fixed_point(tree in element_tree()) {
        let xml = tree.to_xml().expect("serialize tree");
        let once = canonicalize(&xml).expect("canonicalize");
        prop_assert_eq!(&once, &xml, "a serialized tree is already canonical");

        let twice = canonicalize(&once).expect("canonicalize twice");
        prop_assert_eq!(once, twice);
    }
}

proptest! {
    // 500 cases balances coverage vs speed for the no-panic sweeps. Random
    // input is expected to produce Err in almost all cases; only the absence
    // of panics is asserted.
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn parse_document_doesnt_panic(s in "\\PC{0,2000}") {
        let _ = parse_document(&s);
    }

    #[test]
    fn parse_document_xmlish_doesnt_panic(
        s in prop::string::string_regex(r"<[A-Za-z]{1,10}>[^<]{0,100}</[A-Za-z]{1,10}>").unwrap()
    ) {
        let _ = parse_document(&s);
    }

    #[test]
    fn extract_metadata_doesnt_panic(s in "\\PC{0,500}") {
        let _ = extract_metadata(&s);
    }

    #[test]
    fn parse_scan_doesnt_panic(s in "\\PC{0,500}") {
        let _ = parse_scan(&s);
    }
}
