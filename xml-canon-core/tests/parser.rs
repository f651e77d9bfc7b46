use std::path::PathBuf;

use pretty_assertions::assert_eq;
use xml_canon_core::{parse, parse_file, ParseError};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

#[test]
fn parses_attributes_empty_and_nested_elements() {
    let node = parse_file(&fixture("fixtures/left/settings.xml")).expect("parse should succeed");
    assert_eq!(node.tag, "config");
    assert_eq!(node.attributes.get("version"), Some(&"1.0".to_string()));

    let settings = node.get_child("settings").expect("settings should exist");
    assert!(settings.get_child("enabled").is_some());

    let items = node.get_child("items").expect("items should exist");
    let item_nodes = items.get_children("item");
    assert_eq!(item_nodes.len(), 2);
    assert_eq!(item_nodes[0].attributes.get("id"), Some(&"2".to_string()));
    assert_eq!(item_nodes[0].text.as_deref(), Some("second"));
}

#[test]
fn text_after_a_child_becomes_its_tail() {
    let node = parse(b"<p>lead <b>bold</b> trail <i/>end</p>").expect("parse");

    assert_eq!(node.text.as_deref(), Some("lead "));
    assert_eq!(node.children[0].text.as_deref(), Some("bold"));
    assert_eq!(node.children[0].tail.as_deref(), Some(" trail "));
    assert_eq!(node.children[1].tail.as_deref(), Some("end"));
    assert_eq!(node.tail, None);
}

#[test]
fn comments_and_instructions_are_dropped() {
    let node = parse(
        b"<?xml version=\"1.0\"?><!DOCTYPE r><r>a<!-- note -->b<?pi data?><![CDATA[<c>]]></r>",
    )
    .expect("parse");

    assert_eq!(node.text.as_deref(), Some("ab<c>"));
    assert!(node.children.is_empty());
}

#[test]
fn entities_are_unescaped_in_text_and_attributes() {
    let node = parse(br#"<r v="a &amp; b">&lt;x&gt;</r>"#).expect("parse");
    assert_eq!(node.attributes.get("v").map(String::as_str), Some("a & b"));
    assert_eq!(node.text.as_deref(), Some("<x>"));
}

#[test]
fn leading_byte_order_mark_is_ignored() {
    let node = parse(b"\xEF\xBB\xBF<r/>").expect("parse");
    assert_eq!(node.tag, "r");
}

#[test]
fn mismatched_end_tag_is_rejected() {
    let err = parse_file(&fixture("fixtures/left/broken.xml")).expect_err("should fail");
    assert!(matches!(err, ParseError::Xml(_)), "unexpected error: {err}");
}

#[test]
fn structural_problems_are_malformed() {
    for input in [
        &b"<a/><b/>"[..],
        &b"<a><b>"[..],
        &b""[..],
        &b"<a/>junk"[..],
    ] {
        let err = parse(input).expect_err("should fail");
        assert!(
            matches!(err, ParseError::Malformed(_) | ParseError::Xml(_)),
            "unexpected error for {:?}: {err}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file(&fixture("fixtures/left/does-not-exist.xml")).expect_err("should fail");
    assert!(matches!(err, ParseError::Io(_)));
}
