//! Escaping tests
//!
//! Generated markup is parsed back with html5ever; text and attribute
//! values must survive the round trip unchanged.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use repr_render::{HtmlGenerator, HtmlOptions};
use repr_tag::{H, Tag};

const NASTY: &[&str] = &[
    "a < b",
    "x > y && z",
    "\"quoted\"",
    "it's",
    "<script>alert('x')</script>",
    "&amp; already escaped",
];

fn parse(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .expect("parse")
}

fn find_element(handle: &Handle, local: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data
        && name.local.as_ref() == local
    {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, local))
}

fn text_of(handle: &Handle) -> String {
    let mut out = String::new();
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            _ => out.push_str(&text_of(child)),
        }
    }
    out
}

fn attr_of(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref() == key)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn render(tag: &Tag) -> String {
    HtmlGenerator::new(HtmlOptions::default())
        .to_string(tag)
        .expect("render")
}

#[test]
fn test_text_round_trip() {
    for &text in NASTY {
        let html = render(&H.p().with(text));
        let dom = parse(&html);
        let p = find_element(&dom.document, "p").expect("p element");
        assert_eq!(text_of(&p), text, "markup was {html}");
    }
}

#[test]
fn test_attribute_round_trip() {
    for &text in NASTY {
        let html = render(&H.span().attr("title", text));
        let dom = parse(&html);
        let span = find_element(&dom.document, "span").expect("span element");
        assert_eq!(attr_of(&span, "title").as_deref(), Some(text), "markup was {html}");
    }
}

#[test]
fn test_generic_atom_round_trip() {
    let atom = H.atom().attr("type", "str").with("<b>&\"'</b>");
    let html = render(&atom);
    let dom = parse(&html);
    let span = find_element(&dom.document, "span").expect("span element");
    assert_eq!(text_of(&span), "<b>&\"'</b>");
    assert_eq!(attr_of(&span, "class").as_deref(), Some("hreprt-str"));
}

#[test]
fn test_page_parses_with_stylesheet() {
    let body = H.div().resource(repr_render::html::stylesheet()).with("hi");
    let html = HtmlGenerator::new(HtmlOptions::default())
        .to_page(&body)
        .expect("page");
    assert!(html.starts_with("<!DOCTYPE html>"));

    let dom = parse(&html);
    let style = find_element(&dom.document, "style").expect("style element");
    assert!(text_of(&style).contains(".hrepr-bracketed"));
    let div = find_element(&dom.document, "div").expect("div element");
    assert_eq!(text_of(&div), "hi");
}
