//! Comprehensive tests for the repr engine
//!
//! End-to-end behaviour: value → tag tree → HTML or terminal text.

use std::sync::LazyLock;

use repr_engine::layout::{Doc, Overflow};
use repr_engine::render::html::STYLESHEET;
use repr_engine::tag::{AttrValue, Child, vocab};
use repr_engine::{
    Backend, EngineError, H, Handled, HandlerTable, Hrepr, HtmlOptions, Interface, Layer, Object,
    Record, ReprError, Representable, Tag, TerminalOptions, TypeInfo, Value, builtins, make,
    represent,
};

/// Install a `RUST_LOG`-filtered subscriber. Only the first test to run
/// succeeds; the others keep the one already installed.
fn init_tracing() {
    let _already_installed = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .is_err();
}

fn term(value: &Value) -> String {
    represent(value).expect("represent").to_terminal_string()
}

fn settings(pairs: &[(&str, bool)]) -> Layer {
    pairs.iter().map(|(k, v)| (k.to_string(), (*v).into())).collect()
}

fn limits(pairs: &[(&str, i64)]) -> Layer {
    pairs.iter().map(|(k, v)| (k.to_string(), (*v).into())).collect()
}

fn ints(ns: impl IntoIterator<Item = i64>) -> Value {
    Value::list(ns.into_iter().map(Value::Int))
}

fn child_tag(tag: &Tag, i: usize) -> Tag {
    tag.children()[i].as_tag().cloned().expect("tag child")
}

fn count_named(tag: &Tag, name: &str) -> usize {
    let own = usize::from(tag.name() == Some(name));
    own + tag
        .children()
        .iter()
        .filter_map(Child::as_tag)
        .map(|t| count_named(t, name))
        .sum::<usize>()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_list_of_three_ints() {
    init_tracing();
    let node = represent(&ints([1, 2, 3])).expect("represent");
    let tag = node.tag();
    assert_eq!(tag.name(), Some(vocab::BRACKETED));
    assert_eq!(tag.get_str("start"), Some("["));
    assert_eq!(tag.get_str("end"), Some("]"));
    assert_eq!(tag.children().len(), 3);
    assert_eq!(node.to_terminal_string(), "[1, 2, 3]");

    let html = node.to_html_string().expect("html");
    assert!(html.starts_with(r#"<div class="hreprt-list hrepr-bracketed">"#));
    assert!(html.contains(r#"<span class="hreprt-int">2</span>"#));
}

#[test]
fn test_self_referential_list() {
    init_tracing();
    let x = Value::list([]);
    x.append(x.clone());

    let node = represent(&x).expect("cycles terminate");
    assert_eq!(node.to_terminal_string(), "#1=[⟳1=[...]]");
    let boxed = node.tag();
    assert_eq!(boxed.name(), Some(vocab::REF));
    assert_eq!(boxed.get_attribute("num"), Some(&AttrValue::Int(1)));
    let marker = child_tag(&child_tag(boxed, 0), 0);
    assert_eq!(marker.get_attribute("loop"), Some(&AttrValue::Bool(true)));
    assert_eq!(marker.get_attribute("num"), Some(&AttrValue::Int(1)));

    let short = Interface::default()
        .represent_with(&x, settings(&[("shortrefs", true)]))
        .expect("cycles terminate");
    assert_eq!(short.to_terminal_string(), "#1=[⟳1]");

    let html = node.to_html_string().expect("html");
    assert!(html.starts_with(r#"<div class="hrepr-refbox"><span class="hrepr-ref">#1=</span>"#));
    assert!(html.contains(r#"<span class="hrepr-ref">⟳1=</span>"#));
}

#[test]
fn test_most_specific_handler_wins() {
    let mut overlay = HandlerTable::new();
    overlay.register(&builtins::INT, |_, _| Ok(make::atom("int", None).into()));
    overlay.register(&builtins::BOOL, |_, _| Ok(make::atom("bool", None).into()));
    let interface = Interface::default().with_overlay(overlay);

    let node = interface.represent(&Value::Bool(true)).expect("represent");
    assert_eq!(node.to_terminal_string(), "bool");
    let node = interface.represent(&Value::Int(7)).expect("represent");
    assert_eq!(node.to_terminal_string(), "int");
}

#[test]
fn test_repeated_sibling_is_a_reference() {
    let v = ints([1]);
    let outer = Value::list([v.clone(), v]);
    assert_eq!(term(&outer), "[#1=[1], #1=[...]]");

    let bare = Interface::default()
        .represent_with(&outer, settings(&[("shortrefs", true)]))
        .expect("represent");
    assert_eq!(bare.to_terminal_string(), "[#1=[1], #1]");

    let full = Interface::default()
        .represent_with(&outer, settings(&[("norefs", true)]))
        .expect("represent");
    assert_eq!(full.to_terminal_string(), "[[1], [1]]");
    assert_eq!(count_named(full.tag(), vocab::REF), 0);
}

#[test]
fn test_breakable_at_width_five() {
    let doc = Doc::breakable("[", [Doc::text("aaaaaaaaaa"), Doc::text("bbbbbbbbbb")], "]");
    assert_eq!(doc.render(Some(5)), "[\n    aaaaaaaaaa\n    bbbbbbbbbb\n]");
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_structural_determinism() {
    let value = Value::dict([
        (Value::str("xs"), ints([1, 2, 3])),
        (Value::str("name"), Value::str("a fairly long string value")),
    ]);
    let interface = Interface::default();
    let a = interface.represent(&value).expect("represent");
    let b = interface.represent(&value).expect("represent");
    assert_eq!(a.tag(), b.tag());
}

#[test]
fn test_reference_numbers_are_per_call() {
    let v = ints([1]);
    let outer = Value::list([v.clone(), v]);
    let interface = Interface::default();
    let first = interface.represent(&outer).expect("represent");
    let second = interface.represent(&outer).expect("represent");
    assert_eq!(first.to_terminal_string(), second.to_terminal_string());
}

#[test]
fn test_two_cycles_get_distinct_numbers() {
    let a = Value::list([]);
    let b = Value::list([]);
    a.append(a.clone());
    b.append(b.clone());
    let outer = Value::list([a, b]);
    assert_eq!(term(&outer), "[#1=[⟳1=[...]], #2=[⟳2=[...]]]");
}

#[test]
fn test_max_depth_zero_uses_short_form() {
    let node = Interface::default()
        .represent_with(&ints([1, 2]), limits(&[("max_depth", 0)]))
        .expect("represent");
    assert_eq!(node.to_terminal_string(), "[...]");
}

#[test]
fn test_sequence_truncation() {
    let interface = Interface::default().variant(limits(&[("sequence_max", 5)]));
    let node = interface.represent(&ints(0..10)).expect("represent");
    assert_eq!(node.to_terminal_string(), "[0, 1, 2, ..., 8, 9]");
}

#[test]
fn test_terminal_lines_respect_width() {
    let long = Value::str(&"x".repeat(90));
    let value = Value::list([Value::Int(1), long, ints(0..30)]);
    let options = TerminalOptions {
        max_col: Some(30),
        tabsize: 4,
        overflow: Overflow::Break,
    };
    let out = Interface::default()
        .with_terminal_options(options)
        .represent(&value)
        .expect("represent")
        .to_terminal_string();
    assert!(out.lines().count() > 3);
    for line in out.lines() {
        assert!(line.chars().count() <= 30, "line too long: {line:?}");
    }
}

#[test]
fn test_resources_hoisted_once() {
    let css = H.style().with(".hit { color: red; }");
    let interface = Interface::default().with_postprocess(move |tag: Tag, value: &Value, _: &mut Hrepr| {
        match value {
            Value::Int(_) => tag.class("hit").resource(css.clone()),
            _ => tag,
        }
    });
    let page = interface.page(&ints([1, 2, 3])).expect("page");
    assert_eq!(page.matches(".hit { color: red; }").count(), 1);
    assert_eq!(page.matches(".hrepr-bracketed {").count(), 1);
    assert_eq!(page.matches(r#"class="hreprt-int hit""#).count(), 3);
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(STYLESHEET));
}

#[test]
fn test_string_cutoff_boundary() {
    init_tracing();
    let at = Value::str(&"x".repeat(20));
    let x20 = "x".repeat(20);
    assert_eq!(term(&Value::list([at.clone(), at])), format!("['{x20}', '{x20}']"));

    let over = Value::str(&"x".repeat(21));
    assert_eq!(
        term(&Value::list([over.clone(), over])),
        format!("[#1='{}', #1='{}...']", "x".repeat(21), "x".repeat(17))
    );
}

#[test]
fn test_bytes_cutoff_boundary() {
    let at = Value::bytes(&[7u8; 20]);
    assert_eq!(
        term(&Value::list([at.clone(), at])),
        "[07070707070707070..., 07070707070707070...]"
    );

    let over = Value::bytes(&[7u8; 21]);
    assert_eq!(
        term(&Value::list([over.clone(), over])),
        format!("[#1={}, #1=07070707070707070...]", "07".repeat(21))
    );
}

#[test]
fn test_resources_of_resources_reach_the_page() {
    let script = H.script().resource(H.style().with(".inner{}")).with("var x;");
    let interface = Interface::default().with_postprocess(move |tag: Tag, value: &Value, _: &mut Hrepr| {
        match value {
            Value::Int(_) => tag.resource(script.clone()),
            _ => tag,
        }
    });
    let page = interface.page(&ints([1, 2])).expect("page");
    assert_eq!(page.matches("<script>var x;</script>").count(), 1);
    assert_eq!(page.matches("<style>.inner{}</style>").count(), 1);
}

#[test]
fn test_attribute_pointing_at_representation_tag() {
    let target = make::atom(1, Some("int"));
    let value = Value::Tag(H.div().with((H.a().attr("href", target.clone()), target.clone())));
    let html = represent(&value)
        .expect("represent")
        .to_html_string()
        .expect("html");
    let id = target.id().expect("id allocated");
    assert!(html.contains(&format!(r##"<a href="#{id}"></a>"##)));
    assert!(html.contains(&format!(r#"<span class="hreprt-int" id="{id}">1</span>"#)));
}

#[test]
fn test_html_escapes_strings() {
    let node = represent(&Value::str("<b>\"x\" & 'y'</b> and then some")).expect("represent");
    let html = node.to_html_string().expect("html");
    assert!(html.contains("&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
}

// ============================================================================
// EXTENSION POINTS
// ============================================================================

static TEMPERATURE: LazyLock<TypeInfo> =
    LazyLock::new(|| TypeInfo::new("Temperature").in_module("weather"));
static HANDLE: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("Handle").in_module("io"));

struct Temperature(f64);

impl Object for Temperature {
    fn type_info(&self) -> TypeInfo {
        TEMPERATURE.clone()
    }

    fn as_representable(&self) -> Option<&dyn Representable> {
        Some(self)
    }
}

impl Representable for Temperature {
    fn represent(&self, _hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
        Ok(H.span().class("temperature").with(format!("{:.1}°C", self.0)).into())
    }

    fn resources(&self) -> Vec<Tag> {
        vec![H.style().with(".temperature { color: teal; }")]
    }
}

struct Handle(u32);

impl Object for Handle {
    fn type_info(&self) -> TypeInfo {
        HANDLE.clone()
    }

    fn describe(&self) -> Option<String> {
        Some(format!("fd={}", self.0))
    }
}

#[test]
fn test_representable_object() {
    let value = Value::object(Temperature(21.5));
    let node = represent(&value).expect("represent");
    assert_eq!(node.to_terminal_string(), "21.5°C");
    assert_eq!(node.to_html_string().expect("html"), r#"<span class="temperature">21.5°C</span>"#);
    let page = node.to_page_string().expect("page");
    assert!(page.contains(".temperature { color: teal; }"));
}

#[test]
fn test_registration_beats_representable() {
    let mut overlay = HandlerTable::new();
    overlay.register(&TEMPERATURE, |value, _| {
        let celsius = value.downcast_ref::<Temperature>().map_or(0.0, |t| t.0);
        Ok(make::atom(format!("{:.0}F", celsius * 9.0 / 5.0 + 32.0), None).into())
    });
    let node = Interface::default()
        .with_overlay(overlay)
        .represent(&Value::object(Temperature(100.0)))
        .expect("represent");
    assert_eq!(node.to_terminal_string(), "212F");
}

#[test]
fn test_generic_default() {
    let handle = Value::object(Handle(3));
    assert_eq!(term(&handle), "<io.Handle fd=3>");

    let twice = Value::list([handle.clone(), handle]);
    assert_eq!(term(&twice), "[#1=<io.Handle fd=3>, #1=<io.Handle fd=3>]");
}

#[test]
fn test_record_instance() {
    let point = TypeInfo::new("Point");
    let value = Value::record(Record::new(point).field("x", 1).field("y", 2));
    assert_eq!(term(&value), "Point(x=1, y=2)");

    let html = represent(&value).expect("represent").to_html_string().expect("html");
    assert!(html.starts_with(r#"<div class="hrepr-instance hreprl-v hreprt-Point">"#));
    assert!(html.contains(r#"<div class="hrepr-title">Point</div>"#));
}

#[test]
fn test_represent_all_shares_references() {
    let shared = ints([1, 2]);
    let node = Interface::default()
        .represent_all(&[shared.clone(), shared])
        .expect("represent");
    assert_eq!(node.tag().name(), Some("inline"));
    assert_eq!(count_named(node.tag(), vocab::REF), 2);
    assert_eq!(node.to_terminal_string(), "#1=[1, 2]#1=[...]");
}

#[test]
fn test_preprocess_hook() {
    let interface = Interface::default().with_preprocess(|value: Value, _: &mut Hrepr| match value {
        Value::Int(n) if n < 0 => Value::str("negative"),
        other => other,
    });
    let node = interface.represent(&ints([1, -1])).expect("represent");
    assert_eq!(node.to_terminal_string(), "[1, 'negative']");
}

#[test]
fn test_backend_selection() {
    let value = ints([1]);
    let html = Interface::default().represent(&value).expect("represent");
    assert!(html.render().expect("render").starts_with("<div"));

    let text = Interface::default()
        .with_backend(Backend::Terminal)
        .represent(&value)
        .expect("represent");
    assert_eq!(text.render().expect("render"), "[1]");
}

#[test]
fn test_pretty_html() {
    let node = Interface::default()
        .with_html_options(HtmlOptions::pretty(40))
        .represent(&ints(0..20))
        .expect("represent");
    let html = node.to_html_string().expect("html");
    assert!(html.lines().count() > 1);
    assert!(html.lines().any(|line| line.starts_with("    ")));
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_handler_returning_text_names_the_type() {
    let mut overlay = HandlerTable::new();
    overlay.register(&builtins::LIST, |_, _| Ok(Handled::Node(Child::Text("bad".into()))));
    let err = Interface::default()
        .with_overlay(overlay)
        .represent(&ints([1]))
        .expect_err("text is not a tag");
    assert!(matches!(&err, EngineError::Repr(ReprError::NotATag { type_name, .. }) if type_name == "list"));
    assert!(err.to_string().contains("list"));
}

#[test]
fn test_custom_handler_error() {
    let mut overlay = HandlerTable::new();
    overlay.register(&builtins::DICT, |value, _| {
        Err(ReprError::handler(&value.type_info(), "dicts are not allowed here"))
    });
    let err = Interface::default()
        .with_overlay(overlay)
        .represent(&Value::dict([]))
        .expect_err("handler fails");
    assert_eq!(
        err.to_string(),
        "Representation error: Handler for dict failed: dicts are not allowed here"
    );
}

#[test]
fn test_void_tag_with_children_fails_to_render() {
    let node = represent(&Value::Tag(H.br().with("x"))).expect("represent");
    let err = node.to_html_string().expect_err("void tags have no children");
    assert!(matches!(err, EngineError::Render(_)));
    assert_eq!(node.to_terminal_string(), "x");
}
