//! Terminal backend
//!
//! Lowers generic representation tags straight to layout documents:
//! `[1, 2, 3]`, `Point(x=1, y=2)`, `#1=[⟳1=[...]]`. Any other tag
//! contributes the concatenation of its children.

use std::collections::HashMap;

use repr_layout::{Context, Doc, Overflow, join};
use repr_tag::{AttrValue, Child, Tag, vocab};

/// Terminal layout options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalOptions {
    pub max_col: Option<usize>,
    pub tabsize: usize,
    pub overflow: Overflow,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            max_col: Some(80),
            tabsize: 4,
            overflow: Overflow::Allow,
        }
    }
}

impl TerminalOptions {
    fn context(&self) -> Context {
        Context::new()
            .with_max_col(self.max_col)
            .with_tabsize(self.tabsize)
            .with_overflow(self.overflow)
    }
}

/// Lowers one generic tag to a layout document.
pub type TermRule = fn(&TermGenerator, &Tag) -> Doc;

/// Terminal generator
pub struct TermGenerator {
    rules: HashMap<String, TermRule>,
    options: TerminalOptions,
}

impl Default for TermGenerator {
    fn default() -> Self {
        Self::new(TerminalOptions::default())
    }
}

impl TermGenerator {
    pub fn new(options: TerminalOptions) -> Self {
        let mut rules: HashMap<String, TermRule> = HashMap::new();
        rules.insert(vocab::ATOM.into(), term_atom);
        rules.insert(vocab::DEFN.into(), term_defn);
        rules.insert(vocab::PAIR.into(), term_pair);
        rules.insert(vocab::BRACKETED.into(), term_bracketed);
        rules.insert(vocab::INSTANCE.into(), term_instance);
        rules.insert(vocab::REF.into(), term_ref);
        Self { rules, options }
    }

    pub fn register(&mut self, name: &str, rule: TermRule) -> &mut Self {
        self.rules.insert(name.to_string(), rule);
        self
    }

    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    pub fn to_doc(&self, tag: &Tag) -> Doc {
        match tag.name().and_then(|name| self.rules.get(name)) {
            Some(rule) => rule(self, tag),
            None => Doc::sequence(self.children(tag)),
        }
    }

    pub fn to_string(&self, tag: &Tag) -> String {
        self.to_doc(tag).to_string_with(&self.options.context())
    }

    pub fn child(&self, child: &Child) -> Doc {
        match child {
            Child::Tag(tag) => self.to_doc(tag),
            other => Doc::text(other.to_text().unwrap_or_default()),
        }
    }

    pub fn children(&self, tag: &Tag) -> Vec<Doc> {
        tag.children().iter().map(|c| self.child(c)).collect()
    }
}

fn attr_or<'a>(tag: &'a Tag, key: &str, default: &'a str) -> &'a str {
    tag.get_str(key).unwrap_or(default)
}

fn plain_text(tag: &Tag) -> String {
    tag.children()
        .iter()
        .filter_map(Child::to_text)
        .collect()
}

/// Single-quoted string literal.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "\\'"))
}

fn term_atom(generator: &TermGenerator, tag: &Tag) -> Doc {
    if tag.get_str("type") == Some("str") {
        Doc::text(quote(&plain_text(tag)))
    } else {
        Doc::sequence(generator.children(tag))
    }
}

fn term_defn(generator: &TermGenerator, tag: &Tag) -> Doc {
    Doc::sequence(join(generator.children(tag), " "))
}

fn term_pair(generator: &TermGenerator, tag: &Tag) -> Doc {
    let children = generator.children(tag);
    let delimiter = attr_or(tag, "delimiter", ": ");
    let mut parts = children.into_iter();
    let key = parts.next().unwrap_or_else(|| Doc::text(""));
    let value = parts.next().unwrap_or_else(|| Doc::text(""));
    Doc::sequence([key, Doc::text(delimiter), value])
}

fn term_bracketed(generator: &TermGenerator, tag: &Tag) -> Doc {
    Doc::breakable(
        attr_or(tag, "start", "("),
        join(generator.children(tag), attr_or(tag, "delimiter", ", ")),
        attr_or(tag, "end", ")"),
    )
}

fn term_instance(generator: &TermGenerator, tag: &Tag) -> Doc {
    let title = Doc::sequence([attr_or(tag, "type", "<object>"), attr_or(tag, "start", "(")]);
    Doc::breakable(
        title,
        join(generator.children(tag), attr_or(tag, "delimiter", ", ")),
        attr_or(tag, "end", ")"),
    )
}

fn term_ref(generator: &TermGenerator, tag: &Tag) -> Doc {
    let is_loop = tag.get_attribute("loop").and_then(AttrValue::as_bool) == Some(true);
    let num = tag
        .get_attribute("num")
        .and_then(AttrValue::to_text)
        .unwrap_or_else(|| "-1".to_string());
    let marker = Doc::text(format!("{}{num}", if is_loop { "⟳" } else { "#" }));
    if tag.children().is_empty() {
        marker
    } else {
        let mut parts = vec![marker, Doc::text("=")];
        parts.extend(generator.children(tag));
        Doc::sequence(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repr_tag::H;

    fn term(tag: &Tag) -> String {
        TermGenerator::default().to_string(tag)
    }

    fn int(n: i64) -> Tag {
        H.atom().attr("type", "int").with(n)
    }

    #[test]
    fn test_atoms() {
        assert_eq!(term(&int(3)), "3");
        assert_eq!(term(&H.atom().attr("type", "str").with("it's")), r"'it\'s'");
        assert_eq!(term(&H.atom().attr("value", "None").with("None")), "None");
    }

    #[test]
    fn test_bracketed_and_pairs() {
        let list = H.bracketed().attr("start", "[").attr("end", "]").with((int(1), int(2)));
        assert_eq!(term(&list), "[1, 2]");

        let pair = H.pair().with((int(1), int(2)));
        let dict = H.bracketed().attr("start", "{").attr("end", "}").with(pair);
        assert_eq!(term(&dict), "{1: 2}");
    }

    #[test]
    fn test_instance_and_defn() {
        let field = |k: &str, v: i64| {
            H.pair().attr("delimiter", "=").with((H.atom().attr("type", "symbol").with(k), int(v)))
        };
        let point = H.instance().attr("type", "Point").with((field("x", 1), field("y", 2)));
        assert_eq!(term(&point), "Point(x=1, y=2)");
        assert_eq!(term(&H.defn().with(("function", "foo"))), "function foo");
    }

    #[test]
    fn test_refs() {
        let ellipsis = H.span().class("hrepr-ellipsis").with("...");
        let preview = H.bracketed().attr("start", "[").attr("end", "]").with(ellipsis);
        let looped = H.reference().attr("num", 1).attr("loop", true).with(preview);
        let outer = H.bracketed().attr("start", "[").attr("end", "]").with(looped);
        let boxed = H.reference().attr("num", 1).with(outer);
        assert_eq!(term(&boxed), "#1=[⟳1=[...]]");
        assert_eq!(term(&H.reference().attr("num", 4)), "#4");
    }

    #[test]
    fn test_breaks_long_lists() {
        let items: Vec<Tag> = (0..30).map(int).collect();
        let list = H.bracketed().attr("start", "[").attr("end", "]").with(items);
        let narrow = TermGenerator::new(TerminalOptions {
            max_col: Some(20),
            ..TerminalOptions::default()
        });
        let out = narrow.to_string(&list);
        assert!(out.starts_with("[\n    0, \n    1, "));
        assert!(out.ends_with("\n    29\n]"));
    }
}
