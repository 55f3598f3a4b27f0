//! HTML backend
//!
//! Generic representation tags are first rewritten into plain `div`/`span`/
//! `table` trees by a translation table keyed on tag name, then serialized
//! through the layout engine so the same tree can come out minified or
//! indented.

use std::collections::{HashMap, HashSet};

use repr_layout::{Context, Doc, Overflow};
use repr_tag::{AttrValue, Child, Fill, H, Tag, vocab};

use crate::RenderError;

/// Serialization options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    /// `None` renders everything on one line.
    pub max_col: Option<usize>,
    pub tabsize: usize,
    pub overflow: Overflow,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            max_col: None,
            tabsize: 4,
            overflow: Overflow::Allow,
        }
    }
}

impl HtmlOptions {
    /// Indented output wrapping at `max_col`.
    pub fn pretty(max_col: usize) -> Self {
        Self {
            max_col: Some(max_col),
            ..Self::default()
        }
    }

    fn context(&self) -> Context {
        Context::new()
            .with_max_col(self.max_col)
            .with_tabsize(self.tabsize)
            .with_overflow(self.overflow)
    }
}

/// Rewrites one generic tag into backend markup.
pub type Rule = fn(&Tag) -> Tag;

/// HTML generator
///
/// Keeps the set of resources already emitted by [`HtmlGenerator::generate`],
/// so successive fragments share stylesheets.
pub struct HtmlGenerator {
    rules: HashMap<String, Rule>,
    options: HtmlOptions,
    seen: HashSet<Tag>,
}

impl Default for HtmlGenerator {
    fn default() -> Self {
        Self::new(HtmlOptions::default())
    }
}

impl HtmlGenerator {
    /// Generator with the standard translation table.
    pub fn new(options: HtmlOptions) -> Self {
        let mut generator = Self::bare(options);
        generator
            .register(vocab::ATOM, translate_atom)
            .register(vocab::DEFN, translate_defn)
            .register(vocab::PAIR, translate_pair)
            .register(vocab::BRACKETED, translate_bracketed)
            .register(vocab::INSTANCE, translate_instance)
            .register(vocab::REF, translate_ref);
        generator
    }

    /// Generator without any translation rules.
    pub fn bare(options: HtmlOptions) -> Self {
        Self {
            rules: HashMap::new(),
            options,
            seen: HashSet::new(),
        }
    }

    pub fn register(&mut self, name: &str, rule: Rule) -> &mut Self {
        self.rules.insert(name.to_string(), rule);
        self
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// Layout document for `tag`. Resources are not included.
    pub fn to_doc(&self, tag: &Tag) -> Result<Doc, RenderError> {
        self.process(tag)
    }

    /// Markup for `tag` alone. Resources are not included.
    pub fn to_string(&self, tag: &Tag) -> Result<String, RenderError> {
        let doc = self.process(tag)?;
        Ok(doc.to_string_with(&self.options.context()))
    }

    /// A full document with every resource of `tag` hoisted into `<head>`.
    pub fn to_page(&self, tag: &Tag) -> Result<String, RenderError> {
        let resources = tag.collect_resources();
        tracing::debug!(resources = resources.len(), "generating page");
        self.to_string(&page(tag, resources))
    }

    /// Markup for `tag`, preceded by the resources this generator has not
    /// emitted yet.
    pub fn generate(&mut self, tag: &Tag) -> Result<String, RenderError> {
        let fresh: Vec<Tag> = tag
            .collect_resources()
            .into_iter()
            .filter(|r| self.seen.insert(r.clone()))
            .collect();
        tracing::trace!(fresh = fresh.len(), "hoisting resources");
        self.to_string(&H.inline().with(fresh).with(tag))
    }

    fn process(&self, tag: &Tag) -> Result<Doc, RenderError> {
        if let Some(rule) = tag.name().and_then(|name| self.rules.get(name)) {
            // The translated node stands in for `tag`, so it takes over its id.
            let translated = match tag.allocated_id() {
                Some(id) => rule(tag).fill(Fill::new().attribute("id", id)),
                None => rule(tag),
            };
            tag.mark_serialized();
            return self.process(&translated);
        }

        if tag.is_virtual() {
            let children = self.children(tag, tag.is_raw())?;
            return Ok(Doc::group(children));
        }

        let name = tag.name().unwrap_or_default();
        let attributes = self.attributes(tag)?;
        tag.mark_serialized();

        if tag.is_void() {
            if !tag.children().is_empty() {
                return Err(RenderError::VoidWithChildren {
                    tag: name.to_string(),
                });
            }
            return Ok(Doc::text(format!("<{name}{attributes} />")));
        }

        let children = self.children(tag, tag.is_raw())?;
        Ok(Doc::breakable(
            format!("<{name}{attributes}>"),
            children,
            format!("</{name}>"),
        ))
    }

    fn children(&self, tag: &Tag, raw: bool) -> Result<Vec<Doc>, RenderError> {
        tag.children()
            .iter()
            .map(|child| match child {
                Child::Tag(tag) => self.process(tag),
                Child::Text(text) if raw => Ok(Doc::text(text.as_str())),
                other => Ok(Doc::text(escape(&other.to_text().unwrap_or_default()))),
            })
            .collect()
    }

    fn attributes(&self, tag: &Tag) -> Result<String, RenderError> {
        let mut out = String::new();
        for (key, value) in tag.attributes() {
            let text = match value {
                AttrValue::Bool(false) => continue,
                AttrValue::Bool(true) => {
                    out.push(' ');
                    out.push_str(key);
                    continue;
                }
                AttrValue::Ref(target) => {
                    let id = target.ensure_id().map_err(|_| RenderError::MissingId {
                        tag: target.name().unwrap_or("<virtual>").to_string(),
                    })?;
                    format!("#{id}")
                }
                AttrValue::Opaque(object) => object.embed(key)?,
                other => other.to_text().unwrap_or_default(),
            };
            push_attribute(&mut out, key, &text);
        }
        if let Some(id) = tag.allocated_id() {
            push_attribute(&mut out, "id", id);
        }
        Ok(out)
    }
}

fn push_attribute(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

/// Escape text for use in HTML content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `body` in a minimal document with `resources` in the head.
pub fn page(body: &Tag, resources: Vec<Tag>) -> Tag {
    let meta = H
        .meta()
        .attr("http-equiv", "Content-type")
        .attr("content", "text/html")
        .attr("charset", "UTF-8");
    H.inline().with((
        H.raw().with("<!DOCTYPE html>"),
        H.html().with((
            H.head().with(meta).with(resources),
            H.body().with(body),
        )),
    ))
}

/// Stylesheet for the markup produced by the standard translation table.
pub const STYLESHEET: &str = "\
.hrepr-bracketed { display: inline-flex; align-items: flex-start; }
.hrepr-open, .hrepr-close { font-weight: bold; }
.hrepr-body { display: inline-flex; gap: 0.5em; }
.hreprl-h { flex-direction: row; flex-wrap: wrap; }
.hreprl-v { flex-direction: column; }
.hreprl-s { flex-direction: row; }
table.hrepr-body { display: inline-table; border-collapse: collapse; }
table.hrepr-body td { padding: 0 0.25em; vertical-align: top; }
.hrepr-instance { display: inline-flex; flex-direction: column; border: 1px solid #bbb; }
.hrepr-instance.hreprl-s { flex-direction: row; border: none; }
.hrepr-title { font-weight: bold; padding: 0 0.25em; }
.hrepr-delim { color: #888; }
.hrepr-refbox { display: inline-flex; align-items: flex-start; }
.hrepr-ref { color: #7c3aed; font-weight: bold; }
.hrepr-ellipsis { color: #888; }
.hrepr-defn-key { color: #2563eb; font-weight: bold; }
.hreprt-str { color: #16a34a; white-space: pre; }
.hreprt-bytes { color: #0d9488; }
.hreprt-int, .hreprt-float { color: #ea580c; }
.hreprv-True, .hreprv-False, .hreprv-None { color: #9333ea; }
";

/// The standard stylesheet as a `<style>` resource.
pub fn stylesheet() -> Tag {
    H.style().with(STYLESHEET)
}

fn type_class(tag: &Tag) -> Option<String> {
    tag.get_str("type").map(|ty| format!("hreprt-{ty}"))
}

fn layout_of(tag: &Tag) -> &str {
    tag.get_str("layout").unwrap_or("h")
}

fn with_classes(tag: Tag, classes: &[Option<String>]) -> Tag {
    tag.classes(classes.iter().flatten().map(String::as_str))
}

/// Copy the attributes a rule did not consume, and the resources, onto
/// the translated tag. Classes merge with the ones the rule set.
fn carry(src: &Tag, out: Tag, consumed: &[&str]) -> Tag {
    let mut out = out;
    for (key, value) in src.attributes() {
        if consumed.contains(&key.as_str()) {
            continue;
        }
        out = match (key.as_str(), value.as_tokens()) {
            ("class", Some(tokens)) => out.classes(tokens.iter().map(String::as_str)),
            _ => out.fill(Fill::new().attribute(key.clone(), value.clone())),
        };
    }
    out.fill(Fill::new().resources(src.resources().iter().cloned()))
}

fn wrap_each(children: &[Child]) -> Vec<Tag> {
    children
        .iter()
        .map(|child| H.div().with(child.clone()))
        .collect()
}

fn delimiter(pair: &Tag, default: &str) -> String {
    pair.get_str("delimiter").unwrap_or(default).to_string()
}

/// One row per pair, `key | delimiter | value`. Other children span the row.
fn table(children: &[Child]) -> Tag {
    let rows: Vec<Tag> = children
        .iter()
        .map(|child| match child.as_tag() {
            Some(pair) if pair.name() == Some(vocab::PAIR) && pair.children().len() == 2 => {
                let cells = pair.children();
                H.tr().with((
                    H.td().with(cells[0].clone()),
                    H.td().with(H.span().class("hrepr-delim").with(delimiter(pair, ": "))),
                    H.td().with(cells[1].clone()),
                ))
            }
            _ => H.tr().with(H.td().attr("colspan", 3).with(child.clone())),
        })
        .collect();
    H.table().class("hrepr-body").with(rows)
}

fn all_pairs(children: &[Child]) -> bool {
    children.iter().any(|c| c.as_tag().is_some_and(|t| t.name() == Some(vocab::PAIR)))
        && children.iter().all(|c| match c.as_tag() {
            Some(t) => t.name() == Some(vocab::PAIR) || t.has_class("hrepr-ellipsis"),
            None => false,
        })
}

fn body(tag: &Tag) -> Tag {
    let layout = layout_of(tag);
    let children = tag.children();
    if layout == "v" && all_pairs(children) {
        return table(children);
    }
    H.div()
        .classes([format!("hreprl-{layout}").as_str(), "hrepr-body"])
        .with(wrap_each(children))
}

fn translate_atom(tag: &Tag) -> Tag {
    let value_class = tag.get_str("value").map(|v| format!("hreprv-{v}"));
    let out = with_classes(H.span(), &[type_class(tag), value_class]);
    carry(tag, out.with(tag.children().to_vec()), &["type", "value"])
}

fn translate_defn(tag: &Tag) -> Tag {
    let children = tag.children();
    let key = children.first().and_then(Child::to_text).unwrap_or_default();
    let out = H
        .span()
        .class(&format!("hreprk-{key}"))
        .with((
            H.span().class("hrepr-defn-key").with(children.first().cloned()),
            " ",
            H.span().class("hrepr-defn-name").with(children.get(1).cloned()),
        ));
    carry(tag, out, &[])
}

fn translate_pair(tag: &Tag) -> Tag {
    let children = tag.children();
    let out = H.span().class("hrepr-pair").with((
        children.first().cloned(),
        H.span().class("hrepr-delim").with(delimiter(tag, ": ")),
        children.get(1).cloned(),
    ));
    carry(tag, out, &["delimiter"])
}

fn translate_bracketed(tag: &Tag) -> Tag {
    let out = with_classes(H.div(), &[type_class(tag), Some("hrepr-bracketed".into())]).with((
        H.div().class("hrepr-open").with(tag.get_str("start").unwrap_or("(")),
        body(tag),
        H.div().class("hrepr-close").with(tag.get_str("end").unwrap_or(")")),
    ));
    carry(tag, out, &["type", "start", "end", "delimiter", "layout"])
}

fn translate_instance(tag: &Tag) -> Tag {
    let layout = layout_of(tag);
    let title = tag.get_str("type").unwrap_or("<object>");
    let out = with_classes(
        H.div(),
        &[
            Some("hrepr-instance".into()),
            Some(format!("hreprl-{layout}")),
            type_class(tag),
        ],
    )
    .with((H.div().class("hrepr-title").with(title), body(tag)));
    carry(tag, out, &["type", "start", "end", "delimiter", "layout"])
}

fn translate_ref(tag: &Tag) -> Tag {
    let is_loop = tag.get_attribute("loop").and_then(AttrValue::as_bool) == Some(true);
    let sym = if is_loop { "⟳" } else { "#" };
    let num = tag
        .get_attribute("num")
        .and_then(AttrValue::to_text)
        .unwrap_or_else(|| "?".to_string());
    let marker = H.span().class("hrepr-ref").with((sym, num));
    let out = if tag.children().is_empty() {
        marker
    } else {
        H.div()
            .class("hrepr-refbox")
            .with((marker.with("="), tag.children().to_vec()))
    };
    carry(tag, out, &["num", "loop"])
}
