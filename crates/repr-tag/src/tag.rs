//! The Tag node

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::{AttrValue, Child, IntoChildren, TagError, gensym};

/// Self-closing elements. They never have children.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr", "!DOCTYPE",
];

/// Elements whose text children are emitted unescaped.
const RAW_TAGS: &[&str] = &["raw", "script", "style"];

/// Pseudo-tags that only contribute their children. `None` is virtual too.
const VIRTUAL_TAGS: &[&str] = &["inline", "raw"];

/// A markup node
///
/// Cloning is cheap: the node data is shared. All derivations return a
/// new `Tag` and leave `self` untouched.
#[derive(Clone)]
pub struct Tag(Arc<TagData>);

struct TagData {
    name: Option<String>,
    attributes: Vec<(String, AttrValue)>,
    children: Vec<Child>,
    resources: Vec<Tag>,
    /// Identifier allocated on demand by [`Tag::ensure_id`].
    auto_id: OnceLock<String>,
    serialized: AtomicBool,
}

/// Additions for [`Tag::fill`]
#[derive(Debug, Clone, Default)]
pub struct Fill {
    pub children: Vec<Child>,
    pub attributes: Vec<(String, AttrValue)>,
    pub resources: Vec<Tag>,
}

impl Fill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(mut self, children: impl IntoChildren) -> Self {
        children.push_into(&mut self.children);
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn resources<I: IntoIterator<Item = Tag>>(mut self, resources: I) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty() && self.resources.is_empty()
    }
}

impl Tag {
    fn from_parts(
        name: Option<String>,
        attributes: Vec<(String, AttrValue)>,
        children: Vec<Child>,
        resources: Vec<Tag>,
        auto_id: OnceLock<String>,
    ) -> Self {
        Tag(Arc::new(TagData {
            name,
            attributes,
            children,
            resources,
            auto_id,
            serialized: AtomicBool::new(false),
        }))
    }

    /// Empty tag with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(Some(name.into()), Vec::new(), Vec::new(), Vec::new(), OnceLock::new())
    }

    /// Nameless tag. Only its children are rendered.
    pub fn virtual_tag() -> Self {
        Self::from_parts(None, Vec::new(), Vec::new(), Vec::new(), OnceLock::new())
    }

    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn attributes(&self) -> &[(String, AttrValue)] {
        &self.0.attributes
    }

    pub fn children(&self) -> &[Child] {
        &self.0.children
    }

    pub fn resources(&self) -> &[Tag] {
        &self.0.resources
    }

    pub fn get_attribute(&self, key: &str) -> Option<&AttrValue> {
        self.0
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// String value of an attribute, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get_attribute(key).and_then(AttrValue::as_str)
    }

    pub fn has_class(&self, token: &str) -> bool {
        self.get_attribute("class")
            .is_some_and(|v| v.has_token(token))
    }

    pub fn is_virtual(&self) -> bool {
        self.name().is_none_or(|name| VIRTUAL_TAGS.contains(&name))
    }

    pub fn is_void(&self) -> bool {
        self.name().is_some_and(|name| VOID_TAGS.contains(&name))
    }

    pub fn is_raw(&self) -> bool {
        self.name().is_some_and(|name| RAW_TAGS.contains(&name))
    }

    /// Derive a tag with extra children, attributes and resources.
    ///
    /// Attributes replace existing ones with the same key in place; new
    /// keys are appended. Resources already present are skipped. When
    /// nothing changes, the same node is returned.
    pub fn fill(&self, fill: Fill) -> Tag {
        let new_resources: Vec<Tag> = {
            let mut out: Vec<Tag> = Vec::new();
            for r in fill.resources {
                if !self.0.resources.contains(&r) && !out.contains(&r) {
                    out.push(r);
                }
            }
            out
        };
        if fill.children.is_empty() && fill.attributes.is_empty() && new_resources.is_empty() {
            return self.clone();
        }

        let mut attributes = self.0.attributes.clone();
        for (key, value) in fill.attributes {
            match attributes.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => attributes.push((key, value)),
            }
        }

        let mut children = self.0.children.clone();
        children.extend(fill.children);

        let mut resources = self.0.resources.clone();
        resources.extend(new_resources);

        Self::from_parts(
            self.0.name.clone(),
            attributes,
            children,
            resources,
            self.0.auto_id.clone(),
        )
    }

    /// Copy of this node with different children. Attributes, resources and
    /// any allocated id are kept.
    pub fn replace_children(&self, children: Vec<Child>) -> Tag {
        Self::from_parts(
            self.0.name.clone(),
            self.0.attributes.clone(),
            children,
            self.0.resources.clone(),
            self.0.auto_id.clone(),
        )
    }

    /// Set an attribute. Underscores in `key` become dashes.
    pub fn attr(&self, key: &str, value: impl Into<AttrValue>) -> Tag {
        self.fill(Fill::new().attribute(key.replace('_', "-"), value))
    }

    /// Append children, flattening nested collections.
    pub fn with(&self, children: impl IntoChildren) -> Tag {
        self.fill(Fill::new().children(children))
    }

    /// Attach a resource that must be emitted once wherever this node appears.
    pub fn resource(&self, resource: Tag) -> Tag {
        self.fill(Fill::new().resources([resource]))
    }

    /// Add a class token. A token starting with `#` sets the `id` instead.
    pub fn class(&self, token: &str) -> Tag {
        self.classes([token])
    }

    /// Add several class tokens. For `#` tokens the last one wins.
    pub fn classes<'a, I: IntoIterator<Item = &'a str>>(&self, tokens: I) -> Tag {
        let mut class: Vec<String> = self
            .get_attribute("class")
            .and_then(AttrValue::as_tokens)
            .map(<[String]>::to_vec)
            .unwrap_or_default();
        let mut id = None;
        let mut added = false;
        for token in tokens {
            if let Some(rest) = token.strip_prefix('#') {
                id = Some(rest.to_string());
            } else if !class.iter().any(|c| c == token) {
                class.push(token.to_string());
                added = true;
            }
        }
        let mut fill = Fill::new();
        if added {
            fill = fill.attribute("class", AttrValue::Tokens(class));
        }
        if let Some(id) = id {
            fill = fill.attribute("id", id);
        }
        self.fill(fill)
    }

    /// The element id: the `id` attribute, or a previously allocated one.
    pub fn id(&self) -> Option<String> {
        if let Some(id) = self.get_attribute("id").and_then(AttrValue::to_text) {
            return Some(id);
        }
        self.0.auto_id.get().cloned()
    }

    /// The element id, allocating a fresh one if the node has none.
    ///
    /// Fails once the node has been serialized without an id.
    pub fn ensure_id(&self) -> Result<String, TagError> {
        if let Some(id) = self.id() {
            return Ok(id);
        }
        if self.is_serialized() {
            return Err(TagError::IdAfterSerialization {
                tag: self.name().unwrap_or("<virtual>").to_string(),
            });
        }
        let id = self.0.auto_id.get_or_init(gensym::next_id).clone();
        tracing::trace!(tag = ?self.name(), %id, "allocated element id");
        Ok(id)
    }

    /// Id allocated by [`Tag::ensure_id`], which is not an attribute.
    pub fn allocated_id(&self) -> Option<&str> {
        if self.get_attribute("id").is_some() {
            return None;
        }
        self.0.auto_id.get().map(String::as_str)
    }

    pub fn mark_serialized(&self) {
        self.0.serialized.store(true, Ordering::Release);
    }

    pub fn is_serialized(&self) -> bool {
        self.0.serialized.load(Ordering::Acquire)
    }

    /// Identity of this node (not of its contents).
    pub fn ptr_id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    pub fn ptr_eq(&self, other: &Tag) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Resources of this node and all descendants, in depth-first
    /// discovery order, without duplicates. Resources needed by a
    /// resource follow it.
    pub fn collect_resources(&self) -> Vec<Tag> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_into(&mut seen, &mut out);
        out
    }

    fn collect_into(&self, seen: &mut HashSet<Tag>, out: &mut Vec<Tag>) {
        for r in self.resources() {
            if seen.insert(r.clone()) {
                out.push(r.clone());
                r.collect_into(seen, out);
            }
        }
        for child in self.children() {
            if let Child::Tag(tag) = child {
                tag.collect_into(seen, out);
            }
        }
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (a, b) = (&self.0, &other.0);
        a.name == b.name
            && a.attributes.len() == b.attributes.len()
            && a.attributes
                .iter()
                .all(|(k, v)| other.get_attribute(k) == Some(v))
            && a.children == b.children
            && a.resources.len() == b.resources.len()
            && a.resources.iter().all(|r| b.resources.contains(r))
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        let mut attributes: Vec<&(String, AttrValue)> = self.0.attributes.iter().collect();
        attributes.sort_by(|a, b| a.0.cmp(&b.0));
        attributes.hash(state);
        self.0.children.hash(state);
        self.0.resources.len().hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Tag");
        s.field("name", &self.0.name);
        if !self.0.attributes.is_empty() {
            s.field("attributes", &self.0.attributes);
        }
        if !self.0.children.is_empty() {
            s.field("children", &self.0.children);
        }
        if !self.0.resources.is_empty() {
            s.field("resources", &self.0.resources.len());
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::H;

    #[test]
    fn test_derivation_leaves_original_untouched() {
        let base = H.div();
        let derived = base.with("hello").attr("data_x", 1);
        assert!(base.children().is_empty());
        assert_eq!(derived.children().len(), 1);
        assert_eq!(derived.get_attribute("data-x"), Some(&AttrValue::Int(1)));
        assert!(derived.get_attribute("data_x").is_none());
    }

    #[test]
    fn test_structural_equality() {
        let a = H.span().class("x").class("y").with(("a", 1));
        let b = H.span().classes(["y", "x"]).with("a").with(1);
        assert_eq!(a, b);
        assert_ne!(a, H.div().classes(["x", "y"]).with(("a", 1)));

        let mut set = HashSet::new();
        set.insert(a.clone());
        assert!(set.contains(&b));
    }

    #[test]
    fn test_attribute_order_is_irrelevant_for_equality() {
        let a = H.div().attr("a", 1).attr("b", 2);
        let b = H.div().attr("b", 2).attr("a", 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_hash_id_class() {
        let tag = H.div().classes(["a", "#first", "b", "#second"]);
        assert_eq!(tag.get_str("id"), Some("second"));
        assert!(tag.has_class("a"));
        assert!(tag.has_class("b"));
        assert!(!tag.has_class("#second"));
    }

    #[test]
    fn test_fill_dedupes_resources() {
        let css = H.style().with("p {}");
        let tag = H.div().resource(css.clone()).resource(css.clone());
        assert_eq!(tag.resources().len(), 1);

        let same = tag.fill(Fill::new().resources([css]));
        assert!(same.ptr_eq(&tag));
    }

    #[test]
    fn test_collect_resources_discovery_order() {
        let a = H.style().with("a");
        let b = H.style().with("b");
        let tree = H.div()
            .resource(a.clone())
            .with(H.span().resource(b.clone()).resource(a.clone()))
            .with(H.span().resource(b.clone()));
        assert_eq!(tree.collect_resources(), vec![a, b]);
    }

    #[test]
    fn test_collect_resources_of_resources() {
        let inner = H.style().with(".inner{}");
        let script = H.script().resource(inner.clone()).with("var x;");
        let tree = H.div()
            .resource(script.clone())
            .with(H.span().resource(inner.clone()));
        assert_eq!(tree.collect_resources(), vec![script, inner]);
    }

    #[test]
    fn test_tag_kinds() {
        assert!(H.br().is_void());
        assert!(H.script().is_raw());
        assert!(H.raw().is_raw());
        assert!(H.raw().is_virtual());
        assert!(H.inline().is_virtual());
        assert!(Tag::virtual_tag().is_virtual());
        assert!(!H.div().is_virtual());
    }

    #[test]
    fn test_ensure_id() {
        let explicit = H.div().attr("id", "main");
        assert_eq!(explicit.ensure_id().ok().as_deref(), Some("main"));

        let tag = H.div();
        let first = tag.ensure_id().expect("fresh tag accepts an id");
        let second = tag.ensure_id().expect("id is stable");
        assert_eq!(first, second);
        assert_eq!(tag.allocated_id(), Some(first.as_str()));
        assert!(tag.with("x").id().is_some());
    }

    #[test]
    fn test_id_after_serialization() {
        let tag = H.span();
        tag.mark_serialized();
        assert!(matches!(
            tag.ensure_id(),
            Err(TagError::IdAfterSerialization { .. })
        ));
    }
}
