//! Builders for the generic representation tags
//!
//! These only describe intent through attributes; how a `bracketed` or an
//! `instance` looks is up to each backend.

use repr_tag::{H, IntoChildren, Tag};

/// How the body of a container is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Elements side by side.
    #[default]
    Horizontal,
    /// One element (or row) per line.
    Vertical,
    /// Abbreviated body, such as `...`.
    Short,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Horizontal => "h",
            Layout::Vertical => "v",
            Layout::Short => "s",
        }
    }

    pub fn parse(s: &str) -> Option<Layout> {
        match s {
            "h" => Some(Layout::Horizontal),
            "v" => Some(Layout::Vertical),
            "s" => Some(Layout::Short),
            _ => None,
        }
    }
}

fn with_type(tag: Tag, ty: Option<&str>) -> Tag {
    match ty {
        Some(ty) => tag.attr("type", ty),
        None => tag,
    }
}

/// A scalar leaf.
pub fn atom(content: impl IntoChildren, ty: Option<&str>) -> Tag {
    with_type(H.atom(), ty).with(content)
}

/// A scalar leaf standing for a singleton such as `True` or `None`.
pub fn atom_value(text: &str, value: &str) -> Tag {
    H.atom().attr("value", value).with(text)
}

/// `key name`, e.g. `function foo`.
pub fn defn(key: &str, name: &str) -> Tag {
    H.defn().with((key, name))
}

/// `key <delimiter> value`
pub fn pair(key: Tag, value: Tag, delimiter: &str) -> Tag {
    H.pair().attr("delimiter", delimiter).with((key, value))
}

/// A delimited collection.
pub fn bracketed(body: Vec<Tag>, start: &str, end: &str, ty: Option<&str>, layout: Layout) -> Tag {
    with_type(H.bracketed(), ty)
        .attr("start", start)
        .attr("end", end)
        .attr("layout", layout.as_str())
        .with(body)
}

/// A titled box of fields.
pub fn instance(title: &str, body: Vec<Tag>, layout: Layout) -> Tag {
    H.instance()
        .attr("type", title)
        .attr("layout", layout.as_str())
        .with(body)
}

/// A reference marker, optionally carrying the referenced content.
pub fn reference(num: usize, is_loop: bool, content: Option<Tag>) -> Tag {
    let mut tag = H.reference().attr("num", num);
    if is_loop {
        tag = tag.attr("loop", true);
    }
    tag.with(content)
}

/// Placeholder for elided elements.
pub fn ellipsis() -> Tag {
    H.span().class("hrepr-ellipsis").with("...")
}

/// The `<type>` atom used when nothing else applies.
pub fn default_short(qualname: &str, description: Option<&str>) -> Tag {
    match description {
        Some(description) => atom(("<", qualname, " ", description, ">"), None),
        None => atom(("<", qualname, ">"), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repr_tag::{AttrValue, vocab};

    #[test]
    fn test_bracketed_attributes() {
        let tag = bracketed(vec![atom(1, Some("int"))], "[", "]", Some("list"), Layout::Horizontal);
        assert_eq!(tag.name(), Some(vocab::BRACKETED));
        assert_eq!(tag.get_str("start"), Some("["));
        assert_eq!(tag.get_str("end"), Some("]"));
        assert_eq!(tag.get_str("type"), Some("list"));
        assert_eq!(tag.get_str("layout"), Some("h"));
        assert_eq!(tag.children().len(), 1);
    }

    #[test]
    fn test_reference() {
        let plain = reference(3, false, None);
        assert_eq!(plain.get_attribute("num"), Some(&AttrValue::Int(3)));
        assert!(plain.get_attribute("loop").is_none());
        assert!(plain.children().is_empty());

        let looped = reference(1, true, Some(atom("x", None)));
        assert_eq!(looped.get_attribute("loop"), Some(&AttrValue::Bool(true)));
        assert_eq!(looped.children().len(), 1);
    }

    #[test]
    fn test_layout_round_trip() {
        for layout in [Layout::Horizontal, Layout::Vertical, Layout::Short] {
            assert_eq!(Layout::parse(layout.as_str()), Some(layout));
        }
        assert_eq!(Layout::parse("x"), None);
    }
}
