//! Tag factory

use crate::{Tag, vocab};

/// Tag factory. Each method returns a fresh, empty tag of that name.
///
/// ```
/// use repr_tag::H;
/// let link = H.a().attr("href", "https://example.com").with("example");
/// assert_eq!(link.name(), Some("a"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Factory;

/// The shared factory instance.
pub const H: Factory = Factory;

macro_rules! html_tags {
    ($($name:ident),* $(,)?) => {
        impl Factory {
            $(
                pub fn $name(&self) -> Tag {
                    Tag::new(stringify!($name))
                }
            )*
        }
    };
}

html_tags!(
    a, b, body, br, code, div, em, h1, h2, h3, head, hr, html, i, img, input,
    li, link, meta, ol, p, pre, script, span, strong, style, table, tbody, td,
    th, thead, title, tr, ul,
);

impl Factory {
    /// Tag with an arbitrary name.
    pub fn tag(&self, name: &str) -> Tag {
        Tag::new(name)
    }

    /// Virtual tag whose children are inlined into the parent.
    pub fn inline(&self) -> Tag {
        Tag::new("inline")
    }

    /// Virtual tag whose text children are emitted unescaped.
    pub fn raw(&self) -> Tag {
        Tag::new("raw")
    }

    pub fn atom(&self) -> Tag {
        Tag::new(vocab::ATOM)
    }

    pub fn defn(&self) -> Tag {
        Tag::new(vocab::DEFN)
    }

    pub fn pair(&self) -> Tag {
        Tag::new(vocab::PAIR)
    }

    pub fn bracketed(&self) -> Tag {
        Tag::new(vocab::BRACKETED)
    }

    pub fn instance(&self) -> Tag {
        Tag::new(vocab::INSTANCE)
    }

    /// Reference marker (`ref` is reserved in Rust).
    pub fn reference(&self) -> Tag {
        Tag::new(vocab::REF)
    }
}
