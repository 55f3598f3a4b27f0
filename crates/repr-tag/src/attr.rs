//! Attribute values

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{Tag, TagError};

/// An object that knows how to serialize itself into an attribute value.
pub trait AttrEmbed: fmt::Debug + Send + Sync {
    /// Attribute text for `attr`, unescaped.
    fn embed(&self, attr: &str) -> Result<String, TagError>;
}

/// Value of a tag attribute
#[derive(Debug, Clone)]
pub enum AttrValue {
    /// `true` renders as a bare flag, `false` is omitted.
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    /// Multi-valued attribute such as `class`. Compared as a set,
    /// serialized in insertion order.
    Tokens(Vec<String>),
    /// Style map, serialized as `key:value;` pairs.
    Style(Vec<(String, String)>),
    /// Another element, embedded as `#<id>`.
    Ref(Tag),
    Opaque(Arc<dyn AttrEmbed>),
}

impl AttrValue {
    pub fn tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.into();
            if !out.contains(&token) {
                out.push(token);
            }
        }
        AttrValue::Tokens(out)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            AttrValue::Tokens(t) => Some(t),
            _ => None,
        }
    }

    /// Whether a multi-valued attribute holds `token`.
    pub fn has_token(&self, token: &str) -> bool {
        self.as_tokens()
            .is_some_and(|tokens| tokens.iter().any(|t| t == token))
    }

    /// Plain text form for scalar values. Embedded values (`Ref`,
    /// `Opaque`) and `false` have none.
    pub fn to_text(&self) -> Option<String> {
        match self {
            AttrValue::Bool(true) => Some(String::new()),
            AttrValue::Bool(false) | AttrValue::Ref(_) | AttrValue::Opaque(_) => None,
            AttrValue::Str(s) => Some(s.clone()),
            AttrValue::Int(n) => Some(n.to_string()),
            AttrValue::Float(x) => Some(x.to_string()),
            AttrValue::Tokens(t) => Some(t.join(" ")),
            AttrValue::Style(entries) => Some(
                entries
                    .iter()
                    .map(|(k, v)| format!("{k}:{v};"))
                    .collect(),
            ),
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        use AttrValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Tokens(a), Tokens(b)) => {
                a.iter().collect::<BTreeSet<_>>() == b.iter().collect::<BTreeSet<_>>()
            }
            (Style(a), Style(b)) => a == b,
            (Ref(a), Ref(b)) => a == b,
            (Opaque(a), Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for AttrValue {}

impl Hash for AttrValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            AttrValue::Bool(b) => b.hash(state),
            AttrValue::Str(s) => s.hash(state),
            AttrValue::Int(n) => n.hash(state),
            AttrValue::Float(x) => x.to_bits().hash(state),
            AttrValue::Tokens(t) => t.iter().collect::<BTreeSet<_>>().hash(state),
            AttrValue::Style(s) => s.hash(state),
            AttrValue::Ref(tag) => tag.hash(state),
            AttrValue::Opaque(o) => (Arc::as_ptr(o) as *const () as usize).hash(state),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        AttrValue::Int(value.into())
    }
}

impl From<usize> for AttrValue {
    fn from(value: usize) -> Self {
        AttrValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<Tag> for AttrValue {
    fn from(value: Tag) -> Self {
        AttrValue::Ref(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::tokens(value)
    }
}

impl From<&[&str]> for AttrValue {
    fn from(value: &[&str]) -> Self {
        AttrValue::tokens(value.iter().copied())
    }
}

impl From<Arc<dyn AttrEmbed>> for AttrValue {
    fn from(value: Arc<dyn AttrEmbed>) -> Self {
        AttrValue::Opaque(value)
    }
}
