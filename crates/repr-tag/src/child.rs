//! Tag children and flattening

use std::hash::{Hash, Hasher};

use crate::Tag;

/// A child of a [`Tag`]
#[derive(Debug, Clone)]
pub enum Child {
    Tag(Tag),
    Text(String),
    Int(i64),
    Float(f64),
}

impl Child {
    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Child::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Short name of the node kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Child::Tag(_) => "tag",
            Child::Text(_) => "text",
            Child::Int(_) => "int",
            Child::Float(_) => "float",
        }
    }

    /// Text content of a leaf child. `None` for tags.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Child::Tag(_) => None,
            Child::Text(s) => Some(s.clone()),
            Child::Int(n) => Some(n.to_string()),
            Child::Float(x) => Some(x.to_string()),
        }
    }
}

impl PartialEq for Child {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Child::Tag(a), Child::Tag(b)) => a == b,
            (Child::Text(a), Child::Text(b)) => a == b,
            (Child::Int(a), Child::Int(b)) => a == b,
            (Child::Float(a), Child::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Child {}

impl Hash for Child {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Child::Tag(tag) => tag.hash(state),
            Child::Text(s) => s.hash(state),
            Child::Int(n) => n.hash(state),
            Child::Float(x) => x.to_bits().hash(state),
        }
    }
}

impl From<Tag> for Child {
    fn from(value: Tag) -> Self {
        Child::Tag(value)
    }
}

impl From<&str> for Child {
    fn from(value: &str) -> Self {
        Child::Text(value.to_string())
    }
}

impl From<String> for Child {
    fn from(value: String) -> Self {
        Child::Text(value)
    }
}

/// Anything that can be appended to a tag's children.
///
/// Collections flatten recursively, so `vec![a, vec![b, c]]` and
/// `(a, b, c)` both contribute three children. `None` and `()` contribute
/// nothing.
pub trait IntoChildren {
    fn push_into(self, out: &mut Vec<Child>);

    fn into_children(self) -> Vec<Child>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        self.push_into(&mut out);
        out
    }
}

impl IntoChildren for Child {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(self);
    }
}

impl IntoChildren for Tag {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(Child::Tag(self));
    }
}

impl IntoChildren for &Tag {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(Child::Tag(self.clone()));
    }
}

impl IntoChildren for &str {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(Child::Text(self.to_string()));
    }
}

impl IntoChildren for String {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(Child::Text(self));
    }
}

impl IntoChildren for &String {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(Child::Text(self.clone()));
    }
}

macro_rules! int_children {
    ($($t:ty),*) => {
        $(
            impl IntoChildren for $t {
                fn push_into(self, out: &mut Vec<Child>) {
                    out.push(Child::Int(i64::from(self)));
                }
            }
        )*
    };
}

int_children!(i32, i64, u32, u8);

impl IntoChildren for usize {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(Child::Int(i64::try_from(self).unwrap_or(i64::MAX)));
    }
}

impl IntoChildren for f64 {
    fn push_into(self, out: &mut Vec<Child>) {
        out.push(Child::Float(self));
    }
}

impl IntoChildren for () {
    fn push_into(self, _out: &mut Vec<Child>) {}
}

impl<T: IntoChildren> IntoChildren for Option<T> {
    fn push_into(self, out: &mut Vec<Child>) {
        if let Some(inner) = self {
            inner.push_into(out);
        }
    }
}

impl<T: IntoChildren> IntoChildren for Vec<T> {
    fn push_into(self, out: &mut Vec<Child>) {
        for item in self {
            item.push_into(out);
        }
    }
}

impl<T: IntoChildren, const N: usize> IntoChildren for [T; N] {
    fn push_into(self, out: &mut Vec<Child>) {
        for item in self {
            item.push_into(out);
        }
    }
}

impl<T: IntoChildren + Clone> IntoChildren for &[T] {
    fn push_into(self, out: &mut Vec<Child>) {
        for item in self {
            item.clone().push_into(out);
        }
    }
}

macro_rules! tuple_children {
    ($($name:ident),+) => {
        impl<$($name: IntoChildren),+> IntoChildren for ($($name,)+) {
            #[allow(non_snake_case)]
            fn push_into(self, out: &mut Vec<Child>) {
                let ($($name,)+) = self;
                $($name.push_into(out);)+
            }
        }
    };
}

tuple_children!(A);
tuple_children!(A, B);
tuple_children!(A, B, C);
tuple_children!(A, B, C, D);
tuple_children!(A, B, C, D, E);
tuple_children!(A, B, C, D, E, F);
