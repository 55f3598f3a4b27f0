//! repr Layout
//!
//! Backend-agnostic text layout. A document is built from three node kinds:
//! atomic [`Text`], [`Sequence`] concatenation, and [`Breakable`] groups.
//! Whether a group stays on one line or breaks into indented lines is only
//! decided when the document is formatted against a [`Context`], so the same
//! document can produce minified or indented output by varying `max_col`.

mod context;
mod doc;

pub use context::{Context, Overflow};
pub use doc::{Breakable, Doc, Sequence, Text};

/// Interleave `sep` after every element but the last.
///
/// Each element except the last is wrapped in a [`Sequence`] together with
/// the separator, so a separator never starts a new line on its own.
pub fn join<I, D>(docs: I, sep: &str) -> Vec<Doc>
where
    I: IntoIterator<Item = D>,
    D: Into<Doc>,
{
    let mut docs: Vec<Doc> = docs.into_iter().map(Into::into).collect();
    let Some(last) = docs.pop() else {
        return Vec::new();
    };
    let mut out: Vec<Doc> = docs
        .into_iter()
        .map(|doc| Doc::sequence([doc, Doc::text(sep)]))
        .collect();
    out.push(last);
    out
}
