//! Layout documents
//!
//! Widths are measured in characters and computed once, at construction.

use std::fmt;

use crate::Context;

/// A layout document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Doc {
    Text(Text),
    Sequence(Sequence),
    Breakable(Breakable),
}

/// Atomic text. Never broken, except by the overflow policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text {
    value: String,
    width: usize,
}

/// Concatenation with no breaking decision of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    elements: Vec<Doc>,
    width: usize,
}

/// A group that renders on one line if it fits, otherwise as
/// `start`, one indented line per body element, then `end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Breakable {
    start: Option<Box<Doc>>,
    body: Vec<Doc>,
    end: Option<Box<Doc>>,
    width: usize,
}

impl Text {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let width = value.chars().count();
        Self { value, width }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl Sequence {
    pub fn new(elements: Vec<Doc>) -> Self {
        let width = elements.iter().map(Doc::width).sum();
        Self { elements, width }
    }

    pub fn elements(&self) -> &[Doc] {
        &self.elements
    }
}

impl Breakable {
    pub fn new(start: Option<Doc>, body: Vec<Doc>, end: Option<Doc>) -> Self {
        let width = start.as_ref().map_or(0, Doc::width)
            + body.iter().map(Doc::width).sum::<usize>()
            + end.as_ref().map_or(0, Doc::width);
        Self {
            start: start.map(Box::new),
            body,
            end: end.map(Box::new),
            width,
        }
    }

    pub fn start(&self) -> Option<&Doc> {
        self.start.as_deref()
    }

    pub fn body(&self) -> &[Doc] {
        &self.body
    }

    pub fn end(&self) -> Option<&Doc> {
        self.end.as_deref()
    }

    fn layout(&self, ctx: &Context) -> (String, usize) {
        let mut out = String::new();
        let mut offset = ctx.offset;
        let start_width = self.start().map_or(0, Doc::width);

        if let Some(start) = self.start() {
            let (value, next) = ctx.format(start);
            out.push_str(&value);
            offset = next;
        }

        let fits = ctx
            .max_col
            .is_none_or(|max_col| offset + self.width - start_width <= max_col);

        if fits {
            for doc in &self.body {
                let (value, next) = ctx.at(offset).format(doc);
                out.push_str(&value);
                offset = next;
            }
            if let Some(end) = self.end() {
                let (value, next) = ctx.at(offset).format(end);
                out.push_str(&value);
                offset = next;
            }
            return (out, offset);
        }

        let inner = ctx.nested(ctx.next_line_offset());
        let inner_indent = inner.indent();
        for doc in &self.body {
            let (value, next) = inner.format(doc);
            out.push('\n');
            out.push_str(&inner_indent);
            out.push_str(&value);
            offset = next;
        }
        if let Some(end) = self.end() {
            let (value, next) = ctx.at(ctx.line_offset).format(end);
            out.push('\n');
            out.push_str(&ctx.indent());
            out.push_str(&value);
            offset = next;
        }
        (out, offset)
    }
}

impl Doc {
    pub fn text(value: impl Into<String>) -> Self {
        Doc::Text(Text::new(value))
    }

    pub fn sequence<I, D>(elements: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Doc>,
    {
        Doc::Sequence(Sequence::new(elements.into_iter().map(Into::into).collect()))
    }

    pub fn breakable<I, D>(start: impl Into<Doc>, body: I, end: impl Into<Doc>) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Doc>,
    {
        Doc::Breakable(Breakable::new(
            Some(start.into()),
            body.into_iter().map(Into::into).collect(),
            Some(end.into()),
        ))
    }

    /// A breakable group without delimiters.
    pub fn group<I, D>(body: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Doc>,
    {
        Doc::Breakable(Breakable::new(
            None,
            body.into_iter().map(Into::into).collect(),
            None,
        ))
    }

    /// Width of the document laid out on a single line.
    pub fn width(&self) -> usize {
        match self {
            Doc::Text(t) => t.width,
            Doc::Sequence(s) => s.width,
            Doc::Breakable(b) => b.width,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Doc::Text(t) => t.value.is_empty(),
            Doc::Sequence(s) => s.elements.is_empty(),
            Doc::Breakable(b) => {
                let blank = |d: Option<&Doc>| d.is_none_or(|d| d.width() == 0);
                blank(b.start()) && blank(b.end()) && b.body.is_empty()
            }
        }
    }

    /// Node-specific formatting, without the overflow policy.
    pub(crate) fn layout(&self, ctx: &Context) -> (String, usize) {
        match self {
            Doc::Text(t) => (t.value.clone(), ctx.offset + t.width),
            Doc::Sequence(s) => {
                let mut out = String::new();
                let mut offset = ctx.offset;
                for doc in &s.elements {
                    let (value, next) = ctx.at(offset).format(doc);
                    out.push_str(&value);
                    offset = next;
                }
                (out, offset)
            }
            Doc::Breakable(b) => b.layout(ctx),
        }
    }

    /// Lay the document out against `ctx`.
    pub fn to_string_with(&self, ctx: &Context) -> String {
        ctx.format(self).0
    }

    /// Lay the document out with default settings and the given width.
    pub fn render(&self, max_col: Option<usize>) -> String {
        self.to_string_with(&Context::new().with_max_col(max_col))
    }

    fn write_compact(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Doc::Text(t) => f.write_str(&t.value),
            Doc::Sequence(s) => s.elements.iter().try_for_each(|d| d.write_compact(f)),
            Doc::Breakable(b) => {
                if let Some(start) = b.start() {
                    start.write_compact(f)?;
                }
                b.body.iter().try_for_each(|d| d.write_compact(f))?;
                if let Some(end) = b.end() {
                    end.write_compact(f)?;
                }
                Ok(())
            }
        }
    }
}

/// Single-line rendering.
impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_compact(f)
    }
}

impl From<&str> for Doc {
    fn from(value: &str) -> Self {
        Doc::text(value)
    }
}

impl From<String> for Doc {
    fn from(value: String) -> Self {
        Doc::text(value)
    }
}

impl From<Text> for Doc {
    fn from(value: Text) -> Self {
        Doc::Text(value)
    }
}

impl From<Sequence> for Doc {
    fn from(value: Sequence) -> Self {
        Doc::Sequence(value)
    }
}

impl From<Breakable> for Doc {
    fn from(value: Breakable) -> Self {
        Doc::Breakable(value)
    }
}
