//! Formatting context and overflow policy

use crate::Doc;

/// What to do when a line ends past `max_col`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Overflow {
    /// Let the line run past the limit.
    #[default]
    Allow,
    /// Drop trailing whitespace that overflows, hard-wrap anything else.
    Break,
    /// Like `Break`, but continuation lines start with `\ `.
    Backslash,
}

impl Overflow {
    fn continuation(self) -> &'static str {
        match self {
            Overflow::Backslash => "\\ ",
            _ => "",
        }
    }
}

/// Formatting state threaded through a layout pass.
///
/// `offset` is the current column, `line_offset` the indentation of the
/// current line. A `max_col` of `None` means unlimited width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    pub tabsize: usize,
    pub max_col: Option<usize>,
    pub offset: usize,
    pub line_offset: usize,
    pub max_indent: Option<usize>,
    pub overflow: Overflow,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            tabsize: 4,
            max_col: None,
            offset: 0,
            line_offset: 0,
            max_indent: None,
            overflow: Overflow::Allow,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_col(mut self, max_col: Option<usize>) -> Self {
        self.max_col = max_col;
        self
    }

    pub fn with_tabsize(mut self, tabsize: usize) -> Self {
        self.tabsize = tabsize;
        self
    }

    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_max_indent(mut self, max_indent: Option<usize>) -> Self {
        self.max_indent = max_indent;
        self
    }

    /// Same context, continuing at column `offset`.
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Context for the body lines of a broken group.
    pub(crate) fn nested(mut self, indent: usize) -> Self {
        self.offset = indent;
        self.line_offset = indent;
        self
    }

    /// Indentation for lines nested one level deeper than the current one.
    ///
    /// Unless overflow is allowed, indentation never grows past
    /// `max_col - 15` (or `max_indent` when set).
    pub fn next_line_offset(&self) -> usize {
        let cap = match (self.max_indent, self.overflow) {
            (Some(cap), _) => cap,
            (None, Overflow::Allow) => usize::MAX,
            (None, _) => self
                .max_col
                .map_or(usize::MAX, |max_col| max_col.saturating_sub(15)),
        };
        (self.line_offset + self.tabsize).min(cap)
    }

    /// Whitespace for the current indentation.
    pub fn indent(&self) -> String {
        " ".repeat(self.line_offset)
    }

    /// Format `doc` starting at `self.offset`, applying the overflow policy.
    ///
    /// Returns the text and the column at which it ends.
    pub fn format(&self, doc: &Doc) -> (String, usize) {
        let (mut result, mut offset) = doc.layout(self);
        let Some(max_col) = self.max_col else {
            return (result, offset);
        };
        if self.overflow == Overflow::Allow {
            return (result, offset);
        }

        let prefix = self.overflow.continuation();
        let prefix_width = prefix.chars().count();
        while offset > max_col {
            let split = split_from_end(&result, offset - max_col);
            let tail = &result[split..];
            if tail.trim().is_empty() {
                result.truncate(split);
                offset = max_col;
                break;
            }
            if self.line_offset + prefix_width >= max_col {
                // Wrapping would not shorten the line any further.
                break;
            }
            let tail = tail.to_string();
            let tail_width = tail.chars().count();
            result.truncate(split);
            result.push('\n');
            result.push_str(&self.indent());
            result.push_str(prefix);
            result.push_str(&tail);
            offset = self.line_offset + tail_width + prefix_width;
            tracing::trace!(offset, "wrapped overflowing text");
        }
        (result, offset)
    }
}

/// Byte index where the last `count` characters of `s` begin.
fn split_from_end(s: &str, count: usize) -> usize {
    if count == 0 {
        return s.len();
    }
    s.char_indices()
        .rev()
        .nth(count - 1)
        .map_or(0, |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(max_col: usize, overflow: Overflow) -> Context {
        Context::new()
            .with_max_col(Some(max_col))
            .with_overflow(overflow)
            .with_tabsize(0)
    }

    #[test]
    fn test_overflow_whitespace() {
        let t = Doc::text("hello                        ");
        let (val, offset) = ctx(10, Overflow::Break).format(&t);
        assert_eq!(val, "hello     ");
        assert_eq!(offset, 10);
    }

    #[test]
    fn test_overflow_backslash() {
        let t = Doc::text("woop dee doo woop");
        let (val, offset) = ctx(10, Overflow::Backslash).format(&t);
        assert_eq!(val, "woop dee d\n\\ oo woop");
        assert_eq!(offset, 9);
    }

    #[test]
    fn test_overflow_break_loops_until_fit() {
        let t = Doc::text("abcdefghijklmnopqrstuvwxy");
        let (val, _) = ctx(10, Overflow::Break).format(&t);
        assert_eq!(val, "abcdefghij\nklmnopqrst\nuvwxy");
    }

    #[test]
    fn test_overflow_allow_keeps_line() {
        let t = Doc::text("woop dee doo woop");
        let (val, offset) = ctx(10, Overflow::Allow).format(&t);
        assert_eq!(val, "woop dee doo woop");
        assert_eq!(offset, 17);
    }

    #[test]
    fn test_next_line_offset_caps() {
        let base = Context::new().with_max_col(Some(40));
        assert_eq!(base.next_line_offset(), 4);

        let deep = Context { line_offset: 24, ..base.with_overflow(Overflow::Break) };
        assert_eq!(deep.next_line_offset(), 25);

        let capped = deep.with_max_indent(Some(10));
        assert_eq!(capped.next_line_offset(), 10);

        let allowed = Context { line_offset: 100, ..base };
        assert_eq!(allowed.next_line_offset(), 104);
    }

    #[test]
    fn test_split_from_end_multibyte() {
        let s = "a⟳bc";
        assert_eq!(&s[split_from_end(s, 3)..], "⟳bc");
        assert_eq!(split_from_end(s, 10), 0);
        assert_eq!(split_from_end(s, 0), s.len());
    }
}
