//! String and bytes encoding

use repr_core::{Handled, Hrepr, ReprError, Value, make};

pub(crate) const DEFAULT_CUTOFF: usize = 20;

/// Escape control characters so a string renders on one line.
pub fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}

/// Lowercase hex digits of `bytes`.
pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// First `cutoff - 3` characters and `...` when `s` is longer than `cutoff`.
pub fn truncate(s: &str, cutoff: usize) -> String {
    if s.chars().count() <= cutoff {
        return s.to_string();
    }
    let mut out: String = s.chars().take(cutoff.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn cutoff(hrepr: &Hrepr, key: &str) -> usize {
    hrepr
        .config()
        .int(key)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_CUTOFF)
}

/// Text of a string or bytes value, its length for the cutoff test, and
/// the config key of its cutoff. Bytes count bytes, not hex digits.
fn text_of(value: &Value) -> Option<(String, usize, &'static str, &'static str)> {
    match value {
        Value::Str(s) => Some((s.to_string(), s.chars().count(), "string_cutoff", "str")),
        Value::Bytes(b) => Some((hex(b), b.len(), "bytes_cutoff", "bytes")),
        _ => None,
    }
}

/// Short texts decline, so they are never tracked as references.
pub(crate) fn full(value: &Value, hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    let Some((text, len, key, ty)) = text_of(value) else {
        return Ok(Handled::Declined);
    };
    if len <= cutoff(hrepr, key) {
        return Ok(Handled::Declined);
    }
    Ok(make::atom(encode(&text), Some(ty)).into())
}

pub(crate) fn short(value: &Value, hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    let Some((text, _, key, ty)) = text_of(value) else {
        return Ok(Handled::Declined);
    };
    let text = truncate(&text, cutoff(hrepr, key));
    Ok(make::atom(encode(&text), Some(ty)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_control_characters() {
        assert_eq!(encode("a\nb\tc\rd"), r"a\nb\tc\rd");
        assert_eq!(encode(r"back\slash"), r"back\\slash");
        assert_eq!(encode("\u{1}\u{7f}"), r"\x01\x7f");
        assert_eq!(encode("héllo ⟳"), "héllo ⟳");
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(&[0x00, 0xab, 0x10]), "00ab10");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("abcdefghij", 10), "abcdefghij");
        assert_eq!(truncate("abcdefghijk", 10), "abcdefg...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
