//! Lists, tuples, sets and dicts

use repr_core::make::{self, Layout};
use repr_core::{Handled, Hrepr, ReprError, Value};

/// Delimiters and type class of a flat collection.
fn delimiters(value: &Value) -> Option<(&'static str, &'static str, &'static str)> {
    match value {
        Value::List(_) => Some(("[", "]", "list")),
        Value::Tuple(_) => Some(("(", ")", "tuple")),
        Value::Set(_) => Some(("{", "}", "set")),
        Value::Dict(_) => Some(("{", "}", "dict")),
        _ => None,
    }
}

pub(crate) fn flow(value: &Value, hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    let (Some((start, end, ty)), Some(items)) = (delimiters(value), value.items()) else {
        return Ok(Handled::Declined);
    };
    let body = hrepr.sequence(&items)?;
    Ok(make::bracketed(body, start, end, Some(ty), Layout::Horizontal).into())
}

pub(crate) fn dict(value: &Value, hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    let Some(entries) = value.entries() else {
        return Ok(Handled::Declined);
    };
    let body = hrepr.sequence_with(&entries, |hrepr, (key, value)| {
        let key = hrepr.represent(key)?;
        let value = hrepr.represent(value)?;
        Ok(make::pair(key, value, ": "))
    })?;
    Ok(make::bracketed(body, "{", "}", Some("dict"), Layout::Vertical).into())
}

/// `[...]`, `(...)`, `{...}`
pub(crate) fn short(value: &Value, _hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    let Some((start, end, ty)) = delimiters(value) else {
        return Ok(Handled::Declined);
    };
    Ok(make::bracketed(vec![make::ellipsis()], start, end, Some(ty), Layout::Short).into())
}
