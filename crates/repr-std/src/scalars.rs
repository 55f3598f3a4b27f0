//! Numbers, singletons, types and markup

use repr_core::{Handled, Hrepr, ReprError, Value, make};

pub(crate) fn number(value: &Value, _hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    Ok(match value {
        Value::Int(n) => make::atom(*n, Some("int")).into(),
        Value::Float(x) => make::atom(format!("{x:?}"), Some("float")).into(),
        _ => Handled::Declined,
    })
}

pub(crate) fn constant(value: &Value, _hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    let text = match value {
        Value::Bool(true) => "True",
        Value::Bool(false) => "False",
        Value::None => "None",
        _ => return Ok(Handled::Declined),
    };
    Ok(make::atom_value(text, text).into())
}

/// `class Name`
pub(crate) fn class(value: &Value, _hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    Ok(match value {
        Value::Type(ty) => make::defn("class", ty.name()).into(),
        _ => Handled::Declined,
    })
}

/// Markup represents itself.
pub(crate) fn markup(value: &Value, _hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
    Ok(match value {
        Value::Tag(tag) => tag.clone().into(),
        _ => Handled::Declined,
    })
}
