//! repr Tag Tree
//!
//! Logically immutable markup nodes. Every "mutation" (`fill`, `attr`,
//! `class`, `with`) derives a new [`Tag`]; children and resources of the
//! original are shared, not copied. Equality and hashing are structural.

mod attr;
mod child;
mod factory;
pub mod gensym;
mod tag;

pub use attr::{AttrEmbed, AttrValue};
pub use child::{Child, IntoChildren};
pub use factory::{Factory, H};
pub use tag::{Fill, Tag};

/// Names of the generic tags emitted by the representation core.
///
/// None of these are HTML elements. Each backend rewrites them through
/// its own translation table before serializing.
pub mod vocab {
    /// Scalar leaf (`type`, `value` attributes).
    pub const ATOM: &str = "atom";
    /// Definition such as `function foo` (children: key, name).
    pub const DEFN: &str = "defn";
    /// Key/value pair (`delimiter` attribute, children: key, value).
    pub const PAIR: &str = "pair";
    /// Delimited collection (`start`, `end`, `delimiter`, `layout`).
    pub const BRACKETED: &str = "bracketed";
    /// Titled object box (`type`, `start`, `end`, `delimiter`, `layout`).
    pub const INSTANCE: &str = "instance";
    /// Reference marker (`num`, `loop`, optional content).
    pub const REF: &str = "ref";

    pub const ALL: &[&str] = &[ATOM, DEFN, PAIR, BRACKETED, INSTANCE, REF];

    pub fn is_generic(name: &str) -> bool {
        ALL.contains(&name)
    }
}

/// Tag errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum TagError {
    #[error("Cannot allocate an id for <{tag}>: it was already serialized without one")]
    IdAfterSerialization { tag: String },

    #[error("Cannot embed attribute value: {message}")]
    AttrEmbed { message: String },
}
