//! repr Core
//!
//! Turns arbitrary [`Value`]s into generic tag trees. Handlers are resolved
//! by runtime type through a [`Dispatcher`]; the [`Hrepr`] runner detects
//! cycles, replaces repeated objects with reference markers and tracks
//! recursion depth for one top-level call.

mod config;
mod dispatch;
mod hrepr;
pub mod make;
mod refs;
mod state;
pub mod types;
mod value;

pub use config::{Config, ConfigValue, Layer};
pub use dispatch::{
    Dispatcher, Handled, Handler, HandlerKind, HandlerTable, Profile, Representable,
    ResourceHandler,
};
pub use hrepr::{Hrepr, Postprocess, Preprocess};
pub use refs::inject_reference_numbers;
pub use state::HreprState;
pub use types::{TypeInfo, TypeKey};
pub use value::{AsAny, Identity, Items, Object, Record, Value};

/// Representation errors
#[derive(Debug, thiserror::Error)]
pub enum ReprError {
    #[error("Representation of {type_name} must be a tag, not {found}")]
    NotATag { type_name: String, found: String },

    #[error(transparent)]
    Tag(#[from] repr_tag::TagError),

    #[error("Handler for {type_name} failed: {message}")]
    Handler { type_name: String, message: String },
}

impl ReprError {
    /// Custom failure raised from a handler.
    pub fn handler(ty: &TypeInfo, message: impl Into<String>) -> Self {
        ReprError::Handler {
            type_name: ty.qualname(),
            message: message.into(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration must be a JSON object")]
    NotAnObject,

    #[error("Unsupported value for configuration key {key}")]
    InvalidValue { key: String },
}
