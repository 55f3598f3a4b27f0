//! repr Engine
//!
//! Structural representation of arbitrary values as HTML or plain text.
//!
//! # Example
//! ```rust
//! use repr_engine::{Value, represent};
//!
//! let value = Value::list([Value::Int(1), Value::Int(2), Value::Int(3)]);
//! let node = represent(&value).expect("represent");
//! assert_eq!(node.to_terminal_string(), "[1, 2, 3]");
//! ```

mod interface;
mod node;

pub use interface::{Backend, Interface};
pub use node::Node;

pub use repr_core::make::{self, Layout};
pub use repr_core::types::builtins;
pub use repr_core::{
    Config, ConfigError, ConfigValue, Handled, HandlerTable, Hrepr, Layer, Object, Profile,
    Record, ReprError, Representable, TypeInfo, Value,
};
pub use repr_render::{HtmlOptions, RenderError, TerminalOptions};
pub use repr_tag::{H, Tag};

// Re-export sub-crates for advanced usage
pub use repr_layout as layout;
pub use repr_render as render;
pub use repr_tag as tag;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Representation error: {0}")]
    Repr(#[from] ReprError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Represent `value` with the default [`Interface`].
pub fn represent(value: &Value) -> Result<Node, EngineError> {
    Interface::default().represent(value)
}

/// A full HTML document for `value`, using the default [`Interface`].
pub fn page(value: &Value) -> Result<String, EngineError> {
    Interface::default().page(value)
}
