//! repr Render
//!
//! Output backends for tag trees:
//! - [`HtmlGenerator`]: generic tags are translated to concrete HTML with
//!   `hrepr-*` classes, then laid out as markup
//! - [`TermGenerator`]: generic tags are lowered to plain-text layout
//!   documents such as `[1, 2, 3]`

pub mod html;
pub mod term;

pub use html::{HtmlGenerator, HtmlOptions};
pub use term::{TermGenerator, TerminalOptions};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Void element <{tag}> cannot have children")]
    VoidWithChildren { tag: String },

    #[error("Referenced <{tag}> element has no id and was already serialized")]
    MissingId { tag: String },

    #[error(transparent)]
    Tag(#[from] repr_tag::TagError),
}
