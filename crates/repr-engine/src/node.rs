//! Rendered representation

use repr_render::{HtmlGenerator, HtmlOptions, TermGenerator, TerminalOptions};
use repr_tag::Tag;

use crate::{Backend, EngineError};

/// The tag tree for one value, with the output settings it was made with.
#[derive(Debug, Clone)]
pub struct Node {
    tag: Tag,
    backend: Backend,
    html: HtmlOptions,
    terminal: TerminalOptions,
}

impl Node {
    pub(crate) fn new(tag: Tag, backend: Backend, html: HtmlOptions, terminal: TerminalOptions) -> Self {
        Self {
            tag,
            backend,
            html,
            terminal,
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn into_tag(self) -> Tag {
        self.tag
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// HTML fragment, without resources.
    pub fn to_html_string(&self) -> Result<String, EngineError> {
        Ok(HtmlGenerator::new(self.html).to_string(&self.tag)?)
    }

    /// Full HTML document with the resources hoisted into `<head>`.
    pub fn to_page_string(&self) -> Result<String, EngineError> {
        Ok(HtmlGenerator::new(self.html).to_page(&self.tag)?)
    }

    pub fn to_terminal_string(&self) -> String {
        TermGenerator::new(self.terminal).to_string(&self.tag)
    }

    /// Render with the selected backend.
    pub fn render(&self) -> Result<String, EngineError> {
        match self.backend {
            Backend::Html => self.to_html_string(),
            Backend::Terminal => Ok(self.to_terminal_string()),
        }
    }
}
