//! Interface - Main entry point

use std::rc::Rc;

use repr_core::{
    Config, Dispatcher, HandlerTable, Hrepr, Layer, Postprocess, Preprocess, Profile, ReprError,
    Value, inject_reference_numbers,
};
use repr_render::html::stylesheet;
use repr_render::{HtmlGenerator, HtmlOptions, TerminalOptions};
use repr_tag::{Fill, H, Tag};

use crate::{EngineError, Node};

/// Output backend used by [`Node::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Html,
    Terminal,
}

/// Handler profile, configuration and output settings.
///
/// Every call to [`Interface::represent`] runs in a fresh session, so
/// reference numbers start at 1 for each top-level value.
#[derive(Clone)]
pub struct Interface {
    dispatcher: Rc<Dispatcher>,
    config: Config,
    preprocess: Option<Preprocess>,
    postprocess: Option<Postprocess>,
    inject_references: bool,
    fill_resources: bool,
    backend: Backend,
    html: HtmlOptions,
    terminal: TerminalOptions,
}

impl Default for Interface {
    fn default() -> Self {
        Self::new(repr_std::standard_profile())
    }
}

impl Interface {
    /// Interface over `profile` with the default settings.
    pub fn new(profile: Profile) -> Self {
        let config = Config::from_pairs([
            ("string_cutoff", 20),
            ("bytes_cutoff", 20),
            ("sequence_max", 100),
        ]);
        Self {
            dispatcher: Rc::new(Dispatcher::new(profile)),
            config,
            preprocess: None,
            postprocess: None,
            inject_references: true,
            fill_resources: true,
            backend: Backend::default(),
            html: HtmlOptions::default(),
            terminal: TerminalOptions::default(),
        }
    }

    pub fn profile(&self) -> &Profile {
        self.dispatcher.profile()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Layer `values` on top of the current configuration.
    pub fn with_config(mut self, values: Layer) -> Self {
        self.config = self.config.with_config(values);
        self
    }

    /// Layer a JSON object of settings on top of the current configuration.
    pub fn with_config_json(self, json: &str) -> Result<Self, EngineError> {
        let values = Config::layer_from_json(json)?;
        Ok(self.with_config(values))
    }

    /// A copy of this interface with extra settings.
    pub fn variant(&self, values: Layer) -> Self {
        self.clone().with_config(values)
    }

    /// Consult `overlay` before every table of the current profile.
    pub fn with_overlay(mut self, overlay: HandlerTable) -> Self {
        let profile = self.dispatcher.profile().with_overlay(overlay);
        self.dispatcher = Rc::new(Dispatcher::new(profile));
        self
    }

    pub fn with_preprocess<F>(mut self, preprocess: F) -> Self
    where
        F: Fn(Value, &mut Hrepr) -> Value + 'static,
    {
        self.preprocess = Some(Rc::new(preprocess));
        self
    }

    pub fn with_postprocess<F>(mut self, postprocess: F) -> Self
    where
        F: Fn(Tag, &Value, &mut Hrepr) -> Tag + 'static,
    {
        self.postprocess = Some(Rc::new(postprocess));
        self
    }

    /// Decorate referenced objects with their `#N=` number (default on).
    pub fn inject_references(mut self, enabled: bool) -> Self {
        self.inject_references = enabled;
        self
    }

    /// Attach the standard stylesheet to every result (default on).
    pub fn fill_resources(mut self, enabled: bool) -> Self {
        self.fill_resources = enabled;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_html_options(mut self, options: HtmlOptions) -> Self {
        self.html = options;
        self
    }

    pub fn with_terminal_options(mut self, options: TerminalOptions) -> Self {
        self.terminal = options;
        self
    }

    pub fn represent(&self, value: &Value) -> Result<Node, EngineError> {
        tracing::debug!(ty = %value.type_info(), "represent");
        self.run(|hrepr| hrepr.represent(value))
    }

    /// Represent `value` with extra settings for this call only.
    pub fn represent_with(&self, value: &Value, values: Layer) -> Result<Node, EngineError> {
        tracing::debug!(ty = %value.type_info(), settings = values.len(), "represent");
        self.run(|hrepr| hrepr.represent_with(value, values))
    }

    /// Represent several values side by side in one session.
    ///
    /// Objects shared between the values are numbered consistently.
    pub fn represent_all(&self, values: &[Value]) -> Result<Node, EngineError> {
        tracing::debug!(count = values.len(), "represent all");
        self.run(|hrepr| {
            let tags = values
                .iter()
                .map(|value| hrepr.represent(value))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(H.inline().with(tags))
        })
    }

    /// A full HTML document for `value`.
    pub fn page(&self, value: &Value) -> Result<String, EngineError> {
        let node = self.represent(value)?;
        Ok(HtmlGenerator::new(self.html).to_page(node.tag())?)
    }

    fn run<F>(&self, body: F) -> Result<Node, EngineError>
    where
        F: FnOnce(&mut Hrepr) -> Result<Tag, ReprError>,
    {
        let mut hrepr = Hrepr::new(self.dispatcher.clone())
            .with_config(self.config.clone())
            .with_preprocess(self.preprocess.clone())
            .with_postprocess(self.postprocess.clone());
        let mut tag = body(&mut hrepr)?;

        if self.inject_references {
            let refmap = hrepr.state().make_refmap();
            tracing::trace!(refs = refmap.len(), "injecting reference numbers");
            tag = inject_reference_numbers(&tag, &refmap);
        }
        if self.fill_resources {
            tag = tag.fill(Fill::new().resources([stylesheet()]));
        }
        Ok(Node::new(tag, self.backend, self.html, self.terminal))
    }
}
