//! The representation runner

use std::rc::Rc;

use repr_tag::{Child, Fill, Tag};

use crate::config::{Config, Layer};
use crate::dispatch::{Dispatcher, HandlerKind, Handled};
use crate::make::{self, Layout};
use crate::state::HreprState;
use crate::types::TypeInfo;
use crate::value::{Record, Value};
use crate::ReprError;

/// Transform applied to every value before it is represented.
pub type Preprocess = Rc<dyn Fn(Value, &mut Hrepr) -> Value>;

/// Transform applied to every rendered tag, with the value it came from.
pub type Postprocess = Rc<dyn Fn(Tag, &Value, &mut Hrepr) -> Tag>;

/// Elements kept at the end of a truncated sequence.
const NTRAIL: usize = 2;

/// Runs one top-level representation call.
///
/// Handlers receive the runner and call [`Hrepr::represent`] for nested
/// values, so all of them share the same [`HreprState`].
pub struct Hrepr {
    dispatcher: Rc<Dispatcher>,
    config: Config,
    state: HreprState,
    preprocess: Option<Preprocess>,
    postprocess: Option<Postprocess>,
}

impl Hrepr {
    pub fn new(dispatcher: Rc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            config: Config::default(),
            state: HreprState::new(),
            preprocess: None,
            postprocess: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_preprocess(mut self, preprocess: Option<Preprocess>) -> Self {
        self.preprocess = preprocess;
        self
    }

    pub fn with_postprocess(mut self, postprocess: Option<Postprocess>) -> Self {
        self.postprocess = postprocess;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &HreprState {
        &self.state
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Represent `value` with the current configuration.
    pub fn represent(&mut self, value: &Value) -> Result<Tag, ReprError> {
        let value = match self.preprocess.clone() {
            Some(preprocess) => preprocess(value.clone(), self),
            None => value.clone(),
        };

        let id = value.identity();
        if let Some(id) = id {
            if self.state.is_active(id) {
                tracing::trace!(ty = %value.type_info(), "cycle detected");
                return self.make_ref(&value, id, true);
            }
            if !matches!(value, Value::Tag(_)) && self.state.registered(id) && !self.config.norefs() {
                return self.make_ref(&value, id, false);
            }
        }

        self.state.push(id);
        let truncate = self
            .config
            .max_depth()
            .is_some_and(|max_depth| self.state.depth() >= max_depth);
        let result = if truncate {
            self.short(&value)
        } else {
            self.full(&value)
        };
        self.state.pop(id);
        let mut tag = result?;

        if let Some(postprocess) = self.postprocess.clone() {
            tag = postprocess(tag, &value, self);
            if let Some(id) = id {
                self.state.reregister(id, &tag);
            }
        }

        let resources = self.resources_for(&value);
        if !resources.is_empty() {
            tag = tag.fill(Fill::new().resources(resources));
            if let Some(id) = id {
                self.state.reregister(id, &tag);
            }
        }
        Ok(tag)
    }

    /// Represent `value` with extra settings layered on the configuration.
    pub fn represent_with(&mut self, value: &Value, overrides: Layer) -> Result<Tag, ReprError> {
        let saved = self.config.clone();
        self.config = saved.with_config(overrides);
        let result = self.represent(value);
        self.config = saved;
        result
    }

    /// Full form of `value`, falling back to the short form on decline.
    ///
    /// Resolution order: handlers registered for the type chain, the
    /// value's own hooks, the record layout, handlers on the root type.
    pub fn full(&mut self, value: &Value) -> Result<Tag, ReprError> {
        let ty = value.type_info();
        let handled = if let Some(handler) = self.dispatcher.lookup(HandlerKind::Full, &ty) {
            handler(value, self)?
        } else if let Some(hooks) = value.as_representable() {
            hooks.represent(self)?
        } else if let Value::Record(record) = value {
            self.record(record)?.into()
        } else if let Some(handler) = self.dispatcher.lookup_root(HandlerKind::Full, &ty) {
            handler(value, self)?
        } else {
            Handled::Declined
        };

        match handled {
            Handled::Node(node) => {
                let tag = expect_tag(&ty, node)?;
                if let Some(id) = value.identity() {
                    self.state.register(id, value, &tag);
                }
                Ok(tag)
            }
            Handled::Declined => self.short(value),
        }
    }

    /// Short form of `value`.
    pub fn short(&mut self, value: &Value) -> Result<Tag, ReprError> {
        self.short_form(value, true)
    }

    /// Reference previews pass `register = false`: the registry must keep
    /// pointing at the first complete rendering.
    fn short_form(&mut self, value: &Value, register: bool) -> Result<Tag, ReprError> {
        let ty = value.type_info();
        if let Some(handler) = self.dispatcher.lookup(HandlerKind::Short, &ty) {
            if let Handled::Node(node) = handler(value, self)? {
                return expect_tag(&ty, node);
            }
        }
        if let Some(hooks) = value.as_representable() {
            if let Handled::Node(node) = hooks.represent_short(self)? {
                return expect_tag(&ty, node);
            }
        }
        if let Value::Record(record) = value {
            return Ok(make::instance(
                record.type_info().name(),
                vec![make::ellipsis()],
                Layout::Short,
            ));
        }
        if let Some(handler) = self.dispatcher.lookup_root(HandlerKind::Short, &ty) {
            if let Handled::Node(node) = handler(value, self)? {
                return expect_tag(&ty, node);
            }
        }

        let description = match value {
            Value::Object(object) => object.describe(),
            _ => None,
        };
        let tag = make::default_short(&ty.qualname(), description.as_deref());
        if let Some(id) = value.identity().filter(|_| register) {
            self.state.register(id, value, &tag);
        }
        Ok(tag)
    }

    /// Reference marker for an object seen before in this call.
    fn make_ref(&mut self, value: &Value, id: usize, is_loop: bool) -> Result<Tag, ReprError> {
        let num = self.state.get_ref(id);
        if self.config.shortrefs() {
            Ok(make::reference(num, is_loop, None))
        } else {
            let preview = self.short_form(value, false)?;
            Ok(make::reference(num, is_loop, Some(preview)))
        }
    }

    fn resources_for(&self, value: &Value) -> Vec<Tag> {
        let ty = value.type_info();
        let mut resources = match self.dispatcher.lookup_resources(&ty) {
            Some(provider) => provider(&ty),
            None => Vec::new(),
        };
        if let Some(hooks) = value.as_representable() {
            resources.extend(hooks.resources());
        }
        resources
    }

    /// Represent each item, eliding the middle of long sequences.
    pub fn sequence(&mut self, items: &[Value]) -> Result<Vec<Tag>, ReprError> {
        self.sequence_with(items, |hrepr, item| hrepr.represent(item))
    }

    /// Like [`Hrepr::sequence`] with a custom transform.
    ///
    /// With `sequence_max = n` and more than `n` items, the first `n - 2`
    /// and the last 2 are kept around an ellipsis.
    pub fn sequence_with<T, F>(&mut self, items: &[T], mut transform: F) -> Result<Vec<Tag>, ReprError>
    where
        F: FnMut(&mut Hrepr, &T) -> Result<Tag, ReprError>,
    {
        let cap = self
            .config
            .int("sequence_max")
            .and_then(|cap| usize::try_from(cap).ok())
            .filter(|&cap| cap > 0 && cap >= NTRAIL);

        match cap {
            Some(cap) if items.len() > cap => {
                let mut out = Vec::with_capacity(cap + 1);
                for item in &items[..cap - NTRAIL] {
                    out.push(transform(self, item)?);
                }
                out.push(make::ellipsis());
                for item in &items[items.len() - NTRAIL..] {
                    out.push(transform(self, item)?);
                }
                Ok(out)
            }
            _ => items.iter().map(|item| transform(self, item)).collect(),
        }
    }

    /// The `instance` box for a record: one `name=value` pair per field.
    pub fn record(&mut self, record: &Record) -> Result<Tag, ReprError> {
        let fields = self.sequence_with(record.fields(), |hrepr, (name, value)| {
            let value = hrepr.represent(value)?;
            Ok(make::pair(make::atom(name.as_str(), Some("symbol")), value, "="))
        })?;
        Ok(make::instance(record.type_info().name(), fields, Layout::Vertical))
    }
}

/// Check that a handler produced a tag.
fn expect_tag(ty: &TypeInfo, node: Child) -> Result<Tag, ReprError> {
    match node {
        Child::Tag(tag) => Ok(tag),
        other => Err(ReprError::NotATag {
            type_name: ty.qualname(),
            found: other.kind().to_string(),
        }),
    }
}
