//! Handler tables and type dispatch
//!
//! A [`Profile`] is a stack of [`HandlerTable`]s. Resolution walks the
//! value's type chain from most to least specific and, for each type,
//! consults the tables in priority order. The first hit wins, so a handler
//! for `bool` in the base table beats a handler for `int` in an overlay.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use repr_tag::{Child, Tag};

use crate::types::{TypeInfo, TypeKey};
use crate::value::Value;
use crate::{Hrepr, ReprError};

/// Outcome of a representation handler
#[derive(Debug, Clone)]
pub enum Handled {
    /// The rendered node. Anything but a tag is rejected by the runner.
    Node(Child),
    /// Fall through to the short form.
    Declined,
}

impl From<Tag> for Handled {
    fn from(tag: Tag) -> Self {
        Handled::Node(Child::Tag(tag))
    }
}

/// Representation hooks a value can implement itself.
///
/// Explicit registrations for the value's type take precedence.
pub trait Representable {
    fn represent(&self, hrepr: &mut Hrepr) -> Result<Handled, ReprError>;

    fn represent_short(&self, _hrepr: &mut Hrepr) -> Result<Handled, ReprError> {
        Ok(Handled::Declined)
    }

    /// Resources every rendering of this value needs.
    fn resources(&self) -> Vec<Tag> {
        Vec::new()
    }
}

/// A full-form or short-form handler
pub type Handler = Rc<dyn Fn(&Value, &mut Hrepr) -> Result<Handled, ReprError>>;

/// Resource provider for a type
pub type ResourceHandler = Rc<dyn Fn(&TypeInfo) -> Vec<Tag>>;

/// Which handler map to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Full,
    Short,
}

/// Handlers keyed by type
#[derive(Clone, Default)]
pub struct HandlerTable {
    full: HashMap<TypeKey, Handler>,
    short: HashMap<TypeKey, Handler>,
    resources: HashMap<TypeKey, ResourceHandler>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the full-form handler for `ty` and its subtypes.
    pub fn register<F>(&mut self, ty: &TypeInfo, handler: F) -> &mut Self
    where
        F: Fn(&Value, &mut Hrepr) -> Result<Handled, ReprError> + 'static,
    {
        self.full.insert(ty.key(), Rc::new(handler));
        self
    }

    /// Register the short-form handler for `ty` and its subtypes.
    pub fn register_short<F>(&mut self, ty: &TypeInfo, handler: F) -> &mut Self
    where
        F: Fn(&Value, &mut Hrepr) -> Result<Handled, ReprError> + 'static,
    {
        self.short.insert(ty.key(), Rc::new(handler));
        self
    }

    /// Register the resources attached to every rendering of `ty`.
    pub fn register_resources<F>(&mut self, ty: &TypeInfo, provider: F) -> &mut Self
    where
        F: Fn(&TypeInfo) -> Vec<Tag> + 'static,
    {
        self.resources.insert(ty.key(), Rc::new(provider));
        self
    }

    fn get(&self, kind: HandlerKind, key: TypeKey) -> Option<&Handler> {
        match kind {
            HandlerKind::Full => self.full.get(&key),
            HandlerKind::Short => self.short.get(&key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full.is_empty() && self.short.is_empty() && self.resources.is_empty()
    }
}

/// Base table plus overlays
#[derive(Clone, Default)]
pub struct Profile {
    /// Highest priority first.
    tables: Vec<Rc<HandlerTable>>,
}

impl Profile {
    pub fn new(base: HandlerTable) -> Self {
        Self {
            tables: vec![Rc::new(base)],
        }
    }

    /// A profile consulting `overlay` before everything in `self`.
    pub fn with_overlay(&self, overlay: HandlerTable) -> Profile {
        let mut tables = Vec::with_capacity(self.tables.len() + 1);
        tables.push(Rc::new(overlay));
        tables.extend(self.tables.iter().cloned());
        Profile { tables }
    }

    /// Combine two profiles; `other` takes priority.
    pub fn merge(&self, other: &Profile) -> Profile {
        let mut tables = other.tables.clone();
        tables.extend(self.tables.iter().cloned());
        Profile { tables }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn find(&self, kind: HandlerKind, key: TypeKey) -> Option<Handler> {
        self.tables
            .iter()
            .find_map(|table| table.get(kind, key))
            .cloned()
    }

    fn find_resources(&self, key: TypeKey) -> Option<ResourceHandler> {
        self.tables
            .iter()
            .find_map(|table| table.resources.get(&key))
            .cloned()
    }
}

/// Resolves handlers for types, caching results along the type chain.
///
/// Handlers registered on the root type are kept apart: they apply only
/// after a value's own hooks and the record fallback had their chance.
pub struct Dispatcher {
    profile: Profile,
    cache: RefCell<HashMap<(HandlerKind, TypeKey), Option<Handler>>>,
    resource_cache: RefCell<HashMap<TypeKey, Option<ResourceHandler>>>,
}

impl Dispatcher {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            cache: RefCell::new(HashMap::new()),
            resource_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Most specific handler for `ty`, ignoring the root type.
    pub fn lookup(&self, kind: HandlerKind, ty: &TypeInfo) -> Option<Handler> {
        if let Some(hit) = self.cache.borrow().get(&(kind, ty.key())) {
            return hit.clone();
        }

        let mut visited = Vec::new();
        let mut found = None;
        for t in ty.chain().filter(|t| !t.is_root()) {
            if let Some(hit) = self.cache.borrow().get(&(kind, t.key())) {
                found = hit.clone();
                break;
            }
            visited.push(t.key());
            if let Some(handler) = self.profile.find(kind, t.key()) {
                found = Some(handler);
                break;
            }
        }

        tracing::trace!(?kind, ty = ty.name(), hit = found.is_some(), "handler cache fill");
        let mut cache = self.cache.borrow_mut();
        for key in visited {
            cache.insert((kind, key), found.clone());
        }
        found
    }

    /// Handler registered on a root type (`object`).
    pub fn lookup_root(&self, kind: HandlerKind, ty: &TypeInfo) -> Option<Handler> {
        let root = ty.chain().last()?;
        self.profile.find(kind, root.key())
    }

    /// Resource provider for `ty`, including the root type.
    pub fn lookup_resources(&self, ty: &TypeInfo) -> Option<ResourceHandler> {
        if let Some(hit) = self.resource_cache.borrow().get(&ty.key()) {
            return hit.clone();
        }
        let found = ty
            .chain()
            .find_map(|t| self.profile.find_resources(t.key()));
        self.resource_cache
            .borrow_mut()
            .insert(ty.key(), found.clone());
        found
    }
}
