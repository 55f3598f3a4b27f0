//! Per-call bookkeeping

use std::collections::HashMap;

use repr_tag::Tag;

use crate::value::{Identity, Value};

/// State shared by every recursive step of one top-level call.
///
/// - `stack` counts how many times each object is currently being rendered;
///   a nonzero count on entry means a cycle.
/// - `registry` maps finished objects to their rendered tag. It also holds
///   the value itself so its address cannot be reused during the call.
/// - `refs` hands out reference numbers in order of first re-encounter.
#[derive(Debug)]
pub struct HreprState {
    stack: HashMap<Identity, usize>,
    registry: HashMap<Identity, (Value, Tag)>,
    refs: HashMap<Identity, usize>,
    depth: i64,
}

impl Default for HreprState {
    fn default() -> Self {
        Self {
            stack: HashMap::new(),
            registry: HashMap::new(),
            refs: HashMap::new(),
            depth: -1,
        }
    }
}

impl HreprState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference number for `id`, allocating the next one if needed.
    pub fn get_ref(&mut self, id: Identity) -> usize {
        let next = self.refs.len() + 1;
        *self.refs.entry(id).or_insert_with(|| {
            tracing::trace!(num = next, "allocated reference number");
            next
        })
    }

    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    pub fn is_active(&self, id: Identity) -> bool {
        self.stack.get(&id).is_some_and(|&n| n > 0)
    }

    pub fn registered(&self, id: Identity) -> bool {
        self.registry.contains_key(&id)
    }

    /// Record the first rendering of `value`. Later calls are ignored.
    pub fn register(&mut self, id: Identity, value: &Value, tag: &Tag) {
        self.registry
            .entry(id)
            .or_insert_with(|| (value.clone(), tag.clone()));
    }

    /// Replace the tag of an object that is already registered.
    pub fn reregister(&mut self, id: Identity, tag: &Tag) {
        if let Some(entry) = self.registry.get_mut(&id) {
            entry.1 = tag.clone();
        }
    }

    pub fn registered_tag(&self, id: Identity) -> Option<&Tag> {
        self.registry.get(&id).map(|(_, tag)| tag)
    }

    /// Enter an object. Scalars (no identity) only change the depth.
    pub(crate) fn push(&mut self, id: Option<Identity>) {
        if let Some(id) = id {
            *self.stack.entry(id).or_default() += 1;
        }
        self.depth += 1;
    }

    pub(crate) fn pop(&mut self, id: Option<Identity>) {
        if let Some(id) = id {
            if let Some(n) = self.stack.get_mut(&id) {
                *n = n.saturating_sub(1);
            }
        }
        self.depth -= 1;
    }

    /// Current depth; `-1` outside of any call, `0` at the root.
    pub fn depth(&self) -> i64 {
        self.depth
    }

    /// Map from the identity of each referenced rendered tag to its
    /// reference number.
    pub fn make_refmap(&self) -> HashMap<usize, usize> {
        self.refs
            .iter()
            .filter_map(|(id, &label)| {
                self.registry_tag_ptr(*id).map(|ptr| (ptr, label))
            })
            .collect()
    }

    fn registry_tag_ptr(&self, id: Identity) -> Option<usize> {
        self.registered_tag(id).map(Tag::ptr_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repr_tag::H;

    #[test]
    fn test_refs_are_sequential_and_stable() {
        let mut state = HreprState::new();
        assert_eq!(state.get_ref(100), 1);
        assert_eq!(state.get_ref(200), 2);
        assert_eq!(state.get_ref(100), 1);
        assert_eq!(state.ref_count(), 2);
    }

    #[test]
    fn test_stack_counts() {
        let mut state = HreprState::new();
        assert_eq!(state.depth(), -1);
        state.push(Some(7));
        state.push(Some(7));
        assert!(state.is_active(7));
        assert_eq!(state.depth(), 1);
        state.pop(Some(7));
        assert!(state.is_active(7));
        state.pop(Some(7));
        assert!(!state.is_active(7));
        assert_eq!(state.depth(), -1);
    }

    #[test]
    fn test_register_keeps_first_and_reregister_replaces() {
        let mut state = HreprState::new();
        let value = Value::list([]);
        let id = value.identity().unwrap_or_default();
        let first = H.div();
        let second = H.span();
        state.register(id, &value, &first);
        state.register(id, &value, &second);
        assert!(state.registered_tag(id).is_some_and(|t| t.ptr_eq(&first)));

        state.reregister(id, &second);
        assert!(state.registered_tag(id).is_some_and(|t| t.ptr_eq(&second)));

        state.reregister(12345, &first);
        assert!(!state.registered(12345));
    }

    #[test]
    fn test_refmap_keys_on_rendered_tags() {
        let mut state = HreprState::new();
        let value = Value::list([]);
        let id = value.identity().unwrap_or_default();
        let tag = H.div();
        state.register(id, &value, &tag);
        state.get_ref(id);
        state.get_ref(999);
        let refmap = state.make_refmap();
        assert_eq!(refmap.len(), 1);
        assert_eq!(refmap.get(&tag.ptr_id()), Some(&1));
    }
}
