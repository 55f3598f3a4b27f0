//! Reference number injection
//!
//! Reference numbers are only known once the whole tree is built, so the
//! first occurrence of every referenced object is decorated afterwards.

use std::collections::HashMap;

use repr_tag::{Child, Tag};

use crate::make;

/// Wrap every tag whose identity appears in `refmap` in a `#N=` marker.
///
/// `refmap` maps [`Tag::ptr_id`] to reference numbers, as produced by
/// [`HreprState::make_refmap`](crate::HreprState::make_refmap). Subtrees
/// without referenced nodes are returned as is.
pub fn inject_reference_numbers(node: &Tag, refmap: &HashMap<usize, usize>) -> Tag {
    if refmap.is_empty() {
        return node.clone();
    }
    inject(node, refmap).unwrap_or_else(|| node.clone())
}

/// `None` when nothing under `node` changed.
fn inject(node: &Tag, refmap: &HashMap<usize, usize>) -> Option<Tag> {
    let mut changed = false;
    let mut children = Vec::with_capacity(node.children().len());
    for child in node.children() {
        match child {
            Child::Tag(tag) => match inject(tag, refmap) {
                Some(rewritten) => {
                    changed = true;
                    children.push(Child::Tag(rewritten));
                }
                None => children.push(child.clone()),
            },
            other => children.push(other.clone()),
        }
    }

    let rewritten = changed.then(|| node.replace_children(children));
    match refmap.get(&node.ptr_id()) {
        Some(&num) => {
            let content = rewritten.unwrap_or_else(|| node.clone());
            Some(make::reference(num, false, Some(content)))
        }
        None => rewritten,
    }
}
