#![forbid(unsafe_code)]

use super::{PageTree, TreeDestinationPosition, TreeSourcePosition};
use crate::ids::PageId;

/// Splice the id at `position` out of its parent's child list. A parent left
/// childless also loses `has_children` and `is_expanded`. The node itself
/// stays registered in the tree so it can be re-inserted elsewhere.
///
/// Malformed positions leave the tree untouched and return `None`; hard
/// failure belongs to the persistence boundary, not here.
pub fn remove(tree: &mut PageTree, position: &TreeSourcePosition) -> Option<PageId> {
    let parent = tree.node_mut(&position.parent_id)?;
    if position.index >= parent.children.len() {
        return None;
    }
    let removed = parent.children.remove(position.index);
    if parent.children.is_empty() {
        parent.has_children = false;
        parent.is_expanded = false;
    }
    Some(removed)
}

/// Splice `id` into the parent's child list at `position.index`, clamped to
/// the list length. An omitted index appends, but only to a parent whose
/// children are actually loaded: appending to a node that reports children it
/// has not materialized would clobber the unfetched ones, so that case is
/// refused.
pub fn insert(tree: &mut PageTree, position: &TreeDestinationPosition, id: &PageId) -> bool {
    if !tree.contains(id) {
        return false;
    }
    let Some(parent) = tree.node_mut(&position.parent_id) else {
        return false;
    };
    match position.index {
        Some(index) => {
            let index = index.min(parent.children.len());
            parent.children.insert(index, id.clone());
        }
        None => {
            if parent.has_children && parent.children.is_empty() {
                return false;
            }
            parent.children.push(id.clone());
        }
    }
    parent.has_children = true;
    true
}

/// Remove-then-insert, in that order, so a move further down the same sibling
/// list measures its insertion index against the post-removal list. A failed
/// insert puts the node back where it was.
pub fn move_node(
    tree: &mut PageTree,
    source: &TreeSourcePosition,
    destination: &TreeDestinationPosition,
) -> Option<PageId> {
    let id = remove(tree, source)?;
    if insert(tree, destination, &id) {
        return Some(id);
    }
    let restore = TreeDestinationPosition {
        parent_id: source.parent_id.clone(),
        index: Some(source.index),
    };
    insert(tree, &restore, &id);
    None
}
