#![forbid(unsafe_code)]

use super::PageTree;
use crate::ids::PageId;

/// One row of the rendered list. `path` is positional (child indices from the
/// root's child list downward) and is recomputed on every flatten; it is never
/// persisted. `path.len()` is the 1-based nesting level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlattenedItem {
    pub id: PageId,
    pub path: Vec<usize>,
}

impl FlattenedItem {
    pub fn level(&self) -> usize {
        self.path.len()
    }
}

/// Depth-first pre-order traversal honoring expansion state: collapsed nodes
/// contribute themselves and none of their descendants. Deterministic for a
/// given tree, so two calls on an unmodified tree yield identical lists.
pub fn flatten(tree: &PageTree) -> Vec<FlattenedItem> {
    let mut out = Vec::new();
    let root = tree.root_id().clone();
    if let Some(root_node) = tree.node(&root) {
        for (index, child) in root_node.children.iter().enumerate() {
            emit(tree, child, vec![index], &mut out);
        }
    }
    out
}

fn emit(tree: &PageTree, id: &PageId, path: Vec<usize>, out: &mut Vec<FlattenedItem>) {
    let Some(node) = tree.node(id) else {
        return;
    };
    out.push(FlattenedItem {
        id: id.clone(),
        path: path.clone(),
    });
    if !node.is_expanded {
        return;
    }
    for (index, child) in node.children.iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(index);
        emit(tree, child, child_path, out);
    }
}
