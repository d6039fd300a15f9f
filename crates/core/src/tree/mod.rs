#![forbid(unsafe_code)]

mod flatten;
mod mutate;
mod nesting;
mod position;

pub use flatten::{FlattenedItem, flatten};
pub use mutate::{insert, move_node, remove};
pub use nesting::{NestingWindow, resolve_nesting};
pub use position::{destination_path, destination_position, destination_window, source_position};

use crate::ids::PageId;
use std::collections::BTreeMap;

/// Render-only payload carried alongside a tree node. Decoupled from the
/// persisted record; rebuilt whenever the tree is reloaded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub address_bound: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeViewNode {
    pub id: PageId,
    pub children: Vec<PageId>,
    /// True when the persisted record has children, even if they are not
    /// loaded into `children` yet.
    pub has_children: bool,
    pub is_expanded: bool,
    pub data: PageMeta,
}

impl TreeViewNode {
    pub fn new(id: PageId, data: PageMeta) -> Self {
        Self {
            id,
            children: Vec::new(),
            has_children: false,
            is_expanded: false,
            data,
        }
    }
}

/// Adjacency map keyed by page id with a designated root. The root itself is
/// never rendered; top-level items are the root's children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageTree {
    root: PageId,
    nodes: BTreeMap<PageId, TreeViewNode>,
}

/// Position of an existing node: its parent plus its index among siblings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeSourcePosition {
    pub parent_id: PageId,
    pub index: usize,
}

/// Target position for an insert or move. `index: None` means append as the
/// last child (the "combine" drag outcome).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeDestinationPosition {
    pub parent_id: PageId,
    pub index: Option<usize>,
}

impl PageTree {
    pub fn new(root: PageId) -> Self {
        let mut nodes = BTreeMap::new();
        let mut root_node = TreeViewNode::new(root.clone(), PageMeta::default());
        root_node.is_expanded = true;
        nodes.insert(root.clone(), root_node);
        Self { root, nodes }
    }

    pub fn root_id(&self) -> &PageId {
        &self.root
    }

    pub fn contains(&self, id: &PageId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &PageId) -> Option<&TreeViewNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &PageId) -> Option<&mut TreeViewNode> {
        self.nodes.get_mut(id)
    }

    pub fn set_expanded(&mut self, id: &PageId, expanded: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.is_expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Register a node and link it under `parent_id`. Returns false (tree
    /// unchanged) when the parent is unknown, the id is already present, or
    /// the index is out of range.
    pub fn attach(
        &mut self,
        node: TreeViewNode,
        parent_id: &PageId,
        index: Option<usize>,
    ) -> bool {
        if self.nodes.contains_key(&node.id) || !self.nodes.contains_key(parent_id) {
            return false;
        }
        let id = node.id.clone();
        {
            let parent = match self.nodes.get_mut(parent_id) {
                Some(parent) => parent,
                None => return false,
            };
            match index {
                Some(index) if index > parent.children.len() => return false,
                Some(index) => parent.children.insert(index, id.clone()),
                None => parent.children.push(id.clone()),
            }
            parent.has_children = true;
        }
        self.nodes.insert(id, node);
        true
    }

    /// Walk child indices from the root. An empty path resolves to the root.
    pub fn id_at_path(&self, path: &[usize]) -> Option<&PageId> {
        let mut current = &self.root;
        for &index in path {
            let node = self.nodes.get(current)?;
            current = node.children.get(index)?;
        }
        Some(current)
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&TreeViewNode> {
        let id = self.id_at_path(path)?;
        self.nodes.get(id)
    }

    /// Ids of `id` plus every descendant reachable through `children`, in
    /// pre-order.
    pub fn subtree_ids(&self, id: &PageId) -> Vec<PageId> {
        let mut out = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                for child in node.children.iter().rev() {
                    stack.push(child.clone());
                }
            }
            out.push(current);
        }
        out
    }

    /// Detach `id` and its descendants from the node map. The caller is
    /// responsible for having already unlinked `id` from its parent's child
    /// list. Returns the removed nodes in pre-order.
    pub fn take_subtree(&mut self, id: &PageId) -> Vec<TreeViewNode> {
        let ids = self.subtree_ids(id);
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(node) = self.nodes.remove(&id) {
                out.push(node);
            }
        }
        out
    }

    /// Absorb nodes detached from another tree. Links between them are
    /// whatever their `children` lists already say; only the subtree root
    /// needs a subsequent [`insert`] to appear in the render order.
    pub fn adopt(&mut self, nodes: Vec<TreeViewNode>) {
        for node in nodes {
            self.nodes.insert(node.id.clone(), node);
        }
    }

    /// Position of an existing node, derived from the adjacency map rather
    /// than a flattened list.
    pub fn position_of(&self, id: &PageId) -> Option<TreeSourcePosition> {
        for node in self.nodes.values() {
            if let Some(index) = node.children.iter().position(|child| child == id) {
                return Some(TreeSourcePosition {
                    parent_id: node.id.clone(),
                    index,
                });
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}
