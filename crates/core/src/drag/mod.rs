#![forbid(unsafe_code)]


use crate::ids::{PageId, PaneId};
use crate::tree::{
    self, NestingWindow, PageTree, TreeDestinationPosition, TreeSourcePosition,
    destination_position, destination_window, flatten, source_position,
};
use std::collections::BTreeMap;

/// The independently rooted trees rendered together in one region (e.g. a
/// private pane and a public pane). Cloned wholesale for pre-drag snapshots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DualTreeView {
    panes: BTreeMap<PaneId, PageTree>,
}

impl DualTreeView {
    pub fn new() -> Self {
        Self {
            panes: BTreeMap::new(),
        }
    }

    pub fn add_pane(&mut self, id: PaneId, tree: PageTree) -> bool {
        if self.panes.contains_key(&id) {
            return false;
        }
        self.panes.insert(id, tree);
        true
    }

    pub fn pane(&self, id: &PaneId) -> Option<&PageTree> {
        self.panes.get(id)
    }

    pub fn pane_mut(&mut self, id: &PaneId) -> Option<&mut PageTree> {
        self.panes.get_mut(id)
    }

    pub fn panes(&self) -> impl Iterator<Item = (&PaneId, &PageTree)> {
        self.panes.iter()
    }

    pub fn pane_of(&self, page: &PageId) -> Option<&PaneId> {
        self.panes
            .iter()
            .find(|(_, tree)| tree.contains(page))
            .map(|(id, _)| id)
    }
}

impl Default for DualTreeView {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the gesture currently points: a pane, a flat slot in it, and the
/// window resolved for that slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingDrop {
    pub pane: PaneId,
    pub dest_index: usize,
    pub window: NestingWindow,
}

/// Gesture state. Destinations can only be resolved while a `Dragging` value
/// exists, so "drop with no active drag" is unrepresentable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragGesture {
    Idle,
    Dragging {
        page: PageId,
        source_pane: PaneId,
        source_index: usize,
        source: TreeSourcePosition,
        was_expanded: bool,
        pending: Option<PendingDrop>,
    },
}

/// The single mutation request a completed gesture produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropPlan {
    pub page: PageId,
    pub source_pane: PaneId,
    pub source: TreeSourcePosition,
    pub dest_pane: PaneId,
    pub destination: TreeDestinationPosition,
}

impl DropPlan {
    pub fn is_cross_pane(&self) -> bool {
        self.source_pane != self.dest_pane
    }
}

/// Drives one gesture at a time over a [`DualTreeView`]:
/// `idle -> drag_start -> drag_update* -> (drag_end | drop_on_item | drag_cancel)`.
#[derive(Clone, Debug)]
pub struct DragCoordinator {
    gesture: DragGesture,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self {
            gesture: DragGesture::Idle,
        }
    }

    pub fn gesture(&self) -> &DragGesture {
        &self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, DragGesture::Dragging { .. })
    }

    /// Begin a gesture on the item at `flat_index` of `pane`. The dragged
    /// node is forced collapsed in the working copy: only the single item,
    /// never its subtree, is visually relocated. Returns false (state
    /// unchanged) when a drag is already active or the index is stale.
    pub fn drag_start(&mut self, view: &mut DualTreeView, pane: &PaneId, flat_index: usize) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(tree) = view.pane(pane) else {
            return false;
        };
        let flat = flatten(tree);
        let Some(source) = source_position(tree, &flat, flat_index) else {
            return false;
        };
        let page = flat[flat_index].id.clone();

        let tree = match view.pane_mut(pane) {
            Some(tree) => tree,
            None => return false,
        };
        let was_expanded = match tree.node_mut(&page) {
            Some(node) => {
                let was = node.is_expanded;
                node.is_expanded = false;
                was
            }
            None => return false,
        };

        self.gesture = DragGesture::Dragging {
            page,
            source_pane: pane.clone(),
            source_index: flat_index,
            source,
            was_expanded,
            pending: None,
        };
        true
    }

    /// Re-resolve the drop window for the current pointer position.
    /// `requested_level` comes from the horizontal pointer displacement. An
    /// unresolvable update (unknown pane, stale index) keeps the previous
    /// pending drop: no depth change, never a crash.
    pub fn drag_update(
        &mut self,
        view: &DualTreeView,
        pane: &PaneId,
        dest_index: usize,
        requested_level: usize,
    ) {
        let DragGesture::Dragging {
            source_pane,
            source_index,
            pending,
            ..
        } = &mut self.gesture
        else {
            return;
        };
        let Some(tree) = view.pane(pane) else {
            return;
        };
        let flat = flatten(tree);
        let source = (pane == source_pane).then_some(*source_index);
        // Same-pane slots address the list containing the item; cross-pane
        // drops may also target the slot past the last row.
        let max_index = if source.is_some() {
            flat.len().saturating_sub(1)
        } else {
            flat.len()
        };
        if dest_index > max_index {
            return;
        }
        let window = destination_window(&flat, source, dest_index, requested_level);
        *pending = Some(PendingDrop {
            pane: pane.clone(),
            dest_index,
            window,
        });
    }

    /// Finish the gesture between two items, resolving the final position
    /// with the same window logic the updates used. Returns `None` when the
    /// gesture never produced a resolvable slot; the dragged node is left
    /// collapsed either way.
    pub fn drag_end(&mut self, view: &DualTreeView) -> Option<DropPlan> {
        let gesture = std::mem::replace(&mut self.gesture, DragGesture::Idle);
        let DragGesture::Dragging {
            page,
            source_pane,
            source,
            pending,
            ..
        } = gesture
        else {
            return None;
        };
        let pending = pending?;
        let dest_tree = view.pane(&pending.pane)?;
        let destination = destination_position(dest_tree, &pending.window.path)?;
        Some(DropPlan {
            page,
            source_pane,
            source,
            dest_pane: pending.pane,
            destination,
        })
    }

    /// Finish the gesture by dropping directly onto `target` (the combine
    /// outcome): the dragged item becomes `target`'s last child, bypassing
    /// the vertical-position math entirely. Refused when `target` sits inside
    /// the dragged subtree.
    pub fn drop_on_item(
        &mut self,
        view: &DualTreeView,
        pane: &PaneId,
        target: &PageId,
    ) -> Option<DropPlan> {
        let gesture = std::mem::replace(&mut self.gesture, DragGesture::Idle);
        let DragGesture::Dragging {
            page,
            source_pane,
            source,
            ..
        } = gesture
        else {
            return None;
        };
        let dest_tree = view.pane(pane)?;
        if !dest_tree.contains(target) {
            return None;
        }
        if *pane == source_pane {
            let source_tree = view.pane(&source_pane)?;
            if source_tree.subtree_ids(&page).contains(target) {
                return None;
            }
        }
        Some(DropPlan {
            page,
            source_pane,
            source,
            dest_pane: pane.clone(),
            destination: TreeDestinationPosition {
                parent_id: target.clone(),
                index: None,
            },
        })
    }

    /// Abandon the gesture: no mutation, and the dragged node gets its
    /// pre-drag expansion back.
    pub fn drag_cancel(&mut self, view: &mut DualTreeView) {
        let gesture = std::mem::replace(&mut self.gesture, DragGesture::Idle);
        if let DragGesture::Dragging {
            page,
            source_pane,
            was_expanded,
            ..
        } = gesture
            && let Some(tree) = view.pane_mut(&source_pane)
        {
            tree.set_expanded(&page, was_expanded);
        }
    }
}

impl Default for DragCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a drop plan to the view. A same-pane plan is a plain move; a
/// cross-pane plan removes the id from its old parent's child list in the
/// source pane, carries the whole subtree's nodes over, and splices the id
/// into the new parent's list in the destination pane. Returns false with the
/// view unchanged when the plan no longer matches the trees.
pub fn apply_plan(view: &mut DualTreeView, plan: &DropPlan) -> bool {
    if !plan.is_cross_pane() {
        let Some(tree) = view.pane_mut(&plan.source_pane) else {
            return false;
        };
        return tree::move_node(tree, &plan.source, &plan.destination).is_some();
    }

    if view.pane(&plan.dest_pane).is_none() {
        return false;
    }
    let Some(source_tree) = view.pane_mut(&plan.source_pane) else {
        return false;
    };
    let Some(removed) = tree::remove(source_tree, &plan.source) else {
        return false;
    };
    if removed != plan.page {
        let restore = TreeDestinationPosition {
            parent_id: plan.source.parent_id.clone(),
            index: Some(plan.source.index),
        };
        tree::insert(source_tree, &restore, &removed);
        return false;
    }
    let nodes = source_tree.take_subtree(&removed);

    let Some(dest_tree) = view.pane_mut(&plan.dest_pane) else {
        return false;
    };
    dest_tree.adopt(nodes.clone());
    if tree::insert(dest_tree, &plan.destination, &removed) {
        return true;
    }

    // Destination refused the splice; put everything back where it was.
    dest_tree.take_subtree(&removed);
    if let Some(source_tree) = view.pane_mut(&plan.source_pane) {
        source_tree.adopt(nodes);
        let restore = TreeDestinationPosition {
            parent_id: plan.source.parent_id.clone(),
            index: Some(plan.source.index),
        };
        tree::insert(source_tree, &restore, &removed);
    }
    false
}
