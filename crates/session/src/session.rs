#![forbid(unsafe_code)]

use crate::error::SessionError;
use crate::events::StructuralEvent;
use canopy_core::drag::{DragCoordinator, DropPlan, DualTreeView, apply_plan};
use canopy_core::ids::{PageId, PaneId, WorkspaceId};
use canopy_core::tree::{
    FlattenedItem, PageMeta, PageTree, TreeDestinationPosition, TreeViewNode, flatten, remove,
};
use canopy_storage::{MovePageRequest, PageRow, SqliteStore};
use std::collections::{BTreeMap, BTreeSet};

/// What a completed drop amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Moved { cross_pane: bool },
    /// The gesture ended without a resolvable slot, or the plan had gone
    /// stale; nothing was persisted.
    NoChange,
}

/// One client's working copy of the page hierarchy: the rendered panes, the
/// drag gesture over them, and the snapshot that makes a failed drop cheap to
/// undo. Mutations are applied to the view first and to the store second;
/// a store refusal restores the whole pre-drag view in one assignment.
pub struct PageSession {
    workspace: WorkspaceId,
    view: DualTreeView,
    coordinator: DragCoordinator,
    snapshot: Option<DualTreeView>,
}

impl PageSession {
    /// Assemble the panes from the workspace's persisted rows. Each pane is
    /// rooted at an existing page; its visible items are that root's
    /// descendants, ordered by the persisted `children_order` lists. Pages in
    /// `expanded` start expanded (when they have children to show).
    pub fn load(
        store: &SqliteStore,
        workspace: &WorkspaceId,
        panes: &[(PaneId, PageId)],
        expanded: &BTreeSet<PageId>,
    ) -> Result<Self, SessionError> {
        let rows = store.pages_list(workspace)?;
        let by_id: BTreeMap<&str, &PageRow> =
            rows.iter().map(|row| (row.id.as_str(), row)).collect();

        let mut view = DualTreeView::new();
        for (pane_id, root) in panes {
            let tree = build_pane(&by_id, root, expanded)?;
            if !view.add_pane(pane_id.clone(), tree) {
                return Err(SessionError::DuplicatePane);
            }
        }
        Ok(Self {
            workspace: workspace.clone(),
            view,
            coordinator: DragCoordinator::new(),
            snapshot: None,
        })
    }

    pub fn view(&self) -> &DualTreeView {
        &self.view
    }

    pub fn is_dragging(&self) -> bool {
        self.coordinator.is_dragging()
    }

    /// The pane's current render order, top to bottom.
    pub fn visible(&self, pane: &PaneId) -> Option<Vec<FlattenedItem>> {
        self.view.pane(pane).map(flatten)
    }

    pub fn set_expanded(
        &mut self,
        pane: &PaneId,
        page: &PageId,
        expanded: bool,
    ) -> Result<(), SessionError> {
        let tree = self.view.pane_mut(pane).ok_or(SessionError::UnknownPane)?;
        if !tree.set_expanded(page, expanded) {
            return Err(SessionError::NotFound);
        }
        Ok(())
    }

    /// Begin dragging the item at `flat_index` of `pane`. The pre-drag view
    /// is snapshotted before the coordinator collapses the dragged node.
    pub fn drag_start(&mut self, pane: &PaneId, flat_index: usize) -> bool {
        if self.coordinator.is_dragging() {
            return false;
        }
        let snapshot = self.view.clone();
        if self.coordinator.drag_start(&mut self.view, pane, flat_index) {
            self.snapshot = Some(snapshot);
            return true;
        }
        false
    }

    pub fn drag_update(&mut self, pane: &PaneId, dest_index: usize, requested_level: usize) {
        self.coordinator
            .drag_update(&self.view, pane, dest_index, requested_level);
    }

    pub fn drag_cancel(&mut self) {
        self.coordinator.drag_cancel(&mut self.view);
        self.snapshot = None;
    }

    /// Finish the gesture between two items and persist the move.
    pub fn drop_between(&mut self, store: &mut SqliteStore) -> Result<DropOutcome, SessionError> {
        match self.coordinator.drag_end(&self.view) {
            Some(plan) => self.commit(store, plan),
            None => {
                self.snapshot = None;
                Ok(DropOutcome::NoChange)
            }
        }
    }

    /// Finish the gesture by dropping onto `target`, making the dragged page
    /// its last child, and persist the move.
    pub fn drop_on(
        &mut self,
        store: &mut SqliteStore,
        pane: &PaneId,
        target: &PageId,
    ) -> Result<DropOutcome, SessionError> {
        match self.coordinator.drop_on_item(&self.view, pane, target) {
            Some(plan) => self.commit(store, plan),
            None => {
                self.snapshot = None;
                Ok(DropOutcome::NoChange)
            }
        }
    }

    fn commit(
        &mut self,
        store: &mut SqliteStore,
        plan: DropPlan,
    ) -> Result<DropOutcome, SessionError> {
        // Policy runs before the view or the store is touched; a decline puts
        // the collapsed drag node back via the snapshot.
        if let Some(reason) = self.policy_objection(&plan) {
            self.restore_snapshot();
            return Err(SessionError::PolicyDeclined { reason });
        }
        if !apply_plan(&mut self.view, &plan) {
            self.restore_snapshot();
            return Ok(DropOutcome::NoChange);
        }
        let request = MovePageRequest {
            id: plan.page.as_str().to_string(),
            new_parent_id: Some(plan.destination.parent_id.as_str().to_string()),
            new_index: plan.destination.index,
        };
        match store.page_move(&self.workspace, request) {
            Ok(_) => {
                self.snapshot = None;
                Ok(DropOutcome::Moved {
                    cross_pane: plan.is_cross_pane(),
                })
            }
            Err(err) => {
                self.restore_snapshot();
                Err(SessionError::Store(err))
            }
        }
    }

    fn policy_objection(&self, plan: &DropPlan) -> Option<&'static str> {
        let bound = self
            .view
            .pane(&plan.source_pane)
            .and_then(|tree| tree.node(&plan.page))
            .is_some_and(|node| node.data.address_bound);
        if !bound {
            return None;
        }
        if plan.is_cross_pane() {
            return Some("a page with a bound address cannot change panes");
        }
        let dest_tree = self.view.pane(&plan.dest_pane)?;
        if plan.destination.parent_id != *dest_tree.root_id() {
            return Some("a page with a bound address must stay at the top level");
        }
        None
    }

    fn restore_snapshot(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            self.view = snapshot;
        }
    }

    /// Fold in a structural change made by another session. Events naming
    /// pages or parents this view does not hold are dropped: the usual cause
    /// is a concurrent delete that already removed them here. An active drag
    /// is cancelled first so its snapshot cannot go stale.
    pub fn apply_remote(&mut self, event: &StructuralEvent) -> bool {
        if self.coordinator.is_dragging() {
            self.coordinator.drag_cancel(&mut self.view);
            self.snapshot = None;
        }
        match event {
            StructuralEvent::Created {
                page_id,
                parent_id,
                index,
                title,
                address_bound,
            } => {
                let (Ok(page), Ok(parent)) =
                    (PageId::try_new(page_id), PageId::try_new(parent_id))
                else {
                    return false;
                };
                let Some(pane) = self.view.pane_of(&parent).cloned() else {
                    return false;
                };
                let Some(tree) = self.view.pane_mut(&pane) else {
                    return false;
                };
                if tree.contains(&page) {
                    return false;
                }
                let index = index.map(|index| {
                    let len = tree.node(&parent).map_or(0, |node| node.children.len());
                    index.min(len)
                });
                let node = TreeViewNode::new(
                    page,
                    PageMeta {
                        title: title.clone(),
                        address_bound: *address_bound,
                    },
                );
                tree.attach(node, &parent, index)
            }
            StructuralEvent::Deleted { page_id } => {
                let Ok(page) = PageId::try_new(page_id) else {
                    return false;
                };
                let Some(pane) = self.view.pane_of(&page).cloned() else {
                    return false;
                };
                let Some(tree) = self.view.pane_mut(&pane) else {
                    return false;
                };
                let Some(source) = tree.position_of(&page) else {
                    return false;
                };
                if remove(tree, &source).is_none() {
                    return false;
                }
                tree.take_subtree(&page);
                true
            }
            StructuralEvent::Moved {
                page_id,
                new_parent_id,
                new_index,
            } => {
                let (Ok(page), Ok(parent)) =
                    (PageId::try_new(page_id), PageId::try_new(new_parent_id))
                else {
                    return false;
                };
                let Some(source_pane) = self.view.pane_of(&page).cloned() else {
                    return false;
                };
                let Some(dest_pane) = self.view.pane_of(&parent).cloned() else {
                    return false;
                };
                let Some(source) = self
                    .view
                    .pane(&source_pane)
                    .and_then(|tree| tree.position_of(&page))
                else {
                    return false;
                };
                let plan = DropPlan {
                    page,
                    source_pane,
                    source,
                    dest_pane,
                    destination: TreeDestinationPosition {
                        parent_id: parent,
                        index: *new_index,
                    },
                };
                apply_plan(&mut self.view, &plan)
            }
        }
    }

    pub fn apply_remote_json(&mut self, payload: &str) -> bool {
        match StructuralEvent::from_json(payload) {
            Ok(event) => self.apply_remote(&event),
            Err(_) => false,
        }
    }
}

fn build_pane(
    rows: &BTreeMap<&str, &PageRow>,
    root: &PageId,
    expanded: &BTreeSet<PageId>,
) -> Result<PageTree, SessionError> {
    let root_row = rows.get(root.as_str()).copied().ok_or(SessionError::NotFound)?;
    let mut tree = PageTree::new(root.clone());
    let mut pending: Vec<(PageId, &PageRow)> = vec![(root.clone(), root_row)];
    while let Some((parent_id, parent_row)) = pending.pop() {
        for child in &parent_row.children_order {
            // Order entries without a row were deleted concurrently; skip.
            let Some(child_row) = rows.get(child.as_str()).copied() else {
                continue;
            };
            let Ok(child_id) = PageId::try_new(child) else {
                continue;
            };
            let mut node = TreeViewNode::new(
                child_id.clone(),
                PageMeta {
                    title: child_row.title.clone(),
                    address_bound: child_row.address_bound,
                },
            );
            node.has_children = !child_row.children_order.is_empty();
            node.is_expanded = node.has_children && expanded.contains(&child_id);
            tree.attach(node, &parent_id, None);
            pending.push((child_id, child_row));
        }
    }
    Ok(tree)
}
