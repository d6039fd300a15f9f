#![forbid(unsafe_code)]

use super::super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::params;

impl SqliteStore {
    /// Reparent and/or reorder a page. Rejects any move that would place the
    /// page inside its own subtree before touching a row. The page's mpath
    /// and every descendant's are rewritten in the same transaction as the
    /// sibling-order splices, so readers never observe a half-moved subtree.
    pub fn page_move(
        &mut self,
        workspace: &WorkspaceId,
        request: MovePageRequest,
    ) -> Result<PageRow, StoreError> {
        let page_id = canonicalize_page_id(&request.id)?;
        let new_parent_id = request
            .new_parent_id
            .as_deref()
            .map(canonicalize_page_id)
            .transpose()?;
        let now_ms = now_ms();

        let tx = self.conn.transaction()?;
        let Some(page) = load_page(&tx, workspace.as_str(), page_id.as_str())? else {
            return Err(StoreError::NotFound);
        };

        let new_parent = match new_parent_id.as_ref() {
            Some(parent_id) => {
                let Some(parent) = load_page(&tx, workspace.as_str(), parent_id.as_str())?
                else {
                    return Err(StoreError::ParentNotFound);
                };
                // A parent whose mpath extends the moved page's is the page
                // itself or one of its descendants.
                if parent.mpath.starts_with(&page.mpath) {
                    return Err(StoreError::CyclicMove);
                }
                Some(parent)
            }
            None => None,
        };

        let new_mpath = match new_parent.as_ref() {
            Some(parent) => child_mpath(&parent.mpath, page_id.as_str()),
            None => root_mpath(page_id.as_str()),
        };

        // Sibling-order maintenance. A same-parent reorder works on one list
        // so the removal happens before the insertion index is applied.
        let old_parent_id = page.parent_id.clone();
        let new_parent_key = new_parent.as_ref().map(|parent| parent.id.clone());
        if old_parent_id == new_parent_key {
            if let Some(parent) = new_parent.as_ref() {
                let mut order = parent.children_order.clone();
                support::order::splice_out(&mut order, page_id.as_str());
                support::order::splice_in(&mut order, page_id.as_str(), request.new_index);
                write_children_order_tx(&tx, workspace.as_str(), &parent.id, &order, now_ms)?;
            }
        } else {
            if let Some(old_parent_id) = old_parent_id.as_deref()
                && let Some(old_parent) = load_page(&tx, workspace.as_str(), old_parent_id)?
            {
                let mut order = old_parent.children_order;
                if support::order::splice_out(&mut order, page_id.as_str()) {
                    write_children_order_tx(
                        &tx,
                        workspace.as_str(),
                        old_parent_id,
                        &order,
                        now_ms,
                    )?;
                }
            }
            if let Some(parent) = new_parent.as_ref() {
                let mut order = parent.children_order.clone();
                support::order::splice_in(&mut order, page_id.as_str(), request.new_index);
                write_children_order_tx(&tx, workspace.as_str(), &parent.id, &order, now_ms)?;
            }
        }

        // Denormalized mpath: rewrite the whole subtree in place. The page's
        // own row matches the prefix too, with an empty remainder.
        let old_prefix_len = i64::try_from(page.mpath.len())
            .map_err(|_| StoreError::InvalidInput("mpath too long"))?;
        tx.execute(
            r#"
            UPDATE pages
            SET mpath = ?3 || substr(mpath, ?4 + 1)
            WHERE workspace=?1 AND mpath LIKE ?2 || '%'
            "#,
            params![workspace.as_str(), page.mpath, new_mpath, old_prefix_len],
        )?;
        tx.execute(
            "UPDATE pages SET parent_id=?3, updated_at_ms=?4 WHERE workspace=?1 AND id=?2",
            params![
                workspace.as_str(),
                page_id.as_str(),
                new_parent_key,
                now_ms
            ],
        )?;

        let moved = load_page(&tx, workspace.as_str(), page_id.as_str())?
            .ok_or(StoreError::NotFound)?;
        tx.commit()?;
        Ok(moved)
    }
}
