#![forbid(unsafe_code)]

use super::super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::params;

impl SqliteStore {
    /// Delete a page and its entire subtree (every page whose mpath extends
    /// this one's). Dependent records — address bindings and collaboration
    /// grants — go first so no row ever references a deleted page, then the
    /// page rows, then the deleted id leaves its former parent's sibling
    /// order. One transaction for the lot. Returns how many pages went.
    pub fn page_delete(&mut self, workspace: &WorkspaceId, id: &str) -> Result<usize, StoreError> {
        let page_id = canonicalize_page_id(id)?;
        let now_ms = now_ms();

        let tx = self.conn.transaction()?;
        let Some(page) = load_page(&tx, workspace.as_str(), page_id.as_str())? else {
            return Err(StoreError::NotFound);
        };

        tx.execute(
            r#"
            DELETE FROM page_addresses
            WHERE workspace=?1 AND page_id IN (
              SELECT id FROM pages WHERE workspace=?1 AND mpath LIKE ?2 || '%'
            )
            "#,
            params![workspace.as_str(), page.mpath],
        )?;
        tx.execute(
            r#"
            DELETE FROM collab_grants
            WHERE workspace=?1 AND page_id IN (
              SELECT id FROM pages WHERE workspace=?1 AND mpath LIKE ?2 || '%'
            )
            "#,
            params![workspace.as_str(), page.mpath],
        )?;
        let deleted = tx.execute(
            "DELETE FROM pages WHERE workspace=?1 AND mpath LIKE ?2 || '%'",
            params![workspace.as_str(), page.mpath],
        )?;

        if let Some(parent_id) = page.parent_id.as_deref()
            && let Some(parent) = load_page(&tx, workspace.as_str(), parent_id)?
        {
            let mut order = parent.children_order;
            if support::order::splice_out(&mut order, page_id.as_str()) {
                write_children_order_tx(&tx, workspace.as_str(), parent_id, &order, now_ms)?;
            }
        }

        tx.commit()?;
        Ok(deleted)
    }
}
