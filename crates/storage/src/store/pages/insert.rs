#![forbid(unsafe_code)]

use super::super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::params;

impl SqliteStore {
    /// Create a page under `parent_id` (or as a workspace root). The new
    /// page's mpath derives from the parent, and the parent's sibling order
    /// gains the id at `index`, both in one transaction.
    pub fn page_insert(
        &mut self,
        workspace: &WorkspaceId,
        request: InsertPageRequest,
    ) -> Result<PageRow, StoreError> {
        let page_id = canonicalize_page_id(&request.id)?;
        let parent_id = request
            .parent_id
            .as_deref()
            .map(canonicalize_page_id)
            .transpose()?;
        let title = request.title.trim().to_string();
        let now_ms = now_ms();

        let tx = self.conn.transaction()?;
        if load_page(&tx, workspace.as_str(), page_id.as_str())?.is_some() {
            return Err(StoreError::PageExists);
        }

        let mpath = match parent_id.as_ref() {
            Some(parent_id) => {
                let Some(parent) = load_page(&tx, workspace.as_str(), parent_id.as_str())?
                else {
                    return Err(StoreError::ParentNotFound);
                };
                let mut order = parent.children_order;
                support::order::splice_in(&mut order, page_id.as_str(), request.index);
                write_children_order_tx(
                    &tx,
                    workspace.as_str(),
                    parent_id.as_str(),
                    &order,
                    now_ms,
                )?;
                child_mpath(&parent.mpath, page_id.as_str())
            }
            None => root_mpath(page_id.as_str()),
        };

        tx.execute(
            r#"
            INSERT INTO pages(workspace, id, parent_id, mpath, children_order, title, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, '[]', ?5, ?6, ?6)
            "#,
            params![
                workspace.as_str(),
                page_id.as_str(),
                parent_id.as_ref().map(|id| id.as_str()),
                mpath,
                title,
                now_ms
            ],
        )?;
        tx.commit()?;

        Ok(PageRow {
            id: page_id.as_str().to_string(),
            parent_id: parent_id.map(|id| id.as_str().to_string()),
            mpath,
            children_order: Vec::new(),
            title,
            address_bound: false,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        })
    }
}
