#![forbid(unsafe_code)]

use super::super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::params;

impl SqliteStore {
    /// Every page of the workspace, ordered by mpath so ancestors precede
    /// their descendants. Callers assemble the render trees from
    /// `parent_id` + `children_order`.
    pub fn pages_list(&self, workspace: &WorkspaceId) -> Result<Vec<PageRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
              id, parent_id, mpath, children_order, title,
              EXISTS(
                SELECT 1 FROM page_addresses a
                WHERE a.workspace = pages.workspace AND a.page_id = pages.id
              ),
              created_at_ms, updated_at_ms
            FROM pages
            WHERE workspace=?1
            ORDER BY mpath
            "#,
        )?;
        let rows = stmt.query_map(params![workspace.as_str()], map_page_row)?;

        let mut out = Vec::new();
        for row in rows {
            let (mut page, raw_order) = row?;
            page.children_order = support::order::decode(&raw_order)?;
            out.push(page);
        }
        Ok(out)
    }
}
