#![forbid(unsafe_code)]

use super::super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// True when `id` sits inside the subtree rooted at `root_id`, the root
    /// itself included. A single mpath prefix test against the root's
    /// materialized path.
    pub fn page_in_subtree(
        &self,
        workspace: &WorkspaceId,
        id: &str,
        root_id: &str,
    ) -> Result<bool, StoreError> {
        let page_id = canonicalize_page_id(id)?;
        let root_id = canonicalize_page_id(root_id)?;

        let root_mpath: Option<String> = self
            .conn
            .query_row(
                "SELECT mpath FROM pages WHERE workspace=?1 AND id=?2",
                params![workspace.as_str(), root_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(root_mpath) = root_mpath else {
            return Err(StoreError::NotFound);
        };

        let page_mpath: Option<String> = self
            .conn
            .query_row(
                "SELECT mpath FROM pages WHERE workspace=?1 AND id=?2",
                params![workspace.as_str(), page_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(page_mpath) = page_mpath else {
            return Err(StoreError::NotFound);
        };

        Ok(page_mpath.starts_with(&root_mpath))
    }
}
