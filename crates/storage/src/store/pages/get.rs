#![forbid(unsafe_code)]

use super::super::*;
use canopy_core::ids::WorkspaceId;

impl SqliteStore {
    pub fn page_get(
        &self,
        workspace: &WorkspaceId,
        id: &str,
    ) -> Result<Option<PageRow>, StoreError> {
        let page_id = canonicalize_page_id(id)?;
        load_page(&self.conn, workspace.as_str(), page_id.as_str())
    }
}
