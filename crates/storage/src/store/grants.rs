#![forbid(unsafe_code)]

use super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::params;

impl SqliteStore {
    /// Grant a collaborator a role on a page; re-granting updates the role.
    pub fn grant_add(
        &mut self,
        workspace: &WorkspaceId,
        page_id: &str,
        grantee: &str,
        role: &str,
    ) -> Result<GrantRow, StoreError> {
        let page_id = canonicalize_page_id(page_id)?;
        let grantee = grantee.trim();
        if grantee.is_empty() {
            return Err(StoreError::InvalidInput("grantee must not be empty"));
        }
        let role = role.trim();
        if role.is_empty() {
            return Err(StoreError::InvalidInput("role must not be empty"));
        }
        let now_ms = now_ms();

        let tx = self.conn.transaction()?;
        if load_page(&tx, workspace.as_str(), page_id.as_str())?.is_none() {
            return Err(StoreError::NotFound);
        }
        tx.execute(
            r#"
            INSERT INTO collab_grants(workspace, page_id, grantee, role, created_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(workspace, page_id, grantee) DO UPDATE SET role=excluded.role
            "#,
            params![workspace.as_str(), page_id.as_str(), grantee, role, now_ms],
        )?;
        tx.commit()?;

        Ok(GrantRow {
            page_id: page_id.as_str().to_string(),
            grantee: grantee.to_string(),
            role: role.to_string(),
            created_at_ms: now_ms,
        })
    }

    pub fn grant_revoke(
        &mut self,
        workspace: &WorkspaceId,
        page_id: &str,
        grantee: &str,
    ) -> Result<bool, StoreError> {
        let page_id = canonicalize_page_id(page_id)?;
        let removed = self.conn.execute(
            "DELETE FROM collab_grants WHERE workspace=?1 AND page_id=?2 AND grantee=?3",
            params![workspace.as_str(), page_id.as_str(), grantee.trim()],
        )?;
        Ok(removed > 0)
    }

    pub fn grants_list(
        &self,
        workspace: &WorkspaceId,
        page_id: &str,
    ) -> Result<Vec<GrantRow>, StoreError> {
        let page_id = canonicalize_page_id(page_id)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT page_id, grantee, role, created_at_ms
            FROM collab_grants
            WHERE workspace=?1 AND page_id=?2
            ORDER BY grantee
            "#,
        )?;
        let rows = stmt.query_map(params![workspace.as_str(), page_id.as_str()], |row| {
            Ok(GrantRow {
                page_id: row.get(0)?,
                grantee: row.get(1)?,
                role: row.get(2)?,
                created_at_ms: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
