#![forbid(unsafe_code)]

use super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::{ErrorCode, params};

impl SqliteStore {
    /// Bind a public address to a page. Addresses are unique per workspace;
    /// a second binding of the same address fails with `AddressTaken`.
    pub fn address_bind(
        &mut self,
        workspace: &WorkspaceId,
        page_id: &str,
        address: &str,
    ) -> Result<AddressRow, StoreError> {
        let page_id = canonicalize_page_id(page_id)?;
        let address = address.trim();
        if address.is_empty() {
            return Err(StoreError::InvalidInput("address must not be empty"));
        }
        let now_ms = now_ms();

        let tx = self.conn.transaction()?;
        if load_page(&tx, workspace.as_str(), page_id.as_str())?.is_none() {
            return Err(StoreError::NotFound);
        }

        let insert = tx.execute(
            "INSERT INTO page_addresses(workspace, page_id, address, created_at_ms) VALUES (?1, ?2, ?3, ?4)",
            params![workspace.as_str(), page_id.as_str(), address, now_ms],
        );
        if let Err(err) = insert {
            return Err(map_address_conflict(err));
        }
        tx.commit()?;

        Ok(AddressRow {
            page_id: page_id.as_str().to_string(),
            address: address.to_string(),
            created_at_ms: now_ms,
        })
    }

    pub fn address_unbind(
        &mut self,
        workspace: &WorkspaceId,
        page_id: &str,
        address: &str,
    ) -> Result<bool, StoreError> {
        let page_id = canonicalize_page_id(page_id)?;
        let removed = self.conn.execute(
            "DELETE FROM page_addresses WHERE workspace=?1 AND page_id=?2 AND address=?3",
            params![workspace.as_str(), page_id.as_str(), address.trim()],
        )?;
        Ok(removed > 0)
    }

    pub fn page_addresses(
        &self,
        workspace: &WorkspaceId,
        page_id: &str,
    ) -> Result<Vec<AddressRow>, StoreError> {
        let page_id = canonicalize_page_id(page_id)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT page_id, address, created_at_ms
            FROM page_addresses
            WHERE workspace=?1 AND page_id=?2
            ORDER BY address
            "#,
        )?;
        let rows = stmt.query_map(params![workspace.as_str(), page_id.as_str()], |row| {
            Ok(AddressRow {
                page_id: row.get(0)?,
                address: row.get(1)?,
                created_at_ms: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn map_address_conflict(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err
        && failure.code == ErrorCode::ConstraintViolation
    {
        return StoreError::AddressTaken;
    }
    StoreError::Sql(err)
}
