#![forbid(unsafe_code)]

use super::super::*;
use canopy_core::ids::WorkspaceId;
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    /// Resolve a short id fragment to a full page id. An exact match always
    /// wins (so resolution is idempotent on full ids); otherwise the fragment
    /// must be a unique prefix.
    pub fn page_resolve_id(
        &self,
        workspace: &WorkspaceId,
        fragment: &str,
    ) -> Result<String, StoreError> {
        // Fragments share the page-id alphabet, which keeps the LIKE pattern
        // below literal.
        let fragment = canonicalize_page_id(fragment)?;

        let exact: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM pages WHERE workspace=?1 AND id=?2",
                params![workspace.as_str(), fragment.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(id) = exact {
            return Ok(id);
        }

        let mut stmt = self.conn.prepare(
            "SELECT id FROM pages WHERE workspace=?1 AND id LIKE ?2 || '%' LIMIT 2",
        )?;
        let mut matches = stmt
            .query_map(params![workspace.as_str(), fragment.as_str()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        match matches.len() {
            0 => Err(StoreError::NotFound),
            1 => Ok(matches.remove(0)),
            _ => Err(StoreError::AmbiguousId),
        }
    }
}
