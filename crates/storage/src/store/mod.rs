#![forbid(unsafe_code)]

mod addresses;
mod error;
mod grants;
mod pages;
mod requests;
mod support;
mod types;

pub use error::StoreError;
pub use requests::*;
pub use types::*;

use canopy_core::ids::PageId;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join("canopy.db");
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\n             PRAGMA foreign_keys = ON;",
        )?;

        support::schema::install(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

fn canonicalize_page_id(value: &str) -> Result<PageId, StoreError> {
    PageId::try_new(value.trim()).map_err(|_| StoreError::InvalidInput("invalid page id"))
}

/// Materialized path of a page: the dot-joined ancestor chain including the
/// page itself, with a trailing dot (`"A.B.C."`). Descendant membership is a
/// plain prefix test, and the page-id alphabet keeps the prefix LIKE-literal.
fn child_mpath(parent_mpath: &str, id: &str) -> String {
    format!("{parent_mpath}{id}.")
}

fn root_mpath(id: &str) -> String {
    format!("{id}.")
}

fn load_page(
    conn: &Connection,
    workspace: &str,
    id: &str,
) -> Result<Option<PageRow>, StoreError> {
    let row = conn
        .query_row(
            r#"
            SELECT
              id, parent_id, mpath, children_order, title,
              EXISTS(
                SELECT 1 FROM page_addresses a
                WHERE a.workspace = pages.workspace AND a.page_id = pages.id
              ),
              created_at_ms, updated_at_ms
            FROM pages
            WHERE workspace=?1 AND id=?2
            "#,
            params![workspace, id],
            map_page_row,
        )
        .optional()?;
    match row {
        Some((mut page, raw_order)) => {
            page.children_order = support::order::decode(&raw_order)?;
            Ok(Some(page))
        }
        None => Ok(None),
    }
}

type RawPageRow = (PageRow, String);

fn map_page_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPageRow> {
    let raw_order: String = row.get(3)?;
    Ok((
        PageRow {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            mpath: row.get(2)?,
            children_order: Vec::new(),
            title: row.get(4)?,
            address_bound: row.get::<_, i64>(5)? != 0,
            created_at_ms: row.get(6)?,
            updated_at_ms: row.get(7)?,
        },
        raw_order,
    ))
}

fn write_children_order_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    id: &str,
    order: &[String],
    now_ms: i64,
) -> Result<(), StoreError> {
    let encoded = support::order::encode(order)?;
    let updated = tx.execute(
        "UPDATE pages SET children_order=?3, updated_at_ms=?4 WHERE workspace=?1 AND id=?2",
        params![workspace, id, encoded, now_ms],
    )?;
    if updated == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
