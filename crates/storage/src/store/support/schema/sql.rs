#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS pages (
          workspace TEXT NOT NULL,
          id TEXT NOT NULL,
          parent_id TEXT,
          mpath TEXT NOT NULL,
          children_order TEXT NOT NULL DEFAULT '[]',
          title TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          PRIMARY KEY (workspace, id)
        );

        CREATE INDEX IF NOT EXISTS idx_pages_mpath
          ON pages(workspace, mpath);

        CREATE INDEX IF NOT EXISTS idx_pages_parent
          ON pages(workspace, parent_id);

        CREATE TABLE IF NOT EXISTS page_addresses (
          workspace TEXT NOT NULL,
          page_id TEXT NOT NULL,
          address TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          PRIMARY KEY (workspace, page_id, address)
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_page_addresses_address
          ON page_addresses(workspace, address);

        CREATE TABLE IF NOT EXISTS collab_grants (
          workspace TEXT NOT NULL,
          page_id TEXT NOT NULL,
          grantee TEXT NOT NULL,
          role TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          PRIMARY KEY (workspace, page_id, grantee)
        );

        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );
"#;
