//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! Resolver, matcher, lookup, and statistics call store methods; they
//! never execute SQL directly.

mod catalog;
mod client;
mod stats;

pub use client::ColumnKind;

use rusqlite::Connection;

use crate::error::{CoreError, CoreResult};
use crate::types::SegmentDimension;

/// Columns every deployment's `clients` table must carry. The rest of the
/// wide schema varies by deployment and is discovered, not required.
const REQUIRED_CLIENT_COLUMNS: [&str; 2] = ["ID", "GPI_AGE"];

pub struct ClientStore {
    conn: Connection,
}

impl ClientStore {
    /// Open (or create) the backing database at `path`.
    pub fn open(path: &str) -> CoreResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode: concurrent readers, one writer (the batch loader).
        // :memory: and shared-cache databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> CoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply the catalog-table schema.
    pub fn migrate(&self) -> CoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Fail fast when a backing table the core cannot operate without is
    /// absent, or when `clients` lacks a required column. Called once at
    /// startup by the embedding process.
    pub fn verify_schema(&self) -> CoreResult<()> {
        for table in ["clients", "products", "offers"] {
            if !self.has_table(table)? {
                return Err(CoreError::TableMissing { table: table.into() });
            }
        }
        let columns = self.table_columns("clients")?;
        let required = REQUIRED_CLIENT_COLUMNS
            .iter()
            .copied()
            .chain(SegmentDimension::ALL.iter().map(|d| d.column()));
        for column in required {
            if !columns.iter().any(|c| c == column) {
                return Err(CoreError::ColumnMissing {
                    table: "clients".into(),
                    column: column.into(),
                });
            }
        }
        Ok(())
    }

    pub fn has_table(&self, name: &str) -> CoreResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            rusqlite::params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Column names of `table`, in declaration order.
    pub fn table_columns(&self, table: &str) -> CoreResult<Vec<String>> {
        let sql = format!("PRAGMA table_info({})", quote_ident(table));
        let mut stmt = self.conn.prepare(&sql)?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }
}

/// Double-quote an identifier for interpolation into SQL. Identifiers come
/// from the live schema or the fixed dimension table, never raw from
/// callers.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
