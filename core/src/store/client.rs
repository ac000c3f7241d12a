use rusqlite::types::ValueRef;
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::{quote_ident, ClientStore};
use crate::error::{CoreError, CoreResult};
use crate::segments::SegmentProfile;
use crate::types::{ClientRecord, SegmentDimension};

/// SQL type affinity for a load-time `clients` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
}

impl ColumnKind {
    fn sql(self) -> &'static str {
        match self {
            ColumnKind::Text => "TEXT",
            ColumnKind::Integer => "INTEGER",
            ColumnKind::Real => "REAL",
        }
    }
}

impl ClientStore {
    // ── Reads ──────────────────────────────────────────────────

    /// Membership check without materializing the record.
    pub fn client_exists(&self, client_id: &str) -> CoreResult<bool> {
        let hit = self
            .conn
            .query_row(
                "SELECT 1 FROM clients WHERE ID = ?1 LIMIT 1",
                params![client_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(hit.is_some())
    }

    /// Full record fetch; `None` when the id is unknown.
    pub fn fetch_client(&self, client_id: &str) -> CoreResult<Option<ClientRecord>> {
        let mut stmt = self.conn.prepare("SELECT * FROM clients WHERE ID = ?1")?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let mut rows = stmt.query(params![client_id])?;
        match rows.next()? {
            Some(row) => {
                let mut record = ClientRecord::new();
                for (i, name) in columns.iter().enumerate() {
                    record.insert(name.clone(), json_value(row.get_ref(i)?));
                }
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Age plus all six segment clusters in a single read.
    pub fn segment_values(&self, client_id: &str) -> CoreResult<Option<SegmentProfile>> {
        let mut select = vec!["GPI_AGE".to_string()];
        select.extend(SegmentDimension::ALL.iter().map(|d| d.column().to_string()));
        let sql = format!("SELECT {} FROM clients WHERE ID = ?1", select.join(", "));
        let profile = self
            .conn
            .query_row(&sql, params![client_id], |row| {
                let age: Option<i64> = row.get(0)?;
                let mut clusters = [None; SegmentDimension::COUNT];
                for (i, slot) in clusters.iter_mut().enumerate() {
                    *slot = row.get(i + 1)?;
                }
                Ok(SegmentProfile {
                    client_id: client_id.to_string(),
                    age,
                    clusters,
                })
            })
            .optional()?;
        Ok(profile)
    }

    /// Records matching every `(column, value)` equality filter. Filter
    /// columns are validated against the live schema before any SQL is
    /// built.
    pub fn search_clients(&self, filters: &[(String, String)]) -> CoreResult<Vec<ClientRecord>> {
        let known = self.table_columns("clients")?;
        for (column, _) in filters {
            if !known.iter().any(|c| c == column) {
                return Err(CoreError::UnknownColumn {
                    column: column.clone(),
                });
            }
        }

        let mut sql = String::from("SELECT * FROM clients WHERE 1=1");
        for (column, _) in filters {
            sql.push_str(&format!(" AND {} = ?", quote_ident(column)));
        }
        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let values: Vec<&str> = filters.iter().map(|(_, v)| v.as_str()).collect();
        let mut rows = stmt.query(rusqlite::params_from_iter(values))?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = ClientRecord::new();
            for (i, name) in columns.iter().enumerate() {
                record.insert(name.clone(), json_value(row.get_ref(i)?));
            }
            records.push(record);
        }
        Ok(records)
    }

    pub fn client_count(&self) -> CoreResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))
            .map_err(Into::into)
    }

    pub fn sample_client_ids(&self, count: usize) -> CoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT ID FROM clients LIMIT ?1")?;
        let ids = stmt
            .query_map(params![count as i64], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    // ── Load-time seeding ──────────────────────────────────────

    /// Create the wide `clients` table from a flat-file header. Replaces
    /// any previous load.
    pub fn create_clients_table(&self, columns: &[(&str, ColumnKind)]) -> CoreResult<()> {
        self.conn.execute("DROP TABLE IF EXISTS clients", [])?;
        let decls: Vec<String> = columns
            .iter()
            .map(|(name, kind)| format!("{} {}", quote_ident(name), kind.sql()))
            .collect();
        let sql = format!("CREATE TABLE clients ({})", decls.join(", "));
        self.conn.execute(&sql, [])?;
        self.conn
            .execute("CREATE UNIQUE INDEX idx_clients_id ON clients (ID)", [])?;
        Ok(())
    }

    /// Insert one client row; keys must name existing columns.
    pub fn insert_client(&self, record: &ClientRecord) -> CoreResult<()> {
        let columns: Vec<String> = record.keys().map(|k| quote_ident(k)).collect();
        let placeholders: Vec<String> = (1..=record.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO clients ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        let values: Vec<rusqlite::types::Value> = record.values().map(sql_value).collect();
        self.conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(())
    }
}

/// One dynamically typed SQLite cell as JSON.
fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

fn sql_value(value: &Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    match value {
        Value::Null => Sql::Null,
        Value::Bool(b) => Sql::Integer(*b as i64),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Sql::Integer(i)
            } else {
                Sql::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => Sql::Text(s.clone()),
        other => Sql::Text(other.to_string()),
    }
}
