use super::{quote_ident, ClientStore};
use crate::error::CoreResult;

impl ClientStore {
    /// Mean of `column` over all clients; 0.0 on an empty table.
    pub fn avg_column(&self, column: &str) -> CoreResult<f64> {
        let sql = format!("SELECT AVG({}) FROM clients", quote_ident(column));
        let avg: Option<f64> = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(avg.unwrap_or(0.0))
    }

    /// Sum of `column` over all clients; 0.0 on an empty table.
    pub fn sum_column(&self, column: &str) -> CoreResult<f64> {
        let sql = format!("SELECT TOTAL({}) FROM clients", quote_ident(column));
        self.conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(Into::into)
    }

    /// Row count per distinct value of `column`; NULL values are excluded.
    pub fn group_count(&self, column: &str) -> CoreResult<Vec<(String, i64)>> {
        let col = quote_ident(column);
        let sql = format!(
            "SELECT {col}, COUNT(*) FROM clients WHERE {col} IS NOT NULL GROUP BY {col}"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let groups = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(groups)
    }
}
