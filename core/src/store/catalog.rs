use rusqlite::params;

use super::ClientStore;
use crate::error::CoreResult;
use crate::recommend::{CatalogEntry, CatalogKind, Eligibility};
use crate::types::{ClusterId, SegmentDimension};

impl ClientStore {
    /// Catalog rows of `kind` targeting exactly `(dimension, cluster)`.
    /// One indexed lookup; the matcher unions these across dimensions.
    pub fn entries_matching(
        &self,
        kind: CatalogKind,
        dimension: SegmentDimension,
        cluster: ClusterId,
    ) -> CoreResult<Vec<CatalogEntry>> {
        let sql = format!(
            "SELECT * FROM {} WHERE SEG_ID = ?1 AND CLUS_ID = ?2",
            kind.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![dimension.seg_id(), cluster], |row| {
                Ok(CatalogEntry {
                    id: row.get("ID")?,
                    dimension,
                    cluster,
                    product: row.get("PROD").unwrap_or(None),
                    eligibility: Eligibility::from_code(
                        &row.get::<_, Option<String>>("ELIG")?.unwrap_or_default(),
                    ),
                    description: row.get("DESCR").unwrap_or(None),
                    // Products carry no LINK column; offers may leave it NULL.
                    link: row.get("LINK").unwrap_or(None),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn insert_catalog_entry(&self, kind: CatalogKind, entry: &CatalogEntry) -> CoreResult<()> {
        match kind {
            CatalogKind::Products => self.conn.execute(
                "INSERT INTO products (ID, SEG_ID, CLUS_ID, PROD, ELIG, DESCR)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.id,
                    entry.dimension.seg_id(),
                    entry.cluster,
                    entry.product,
                    entry.eligibility.code(),
                    entry.description,
                ],
            )?,
            CatalogKind::Offers => self.conn.execute(
                "INSERT INTO offers (ID, SEG_ID, CLUS_ID, PROD, ELIG, DESCR, LINK)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.id,
                    entry.dimension.seg_id(),
                    entry.cluster,
                    entry.product,
                    entry.eligibility.code(),
                    entry.description,
                    entry.link,
                ],
            )?,
        };
        Ok(())
    }

    /// Remove all rows of `kind`; the loader replaces catalogs wholesale.
    pub fn clear_catalog(&self, kind: CatalogKind) -> CoreResult<()> {
        let sql = format!("DELETE FROM {}", kind.table());
        self.conn.execute(&sql, [])?;
        Ok(())
    }
}
