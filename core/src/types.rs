//! Shared primitive types used across the entire crate.

use serde::{Serialize, Serializer};

/// A stable client identifier, assigned by the offline batch load.
pub type ClientId = String;

/// An integer cluster bucket within one segment dimension.
pub type ClusterId = i64;

/// One row of the wide `clients` table, keyed by column name.
/// Values are dynamically typed; the column set is schema-driven.
pub type ClientRecord = serde_json::Map<String, serde_json::Value>;

/// The six axes along which every client is clustered.
///
/// The seg-id to column mapping is a static constant of the system:
/// catalog rows carry the integer, client rows carry one column per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentDimension {
    Demographic,
    Financial,
    Transactional,
    Product,
    Digital,
    Relationship,
}

impl SegmentDimension {
    pub const ALL: [SegmentDimension; 6] = [
        SegmentDimension::Demographic,
        SegmentDimension::Financial,
        SegmentDimension::Transactional,
        SegmentDimension::Product,
        SegmentDimension::Digital,
        SegmentDimension::Relationship,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// The integer catalog rows use to select this dimension.
    pub fn seg_id(self) -> i64 {
        match self {
            SegmentDimension::Demographic   => 0,
            SegmentDimension::Financial     => 1,
            SegmentDimension::Transactional => 2,
            SegmentDimension::Product       => 3,
            SegmentDimension::Digital       => 4,
            SegmentDimension::Relationship  => 5,
        }
    }

    pub fn from_seg_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.seg_id() == id)
    }

    /// The `clients` column holding this dimension's cluster value.
    pub fn column(self) -> &'static str {
        match self {
            SegmentDimension::Demographic   => "DEM_SEG",
            SegmentDimension::Financial     => "FIN_SEG",
            SegmentDimension::Transactional => "TRANS_SEG",
            SegmentDimension::Product       => "PROD_SEG",
            SegmentDimension::Digital       => "DIG_SEG",
            SegmentDimension::Relationship  => "REL_SEG",
        }
    }

    /// Position of this dimension in [`Self::ALL`].
    pub fn index(self) -> usize {
        self.seg_id() as usize
    }
}

/// Callers see dimension names, never raw seg ids.
impl Serialize for SegmentDimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.column())
    }
}
