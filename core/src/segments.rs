//! Segment resolution: a client id in, the six cluster memberships out.

use crate::error::{CoreError, CoreResult};
use crate::store::ClientStore;
use crate::types::{ClientId, ClusterId, SegmentDimension};

/// A client's segment memberships, one optional cluster per dimension.
///
/// An unset dimension is `None` and can never match a catalog entry; it
/// is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentProfile {
    pub client_id: ClientId,
    pub age: Option<i64>,
    pub clusters: [Option<ClusterId>; SegmentDimension::COUNT],
}

impl SegmentProfile {
    pub fn new(client_id: impl Into<ClientId>, age: Option<i64>) -> Self {
        Self {
            client_id: client_id.into(),
            age,
            clusters: [None; SegmentDimension::COUNT],
        }
    }

    pub fn cluster(&self, dimension: SegmentDimension) -> Option<ClusterId> {
        self.clusters[dimension.index()]
    }

    pub fn set_cluster(&mut self, dimension: SegmentDimension, cluster: Option<ClusterId>) {
        self.clusters[dimension.index()] = cluster;
    }

    /// Cluster values keyed by dimension column name, for presentation.
    pub fn named_clusters(&self) -> Vec<(&'static str, Option<ClusterId>)> {
        SegmentDimension::ALL
            .iter()
            .map(|d| (d.column(), self.cluster(*d)))
            .collect()
    }
}

/// Resolve `client_id` to its segment profile.
///
/// Age and all six segment values come from a single store read. The
/// store decides existence; this function only rejects ids that are
/// empty.
pub fn resolve(store: &ClientStore, client_id: &str) -> CoreResult<SegmentProfile> {
    if client_id.is_empty() {
        return Err(CoreError::EmptyClientId);
    }
    store
        .segment_values(client_id)?
        .ok_or_else(|| CoreError::ClientNotFound {
            client_id: client_id.to_string(),
        })
}
