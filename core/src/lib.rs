//! Client segmentation and recommendation core.
//!
//! Given a client id this crate resolves the client's six segment
//! memberships (demographic, financial, transactional, product, digital,
//! relationship) and joins them against the segment-scoped product and
//! offer catalogs, applying an age-based eligibility gate for minors.
//! Around that core sit a cached client lookup service and a family of
//! reporting aggregations over the full record set.
//!
//! The SQLite record store is read-only after its one-time batch load;
//! the loader lives in the `tools` workspace member.

pub mod cache;
pub mod error;
pub mod lookup;
pub mod recommend;
pub mod segments;
pub mod stats;
pub mod store;
pub mod types;

pub use error::{CoreError, CoreResult};
