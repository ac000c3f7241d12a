//! Recommendation matching: join a client's segment profile against the
//! product and offer catalogs.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::error::CoreResult;
use crate::segments::{self, SegmentProfile};
use crate::store::ClientStore;
use crate::types::{ClusterId, SegmentDimension};

/// Clients younger than this only see entries eligible for minors.
pub const ADULT_AGE: i64 = 18;

/// Code on a catalog entry marking it eligible for minors.
const MINOR_ELIGIBLE_CODE: &str = "0";

/// Which catalog a match runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Products,
    Offers,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Products => "products",
            CatalogKind::Offers => "offers",
        }
    }
}

/// Eligibility code on a catalog entry. An opaque categorical tag, not a
/// boolean: source data may carry codes beyond "0" and "1".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Eligibility {
    /// The literal code "0": minors may see this entry.
    MinorEligible,
    Other(String),
}

impl Eligibility {
    pub fn from_code(code: &str) -> Self {
        if code == MINOR_ELIGIBLE_CODE {
            Eligibility::MinorEligible
        } else {
            Eligibility::Other(code.to_string())
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Eligibility::MinorEligible => MINOR_ELIGIBLE_CODE,
            Eligibility::Other(code) => code,
        }
    }

    pub fn permits_minors(&self) -> bool {
        matches!(self, Eligibility::MinorEligible)
    }
}

impl Serialize for Eligibility {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// One catalog row, scoped to exactly one (dimension, cluster) pair.
/// `cluster` is non-nullable by construction, so an unset client segment
/// can never match it.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub dimension: SegmentDimension,
    pub cluster: ClusterId,
    pub product: Option<String>,
    pub eligibility: Eligibility,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Externally visible shape of a matched entry. The catalog id and
/// cluster are join artifacts and are stripped; the dimension is reported
/// by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "SEG_ID")]
    pub dimension: SegmentDimension,
    #[serde(rename = "PROD")]
    pub product: Option<String>,
    #[serde(rename = "ELIG")]
    pub eligibility: Eligibility,
    #[serde(rename = "DESCR")]
    pub description: Option<String>,
    #[serde(rename = "LINK", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl From<CatalogEntry> for Recommendation {
    fn from(entry: CatalogEntry) -> Self {
        Self {
            dimension: entry.dimension,
            product: entry.product,
            eligibility: entry.eligibility,
            description: entry.description,
            link: entry.link,
        }
    }
}

/// Collect every catalog entry of `kind` matching any of the profile's
/// six segment values.
///
/// One indexed lookup per dimension; a dimension whose value is unset is
/// skipped outright. Results keep insertion order and are de-duplicated
/// by catalog id. When the client is a minor, only minor-eligible entries
/// survive; an unknown age applies no filter.
pub fn match_recommendations(
    store: &ClientStore,
    profile: &SegmentProfile,
    kind: CatalogKind,
) -> CoreResult<Vec<Recommendation>> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut matched: Vec<CatalogEntry> = Vec::new();

    for dimension in SegmentDimension::ALL {
        let Some(cluster) = profile.cluster(dimension) else {
            continue;
        };
        for entry in store.entries_matching(kind, dimension, cluster)? {
            if seen.insert(entry.id.clone()) {
                matched.push(entry);
            }
        }
    }

    if matches!(profile.age, Some(age) if age < ADULT_AGE) {
        matched.retain(|e| e.eligibility.permits_minors());
    }

    Ok(matched.into_iter().map(Recommendation::from).collect())
}

/// Resolve-then-match convenience; the matcher never runs for an unknown
/// id.
pub fn recommend_for_client(
    store: &ClientStore,
    client_id: &str,
    kind: CatalogKind,
) -> CoreResult<Vec<Recommendation>> {
    let profile = segments::resolve(store, client_id)?;
    match_recommendations(store, &profile, kind)
}

#[cfg(test)]
mod tests {
    use super::Eligibility;

    #[test]
    fn eligibility_is_categorical_not_boolean() {
        assert!(Eligibility::from_code("0").permits_minors());
        assert!(!Eligibility::from_code("1").permits_minors());
        // Codes outside {0, 1} stay intact rather than collapsing to a bool.
        let odd = Eligibility::from_code("2A");
        assert!(!odd.permits_minors());
        assert_eq!(odd.code(), "2A");
    }
}
