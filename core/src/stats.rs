//! Aggregate statistics over the full client record set.
//!
//! Column selection is driven by a schema descriptor discovered once at
//! startup, not hardcoded: the set of tracked balance, transaction, and
//! spending categories varies by deployment.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::store::ClientStore;

const BALANCE_MARKER: &str = "AVG_BALANCE_AMT";
const BALANCE_SUFFIX: &str = "_AVG_BALANCE_AMT";
const TRX_PREFIX: &str = "TRX_";
const COUNT_SUFFIX: &str = "_CNT";
const AMOUNT_SUFFIX: &str = "_AMT";
const MCC_PREFIX: &str = "MCC_";

/// Digital channels reported by the engagement statistic. Each maps to a
/// `<name>_FLAG` column; deployments may track a subset.
const DIGITAL_CHANNELS: [&str; 6] = [
    "PTS_IB",
    "APPLE_PAY",
    "GEORGE_PAY",
    "GOOGLE_PAY",
    "WALLET",
    "GEORGE_INFO",
];

const LOGIN_COLUMN: &str = "CHNL_IB_LOGINS_CNT";
const CUSTOMER_TYPE_COLUMN: &str = "GPI_CUSTOMER_TYPE_DESC";

/// A logical metric bound to the physical column backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricColumn {
    pub label: String,
    pub column: String,
}

/// Mapping from the metric families to the columns the live schema
/// actually carries. Derived once at startup; a missing metric column
/// leaves its family empty rather than failing, but a missing `clients`
/// table is fatal.
#[derive(Debug, Clone, Default)]
pub struct StatsSchema {
    pub balances: Vec<MetricColumn>,
    pub trx_counts: Vec<MetricColumn>,
    pub trx_amounts: Vec<MetricColumn>,
    pub mcc_spend: Vec<MetricColumn>,
    pub digital_flags: Vec<MetricColumn>,
    pub login_count: Option<String>,
    pub customer_type: Option<String>,
}

impl StatsSchema {
    pub fn discover(store: &ClientStore) -> CoreResult<Self> {
        if !store.has_table("clients")? {
            return Err(CoreError::TableMissing {
                table: "clients".into(),
            });
        }
        let columns = store.table_columns("clients")?;
        let mut schema = StatsSchema::default();

        for column in &columns {
            if column.contains(BALANCE_MARKER) {
                schema.balances.push(MetricColumn {
                    label: strip(column, "", BALANCE_SUFFIX),
                    column: column.clone(),
                });
            } else if column.starts_with(TRX_PREFIX) && column.ends_with(COUNT_SUFFIX) {
                schema.trx_counts.push(MetricColumn {
                    label: strip(column, TRX_PREFIX, COUNT_SUFFIX),
                    column: column.clone(),
                });
            } else if column.starts_with(TRX_PREFIX) && column.ends_with(AMOUNT_SUFFIX) {
                schema.trx_amounts.push(MetricColumn {
                    label: strip(column, TRX_PREFIX, AMOUNT_SUFFIX),
                    column: column.clone(),
                });
            } else if column.starts_with(MCC_PREFIX) && column.ends_with(AMOUNT_SUFFIX) {
                schema.mcc_spend.push(MetricColumn {
                    label: strip(column, MCC_PREFIX, AMOUNT_SUFFIX),
                    column: column.clone(),
                });
            }
        }

        for channel in DIGITAL_CHANNELS {
            let column = format!("{channel}_FLAG");
            if columns.iter().any(|c| *c == column) {
                schema.digital_flags.push(MetricColumn {
                    label: channel.to_string(),
                    column,
                });
            } else {
                warn!("digital channel column {column} not in schema; skipping");
            }
        }

        schema.login_count = columns.iter().find(|c| c.as_str() == LOGIN_COLUMN).cloned();
        schema.customer_type = columns
            .iter()
            .find(|c| c.as_str() == CUSTOMER_TYPE_COLUMN)
            .cloned();

        info!(
            "stats schema: {} balance, {} trx count, {} trx amount, {} mcc, {} digital columns",
            schema.balances.len(),
            schema.trx_counts.len(),
            schema.trx_amounts.len(),
            schema.mcc_spend.len(),
            schema.digital_flags.len(),
        );
        Ok(schema)
    }
}

/// Label for a metric column: the column name with the family's prefix
/// and suffix removed.
fn strip(column: &str, prefix: &str, suffix: &str) -> String {
    let trimmed = column.strip_prefix(prefix).unwrap_or(column);
    let trimmed = trimmed.strip_suffix(suffix).unwrap_or(trimmed);
    trimmed.to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Client count per customer-type description. Empty when the record set
/// is empty or the deployment does not track customer types.
pub fn segment_population(
    store: &ClientStore,
    schema: &StatsSchema,
) -> CoreResult<BTreeMap<String, i64>> {
    let Some(column) = &schema.customer_type else {
        return Ok(BTreeMap::new());
    };
    Ok(store.group_count(column)?.into_iter().collect())
}

/// Mean balance per discovered account type, rounded to 2 decimals.
pub fn average_balances(
    store: &ClientStore,
    schema: &StatsSchema,
) -> CoreResult<BTreeMap<String, f64>> {
    let mut result = BTreeMap::new();
    for metric in &schema.balances {
        result.insert(metric.label.clone(), round2(store.avg_column(&metric.column)?));
    }
    Ok(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionStats {
    pub counts: BTreeMap<String, f64>,
    pub amounts: BTreeMap<String, f64>,
}

/// Mean transaction count and amount per transaction type. The type set
/// is derived from the column naming convention at discovery time.
pub fn transaction_statistics(
    store: &ClientStore,
    schema: &StatsSchema,
) -> CoreResult<TransactionStats> {
    let mut stats = TransactionStats::default();
    for metric in &schema.trx_counts {
        stats
            .counts
            .insert(metric.label.clone(), round2(store.avg_column(&metric.column)?));
    }
    for metric in &schema.trx_amounts {
        stats
            .amounts
            .insert(metric.label.clone(), round2(store.avg_column(&metric.column)?));
    }
    Ok(stats)
}

/// Total spend per merchant-category group.
pub fn spending_by_category(
    store: &ClientStore,
    schema: &StatsSchema,
) -> CoreResult<BTreeMap<String, f64>> {
    let mut result = BTreeMap::new();
    for metric in &schema.mcc_spend {
        result.insert(metric.label.clone(), round2(store.sum_column(&metric.column)?));
    }
    Ok(result)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DigitalEngagement {
    /// Share of clients with each channel flag set, in percent.
    pub adoption_pct: BTreeMap<String, f64>,
    /// Mean internet-banking login count.
    pub avg_logins: f64,
}

/// Adoption percentage per digital channel plus mean login count. A
/// zero-row record set yields zeros, never a division error.
pub fn digital_engagement(
    store: &ClientStore,
    schema: &StatsSchema,
) -> CoreResult<DigitalEngagement> {
    let total = store.client_count()?;
    let mut engagement = DigitalEngagement::default();

    for metric in &schema.digital_flags {
        let pct = if total > 0 {
            round2(store.sum_column(&metric.column)? / total as f64 * 100.0)
        } else {
            0.0
        };
        engagement.adoption_pct.insert(metric.label.clone(), pct);
    }

    if let Some(column) = &schema.login_count {
        engagement.avg_logins = round2(store.avg_column(column)?);
    }
    Ok(engagement)
}

#[cfg(test)]
mod tests {
    use super::{round2, strip};

    #[test]
    fn labels_strip_family_markers() {
        assert_eq!(strip("CEC_AVG_BALANCE_AMT", "", "_AVG_BALANCE_AMT"), "CEC");
        assert_eq!(strip("TRX_CARD_CNT", "TRX_", "_CNT"), "CARD");
        assert_eq!(strip("MCC_GROCERY_AMT", "MCC_", "_AMT"), "GROCERY");
    }

    #[test]
    fn rounding_is_two_decimal_places() {
        assert_eq!(round2(100.125), 100.13);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(7.375), 7.38);
    }
}
