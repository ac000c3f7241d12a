//! bankdash-cli: batch loader and query front end for the client store.
//!
//! Usage:
//!   bankdash-cli --db bank.db --load-clients clients.csv --load-catalog offers.csv
//!   bankdash-cli --db bank.db --client C0001
//!   bankdash-cli --db bank.db --stats
//!   bankdash-cli --db bank.db --sample 10

use anyhow::{bail, Context, Result};
use bankdash_core::lookup::ClientDirectory;
use bankdash_core::recommend::{self, CatalogEntry, CatalogKind, Eligibility};
use bankdash_core::segments;
use bankdash_core::stats::{self, StatsSchema};
use bankdash_core::store::{ClientStore, ColumnKind};
use bankdash_core::types::{ClientRecord, SegmentDimension};
use serde_json::json;
use std::env;
use std::fs;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = arg_value(&args, "--db").unwrap_or_else(|| "database.db".to_string());

    let store = ClientStore::open(&db)?;
    store.migrate()?;

    let mut did_work = false;

    if let Some(path) = arg_value(&args, "--load-clients") {
        load_clients(&store, &path)?;
        did_work = true;
    }
    if let Some(path) = arg_value(&args, "--load-catalog") {
        load_catalog(&store, &path)?;
        did_work = true;
    }

    if let Some(client_id) = arg_value(&args, "--client") {
        store.verify_schema()?;
        print_client(store, &client_id)?;
        return Ok(());
    }
    if args.iter().any(|a| a == "--stats") {
        store.verify_schema()?;
        print_stats(&store)?;
        return Ok(());
    }
    if let Some(count) = arg_value(&args, "--sample") {
        store.verify_schema()?;
        let count: usize = count.parse().context("--sample expects a number")?;
        let ids = store.sample_client_ids(count)?;
        println!("{}", serde_json::to_string_pretty(&ids)?);
        return Ok(());
    }

    if !did_work {
        bail!("nothing to do; pass --load-clients/--load-catalog, --client, --stats, or --sample");
    }
    Ok(())
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

// ── Query modes ────────────────────────────────────────────────────

fn print_client(store: ClientStore, client_id: &str) -> Result<()> {
    let directory = ClientDirectory::new(store);
    let profile = segments::resolve(directory.store(), client_id)?;
    let products =
        recommend::match_recommendations(directory.store(), &profile, CatalogKind::Products)?;
    let offers = recommend::match_recommendations(directory.store(), &profile, CatalogKind::Offers)?;
    let record = directory.fetch(client_id)?;

    let clusters: serde_json::Map<String, serde_json::Value> = profile
        .named_clusters()
        .into_iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect();

    let report = json!({
        "client_id": profile.client_id,
        "age": profile.age,
        "segments": clusters,
        "products": products,
        "offers": offers,
        "record": record,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_stats(store: &ClientStore) -> Result<()> {
    let schema = StatsSchema::discover(store)?;
    let report = json!({
        "segments": stats::segment_population(store, &schema)?,
        "average_balances": stats::average_balances(store, &schema)?,
        "transactions": stats::transaction_statistics(store, &schema)?,
        "spending": stats::spending_by_category(store, &schema)?,
        "digital_engagement": stats::digital_engagement(store, &schema)?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ── Batch load ─────────────────────────────────────────────────────

/// Load the wide `clients` table from a CSV flat file. The header defines
/// the schema; type affinity is sniffed from the first non-empty value in
/// each column and ID is always TEXT.
fn load_clients(store: &ClientStore, path: &str) -> Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
    let mut lines = content.lines();
    let header = match lines.next() {
        Some(h) => parse_csv_line(h),
        None => bail!("{path} is empty"),
    };

    let rows: Vec<Vec<String>> = lines
        .filter(|l| !l.trim().is_empty())
        .map(parse_csv_line)
        .collect();

    let kinds: Vec<ColumnKind> = header
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if name == "ID" {
                ColumnKind::Text
            } else {
                sniff_kind(rows.iter().map(|r| r.get(i).map(String::as_str).unwrap_or("")))
            }
        })
        .collect();

    let columns: Vec<(&str, ColumnKind)> = header
        .iter()
        .map(String::as_str)
        .zip(kinds.iter().copied())
        .collect();
    store.create_clients_table(&columns)?;

    let mut loaded = 0u64;
    for row in &rows {
        let mut record = ClientRecord::new();
        for (i, name) in header.iter().enumerate() {
            let raw = row.get(i).map(String::as_str).unwrap_or("");
            record.insert(name.clone(), cell_value(raw, kinds[i]));
        }
        store.insert_client(&record)?;
        loaded += 1;
    }
    log::info!("loaded {loaded} clients from {path}");
    Ok(())
}

/// Load the combined catalog flat file, splitting rows into products and
/// offers by id prefix. Expected columns:
/// ID, SEG_ID, CLUS_ID, PROD, ELIG, DESCR[, LINK].
fn load_catalog(store: &ClientStore, path: &str) -> Result<()> {
    let content = fs::read_to_string(path).with_context(|| format!("cannot read {path}"))?;
    let mut lines = content.lines();
    if lines.next().is_none() {
        bail!("{path} is empty");
    }

    store.clear_catalog(CatalogKind::Products)?;
    store.clear_catalog(CatalogKind::Offers)?;

    let (mut products, mut offers, mut skipped) = (0u64, 0u64, 0u64);
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let fields = parse_csv_line(line);
        if fields.len() < 6 {
            log::warn!("catalog row with {} fields skipped", fields.len());
            skipped += 1;
            continue;
        }
        let (seg_id, cluster) = match (fields[1].parse::<i64>(), fields[2].parse::<i64>()) {
            (Ok(s), Ok(c)) => (s, c),
            _ => {
                log::warn!("catalog row {} has non-numeric SEG_ID/CLUS_ID; skipped", fields[0]);
                skipped += 1;
                continue;
            }
        };
        let Some(dimension) = SegmentDimension::from_seg_id(seg_id) else {
            log::warn!("catalog row {} has SEG_ID {seg_id} outside 0..5; skipped", fields[0]);
            skipped += 1;
            continue;
        };

        let entry = CatalogEntry {
            id: fields[0].clone(),
            dimension,
            cluster,
            product: non_empty(&fields[3]),
            eligibility: Eligibility::from_code(&fields[4]),
            description: non_empty(&fields[5]),
            link: fields.get(6).and_then(|v| non_empty(v)),
        };

        if entry.id.starts_with('P') {
            store.insert_catalog_entry(CatalogKind::Products, &entry)?;
            products += 1;
        } else if entry.id.starts_with('O') {
            store.insert_catalog_entry(CatalogKind::Offers, &entry)?;
            offers += 1;
        } else {
            log::warn!("catalog id {} has no P/O prefix; skipped", entry.id);
            skipped += 1;
        }
    }
    log::info!("loaded {products} products, {offers} offers from {path} ({skipped} skipped)");
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn sniff_kind<'a>(mut values: impl Iterator<Item = &'a str>) -> ColumnKind {
    match values.find(|v| !v.is_empty()) {
        Some(v) if v.parse::<i64>().is_ok() => ColumnKind::Integer,
        Some(v) if v.parse::<f64>().is_ok() => ColumnKind::Real,
        _ => ColumnKind::Text,
    }
}

fn cell_value(raw: &str, kind: ColumnKind) -> serde_json::Value {
    if raw.is_empty() {
        return serde_json::Value::Null;
    }
    match kind {
        ColumnKind::Integer => raw
            .parse::<i64>()
            .map(Into::into)
            .unwrap_or_else(|_| json!(raw)),
        ColumnKind::Real => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| json!(raw)),
        ColumnKind::Text => json!(raw),
    }
}

/// Minimal CSV field splitter: commas, double-quoted fields, doubled
/// quotes inside quoted fields.
fn parse_csv_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches('\r');
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}
