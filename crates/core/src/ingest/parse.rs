use crate::domain::transaction::{TransactionRecord, REQUIRED_COLUMNS};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::io::Read;

/// Reads a transaction log with a header row. Columns are matched by name, extra columns are
/// ignored.
pub fn parse_transactions<R: Read>(reader: R) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("failed to read transaction log header")?
        .clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    anyhow::ensure!(
        missing.is_empty(),
        "transaction log is missing required columns: {}",
        missing.join(", ")
    );

    let mut out = Vec::new();
    for (row_idx, result) in rdr.deserialize::<TransactionRecord>().enumerate() {
        let record = result.with_context(|| format!("invalid transaction row {}", row_idx + 1))?;
        validate_record(&record)
            .with_context(|| format!("invalid transaction row {}", row_idx + 1))?;
        out.push(record);
    }

    validate_daily_totals(&out)?;
    Ok(out)
}

/// Most recent day present in the log.
pub fn latest_day(records: &[TransactionRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.day).max()
}

fn validate_record(record: &TransactionRecord) -> Result<()> {
    anyhow::ensure!(
        record.amount_transacted.is_finite() && record.amount_transacted >= 0.0,
        "amount_transacted must be a non-negative number (got {})",
        record.amount_transacted
    );
    Ok(())
}

/// Per-day count totals must fit in a `u64`.
fn validate_daily_totals(records: &[TransactionRecord]) -> Result<()> {
    let mut totals: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for r in records {
        let (txns, merchants) = totals.entry(r.day).or_insert((0, 0));
        *txns = txns.checked_add(r.quantity_transactions).with_context(|| {
            format!("quantity_transactions total for {} overflows", r.day)
        })?;
        *merchants = merchants.checked_add(r.quantity_of_merchants).with_context(|| {
            format!("quantity_of_merchants total for {} overflows", r.day)
        })?;
    }
    Ok(())
}
