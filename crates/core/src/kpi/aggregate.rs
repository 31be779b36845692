use crate::domain::snapshot::{Breakdown, KpiSnapshot};
use crate::domain::transaction::TransactionRecord;
use chrono::{Duration, NaiveDate};

/// Reduces every record whose `day` equals `date` into one snapshot.
///
/// Returns `None` when the day has no records, so "no data" never looks like a day of zero
/// activity. Count totals saturate at `u64::MAX`; logs read through `ingest` never get there.
pub fn compute_snapshot(records: &[TransactionRecord], date: NaiveDate) -> Option<KpiSnapshot> {
    let mut day_records = records.iter().filter(|r| r.day == date).peekable();
    day_records.peek()?;

    let mut tpv = 0.0;
    let mut total_transactions: u64 = 0;
    let mut total_merchants: u64 = 0;
    let mut entity_breakdown = Breakdown::new();
    let mut product_breakdown = Breakdown::new();
    let mut payment_method_breakdown = Breakdown::new();

    for r in day_records {
        tpv += r.amount_transacted;
        total_transactions = total_transactions.saturating_add(r.quantity_transactions);
        total_merchants = total_merchants.saturating_add(r.quantity_of_merchants);
        add_to(&mut entity_breakdown, &r.entity, r.amount_transacted);
        add_to(&mut product_breakdown, &r.product, r.amount_transacted);
        add_to(&mut payment_method_breakdown, &r.payment_method, r.amount_transacted);
    }

    let avg_ticket = if total_transactions > 0 {
        tpv / total_transactions as f64
    } else {
        0.0
    };

    Some(KpiSnapshot {
        date,
        tpv,
        avg_ticket,
        total_transactions,
        total_merchants,
        entity_breakdown,
        product_breakdown,
        payment_method_breakdown,
    })
}

/// The comparison day: always one calendar day back, even if that day has no data.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

fn add_to(breakdown: &mut Breakdown, label: &str, amount: f64) {
    *breakdown.entry(label.to_string()).or_insert(0.0) += amount;
}
