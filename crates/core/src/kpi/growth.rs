use crate::domain::snapshot::{Growth, GrowthRates, KpiSnapshot, Metric};

/// Day-over-day percentage change for each tracked metric.
///
/// With no previous snapshot the result is empty. A metric whose previous value is not
/// strictly positive is `Growth::Unavailable` (reads as 0%). No rounding happens here.
pub fn compute_growth(current: &KpiSnapshot, previous: Option<&KpiSnapshot>) -> GrowthRates {
    let Some(previous) = previous else {
        return GrowthRates::none();
    };

    let mut rates = GrowthRates::none();
    for metric in Metric::ALL {
        let prev = metric.value(previous);
        let growth = if prev > 0.0 {
            Growth::Change((metric.value(current) - prev) / prev * 100.0)
        } else {
            Growth::Unavailable
        };
        rates.insert(metric, growth);
    }
    rates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn snapshot(d: u32, tpv: f64, txns: u64) -> KpiSnapshot {
        KpiSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            tpv,
            avg_ticket: if txns > 0 { tpv / txns as f64 } else { 0.0 },
            total_transactions: txns,
            total_merchants: 1,
            entity_breakdown: BTreeMap::new(),
            product_breakdown: BTreeMap::new(),
            payment_method_breakdown: BTreeMap::new(),
        }
    }

    #[test]
    fn no_previous_means_no_growth() {
        let rates = compute_growth(&snapshot(2, 100.0, 2), None);
        assert!(rates.is_empty());
        assert_eq!(rates.percent(Metric::Tpv), None);
    }

    #[test]
    fn halved_tpv_is_minus_fifty() {
        let prev = snapshot(1, 200.0, 4);
        let cur = snapshot(2, 100.0, 4);
        let rates = compute_growth(&cur, Some(&prev));
        assert_eq!(rates.get(Metric::Tpv), Some(Growth::Change(-50.0)));
        assert_eq!(rates.percent(Metric::TotalTransactions), Some(0.0));
        assert_eq!(rates.get(Metric::AvgTicket), Some(Growth::Change(-50.0)));
    }

    #[test]
    fn signed_increase() {
        let prev = snapshot(1, 200.0, 4);
        let cur = snapshot(2, 250.0, 5);
        let rates = compute_growth(&cur, Some(&prev));
        assert_eq!(rates.percent(Metric::Tpv), Some(25.0));
        assert_eq!(rates.percent(Metric::TotalTransactions), Some(25.0));
    }

    #[test]
    fn zero_previous_value_is_unavailable_not_an_error() {
        let prev = snapshot(1, 0.0, 0);
        let cur = snapshot(2, 100.0, 2);
        let rates = compute_growth(&cur, Some(&prev));
        for metric in Metric::ALL {
            assert_eq!(rates.get(metric), Some(Growth::Unavailable));
            assert_eq!(rates.percent(metric), Some(0.0));
        }
    }

    #[test]
    fn growth_is_not_rounded() {
        let prev = snapshot(1, 300.0, 3);
        let cur = snapshot(2, 200.0, 3);
        let pct = compute_growth(&cur, Some(&prev)).percent(Metric::Tpv).unwrap();
        assert!((pct - (-100.0 / 3.0)).abs() < 1e-9);
    }
}
