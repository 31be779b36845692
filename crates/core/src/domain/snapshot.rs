use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summed `amount_transacted` per category label.
pub type Breakdown = BTreeMap<String, f64>;

/// KPIs for a single day. Only built when the day has at least one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub date: NaiveDate,
    pub tpv: f64,
    pub avg_ticket: f64,
    pub total_transactions: u64,
    pub total_merchants: u64,
    pub entity_breakdown: Breakdown,
    pub product_breakdown: Breakdown,
    pub payment_method_breakdown: Breakdown,
}

/// Metrics compared day over day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Tpv,
    AvgTicket,
    TotalTransactions,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Tpv, Metric::AvgTicket, Metric::TotalTransactions];

    pub fn value(self, snapshot: &KpiSnapshot) -> f64 {
        match self {
            Metric::Tpv => snapshot.tpv,
            Metric::AvgTicket => snapshot.avg_ticket,
            Metric::TotalTransactions => snapshot.total_transactions as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Growth {
    /// Signed percentage change against the previous day.
    Change(f64),
    /// Previous value was zero, so there is no basis for a percentage.
    Unavailable,
}

impl Growth {
    /// Numeric view of the growth. `Unavailable` reads as 0.0.
    pub fn percent(self) -> f64 {
        match self {
            Growth::Change(pct) => pct,
            Growth::Unavailable => 0.0,
        }
    }
}

/// Day-over-day growth per metric. Empty when there was no previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrowthRates(BTreeMap<Metric, Growth>);

impl GrowthRates {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: Metric, growth: Growth) {
        self.0.insert(metric, growth);
    }

    pub fn get(&self, metric: Metric) -> Option<Growth> {
        self.0.get(&metric).copied()
    }

    /// `None` when the metric was never compared; `Some(0.0)` when it had no basis.
    pub fn percent(&self, metric: Metric) -> Option<f64> {
        self.get(metric).map(Growth::percent)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
