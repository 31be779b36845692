use crate::domain::report::Alert;
use crate::domain::snapshot::{GrowthRates, KpiSnapshot, Metric};

pub const NO_TRANSACTIONS_ALERT: &str = "No transactions recorded today";

/// Drop thresholds, as positive percentages. A rule fires when growth is strictly below the
/// negated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertThresholds {
    pub tpv_drop_pct: f64,
    pub avg_ticket_drop_pct: f64,
    pub transactions_drop_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            tpv_drop_pct: 20.0,
            avg_ticket_drop_pct: 15.0,
            transactions_drop_pct: 25.0,
        }
    }
}

impl AlertThresholds {
    fn drop_pct(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Tpv => self.tpv_drop_pct,
            Metric::AvgTicket => self.avg_ticket_drop_pct,
            Metric::TotalTransactions => self.transactions_drop_pct,
        }
    }
}

/// Evaluates the rules in a fixed order: TPV, average ticket, transaction volume, then the
/// zero-transactions check. Every rule is independent.
///
/// `_previous` is unused; all comparisons go through `growth`.
pub fn detect_alerts(
    current: &KpiSnapshot,
    _previous: Option<&KpiSnapshot>,
    growth: &GrowthRates,
    thresholds: &AlertThresholds,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for metric in Metric::ALL {
        let Some(pct) = growth.percent(metric) else {
            continue;
        };
        if pct < -thresholds.drop_pct(metric) {
            alerts.push(Alert::new(format!(
                "{} dropped {:.1}% vs previous day",
                label(metric),
                pct.abs()
            )));
        }
    }

    if current.total_transactions == 0 {
        alerts.push(Alert::new(NO_TRANSACTIONS_ALERT));
    }

    alerts
}

fn label(metric: Metric) -> &'static str {
    match metric {
        Metric::Tpv => "TPV",
        Metric::AvgTicket => "Average ticket",
        Metric::TotalTransactions => "Transaction volume",
    }
}
