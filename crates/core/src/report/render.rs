use crate::domain::report::{Alert, Report};
use crate::domain::snapshot::{Breakdown, Growth, GrowthRates, KpiSnapshot, Metric};
use crate::report::format::{currency, signed_percent, thousands};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fmt::{self, Write};

/// Builds the email subject and plain-text body.
///
/// Every breakdown must be non-empty; a snapshot built from at least one record always
/// satisfies this.
pub fn render_report(
    current: &KpiSnapshot,
    growth: &GrowthRates,
    alerts: &[Alert],
    generated_at: NaiveDateTime,
) -> Result<Report> {
    let top = TopPerformers {
        entity: top_performer(&current.entity_breakdown)
            .context("cannot render top performers: entity breakdown is empty")?,
        product: top_performer(&current.product_breakdown)
            .context("cannot render top performers: product breakdown is empty")?,
        payment_method: top_performer(&current.payment_method_breakdown)
            .context("cannot render top performers: payment method breakdown is empty")?,
    };
    let mut body = String::new();
    write_body(&mut body, current, growth, alerts, &top, generated_at)
        .context("failed to format report body")?;

    let mut subject = format!("📊 Daily Data Report - {}", current.date.format("%B %d, %Y"));
    if !alerts.is_empty() {
        subject.push_str(" 🚨");
    }

    Ok(Report { subject, body })
}

/// Category with the largest amount. Ties go to the lexicographically smallest label.
pub fn top_performer(breakdown: &Breakdown) -> Option<(&str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    // BTreeMap iterates in label order, so only a strictly larger amount replaces the leader.
    for (label, amount) in breakdown {
        match best {
            Some((_, top)) if *amount <= top => {}
            _ => best = Some((label.as_str(), *amount)),
        }
    }
    best
}

struct TopPerformers<'a> {
    entity: (&'a str, f64),
    product: (&'a str, f64),
    payment_method: (&'a str, f64),
}

fn write_body(
    out: &mut impl Write,
    current: &KpiSnapshot,
    growth: &GrowthRates,
    alerts: &[Alert],
    top: &TopPerformers<'_>,
    generated_at: NaiveDateTime,
) -> fmt::Result {
    writeln!(out, "📊 Daily KPI Report - {}", current.date.format("%A, %B %d, %Y"))?;
    writeln!(out)?;
    writeln!(out, "🔢 Key Metrics:")?;
    writeln!(
        out,
        "• Total Payment Volume (TPV): {}{}",
        currency(current.tpv),
        growth_suffix(growth, Metric::Tpv)
    )?;
    writeln!(
        out,
        "• Average Ticket: {}{}",
        currency(current.avg_ticket),
        growth_suffix(growth, Metric::AvgTicket)
    )?;
    writeln!(
        out,
        "• Total Transactions: {}{}",
        thousands(current.total_transactions),
        growth_suffix(growth, Metric::TotalTransactions)
    )?;
    writeln!(out, "• Total Merchants: {}", thousands(current.total_merchants))?;
    writeln!(out)?;

    let (entity, entity_amount) = top.entity;
    let (product, product_amount) = top.product;
    let (method, method_amount) = top.payment_method;
    writeln!(out, "📈 Top Performers:")?;
    writeln!(out, "• Highest TPV Entity: {entity} ({})", currency(entity_amount))?;
    writeln!(out, "• Top Product: {product} ({})", currency(product_amount))?;
    writeln!(out, "• Leading Payment Method: {method} ({})", currency(method_amount))?;
    writeln!(out)?;

    if alerts.is_empty() {
        writeln!(out, "✅ No alerts - All metrics within normal ranges")?;
    } else {
        writeln!(out, "🚨 Alerts:")?;
        for alert in alerts {
            writeln!(out, "• {alert}")?;
        }
    }

    writeln!(out)?;
    write!(
        out,
        "📅 Generated on {} | KPI SUMMARY",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )
}

fn growth_suffix(growth: &GrowthRates, metric: Metric) -> String {
    match growth.get(metric) {
        Some(Growth::Change(pct)) => format!(" ({})", signed_percent(pct)),
        Some(Growth::Unavailable) => format!(" ({}, no prior basis)", signed_percent(0.0)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 3)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn breakdown(pairs: &[(&str, f64)]) -> Breakdown {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn snapshot() -> KpiSnapshot {
        KpiSnapshot {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            tpv: 1_234_567.891,
            avg_ticket: 50.0,
            total_transactions: 24_691,
            total_merchants: 1_200,
            entity_breakdown: breakdown(&[("Acme", 1_000_000.0), ("Beta", 234_567.891)]),
            product_breakdown: breakdown(&[("POS", 600_000.0), ("Link", 634_567.891)]),
            payment_method_breakdown: breakdown(&[("credit", 617_283.9455), ("debit", 617_283.9455)]),
        }
    }

    #[test]
    fn renders_metrics_without_growth() {
        let r = render_report(&snapshot(), &GrowthRates::none(), &[], generated_at()).unwrap();
        assert_eq!(r.subject, "📊 Daily Data Report - January 02, 2024");
        assert!(r.body.starts_with("📊 Daily KPI Report - Tuesday, January 02, 2024\n"));
        assert!(r.body.contains("• Total Payment Volume (TPV): $1,234,567.89\n"));
        assert!(r.body.contains("• Average Ticket: $50.00\n"));
        assert!(r.body.contains("• Total Transactions: 24,691\n"));
        assert!(r.body.contains("• Total Merchants: 1,200\n"));
        assert!(!r.body.contains('%'));
        assert!(r.body.contains("✅ No alerts - All metrics within normal ranges"));
        assert!(r.body.ends_with("📅 Generated on 2024-01-03 08:30:00 | KPI SUMMARY"));
    }

    #[test]
    fn renders_growth_and_unavailable_basis() {
        let mut growth = GrowthRates::none();
        growth.insert(Metric::Tpv, Growth::Change(12.345));
        growth.insert(Metric::AvgTicket, Growth::Change(-3.0));
        growth.insert(Metric::TotalTransactions, Growth::Unavailable);
        let r = render_report(&snapshot(), &growth, &[], generated_at()).unwrap();
        assert!(r.body.contains("$1,234,567.89 (+12.3%)"));
        assert!(r.body.contains("$50.00 (-3.0%)"));
        assert!(r.body.contains("24,691 (+0.0%, no prior basis)"));
    }

    #[test]
    fn renders_top_performers_with_label_tie_break() {
        let r = render_report(&snapshot(), &GrowthRates::none(), &[], generated_at()).unwrap();
        assert!(r.body.contains("• Highest TPV Entity: Acme ($1,000,000.00)"));
        assert!(r.body.contains("• Top Product: Link ($634,567.89)"));
        assert!(r.body.contains("• Leading Payment Method: credit ($617,283.95)"));
    }

    #[test]
    fn renders_alerts_and_flags_subject() {
        let alerts = vec![
            Alert::new("TPV dropped 25.0% vs previous day"),
            Alert::new("No transactions recorded today"),
        ];
        let r = render_report(&snapshot(), &GrowthRates::none(), &alerts, generated_at()).unwrap();
        assert_eq!(r.subject, "📊 Daily Data Report - January 02, 2024 🚨");
        assert!(r.body.contains(
            "🚨 Alerts:\n• TPV dropped 25.0% vs previous day\n• No transactions recorded today\n"
        ));
        assert!(!r.body.contains("No alerts"));
    }

    #[test]
    fn body_layout() {
        let mut growth = GrowthRates::none();
        growth.insert(Metric::Tpv, Growth::Change(-25.0));
        let alerts = vec![Alert::new("TPV dropped 25.0% vs previous day")];
        let r = render_report(&snapshot(), &growth, &alerts, generated_at()).unwrap();
        let expected = "\
📊 Daily KPI Report - Tuesday, January 02, 2024

🔢 Key Metrics:
• Total Payment Volume (TPV): $1,234,567.89 (-25.0%)
• Average Ticket: $50.00
• Total Transactions: 24,691
• Total Merchants: 1,200

📈 Top Performers:
• Highest TPV Entity: Acme ($1,000,000.00)
• Top Product: Link ($634,567.89)
• Leading Payment Method: credit ($617,283.95)

🚨 Alerts:
• TPV dropped 25.0% vs previous day

📅 Generated on 2024-01-03 08:30:00 | KPI SUMMARY";
        assert_eq!(r.body, expected);
    }

    #[test]
    fn empty_breakdown_is_an_error() {
        let mut s = snapshot();
        s.product_breakdown.clear();
        let err = render_report(&s, &GrowthRates::none(), &[], generated_at()).unwrap_err();
        assert!(err.to_string().contains("product breakdown is empty"));
    }

    #[test]
    fn top_performer_prefers_first_label_on_ties() {
        let b = breakdown(&[("zeta", 10.0), ("alpha", 10.0), ("mid", 5.0)]);
        assert_eq!(top_performer(&b), Some(("alpha", 10.0)));
        assert_eq!(top_performer(&Breakdown::new()), None);
    }
}
