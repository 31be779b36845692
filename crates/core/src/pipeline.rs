use crate::alert::{detect_alerts, AlertThresholds};
use crate::domain::report::{Alert, Report};
use crate::domain::snapshot::{GrowthRates, KpiSnapshot};
use crate::domain::transaction::TransactionRecord;
use crate::ingest::{latest_day, DataSource};
use crate::kpi::{compute_growth, compute_snapshot, previous_day};
use crate::notify::Notifier;
use crate::report::render_report;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub thresholds: AlertThresholds,
    /// Day to report on. Defaults to the latest day in the log.
    pub as_of_date: Option<NaiveDate>,
}

/// Everything one run computed, including the rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct DailyDigest {
    pub date: NaiveDate,
    pub previous_date: NaiveDate,
    pub current: KpiSnapshot,
    pub previous: Option<KpiSnapshot>,
    pub growth: GrowthRates,
    pub alerts: Vec<Alert>,
    pub report: Report,
}

/// Terminal outcomes of a failed run.
#[derive(Debug)]
pub enum RunError {
    Load(anyhow::Error),
    /// The log is empty, or the target day has no rows.
    NoData { date: Option<NaiveDate> },
    Render(anyhow::Error),
    /// The report was rendered but could not be delivered. The report is kept.
    Delivery { report: Report, error: anyhow::Error },
}

impl RunError {
    pub fn report(&self) -> Option<&Report> {
        match self {
            RunError::Delivery { report, .. } => Some(report),
            _ => None,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Load(err) => write!(f, "failed to load transaction log: {err:#}"),
            RunError::NoData { date: Some(date) } => write!(f, "no data found for {date}"),
            RunError::NoData { date: None } => write!(f, "no data found: transaction log is empty"),
            RunError::Render(err) => write!(f, "failed to render report: {err:#}"),
            RunError::Delivery { error, .. } => write!(f, "failed to deliver report: {error:#}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Load(err) | RunError::Render(err) | RunError::Delivery { error: err, .. } => {
                Some(&**err)
            }
            RunError::NoData { .. } => None,
        }
    }
}

/// Computes the digest for one day from an in-memory log. No I/O.
pub fn build_digest(
    records: &[TransactionRecord],
    options: &RunOptions,
    generated_at: NaiveDateTime,
) -> Result<DailyDigest, RunError> {
    let date = options
        .as_of_date
        .or_else(|| latest_day(records))
        .ok_or(RunError::NoData { date: None })?;

    let current = compute_snapshot(records, date).ok_or(RunError::NoData { date: Some(date) })?;

    let previous_date = previous_day(date);
    let previous = compute_snapshot(records, previous_date);
    if previous.is_none() {
        tracing::info!(%previous_date, "no data for comparison day; growth unavailable");
    }

    let growth = compute_growth(&current, previous.as_ref());
    let alerts = detect_alerts(&current, previous.as_ref(), &growth, &options.thresholds);
    let report =
        render_report(&current, &growth, &alerts, generated_at).map_err(RunError::Render)?;

    tracing::info!(
        %date,
        tpv = current.tpv,
        total_transactions = current.total_transactions,
        alerts_len = alerts.len(),
        "daily digest computed"
    );

    Ok(DailyDigest {
        date,
        previous_date,
        current,
        previous,
        growth,
        alerts,
        report,
    })
}

/// Load, compute, deliver. Every failure is terminal; nothing is retried.
pub async fn run(
    source: &dyn DataSource,
    notifier: &dyn Notifier,
    options: &RunOptions,
) -> Result<DailyDigest, RunError> {
    let records = source.load().await.map_err(RunError::Load)?;
    tracing::info!(
        source = source.source_name(),
        rows = records.len(),
        latest_day = ?latest_day(&records),
        "transaction log loaded"
    );

    let generated_at = chrono::Local::now().naive_local();
    let digest = build_digest(&records, options, generated_at)?;

    if let Err(error) = notifier.send(&digest.report).await {
        return Err(RunError::Delivery {
            report: digest.report,
            error,
        });
    }
    tracing::info!(channel = notifier.channel(), date = %digest.date, "report delivered");

    Ok(digest)
}
