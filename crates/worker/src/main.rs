use anyhow::Context;
use clap::Parser;
use kpi_digest_core::domain::report::Report;
use kpi_digest_core::ingest::{CsvFileSource, DataSource, HttpCsvSource};
use kpi_digest_core::notify::{ConsoleNotifier, Notifier, SmtpNotifier};
use kpi_digest_core::pipeline::{RunError, RunOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_FAILURE: u8 = 1;
const EXIT_NO_DATA: u8 = 2;

#[derive(Debug, Parser)]
#[command(name = "kpi_digest_worker")]
struct Args {
    /// Transaction log CSV file. Overrides KPI_DATA_PATH.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Transaction log CSV URL. Overrides KPI_DATA_URL.
    #[arg(long, conflicts_with = "data")]
    url: Option<String>,

    /// Day to report on (YYYY-MM-DD). Defaults to the latest day in the log.
    #[arg(long)]
    as_of_date: Option<String>,

    /// Render and print the report without emailing it.
    #[arg(long)]
    dry_run: bool,

    /// Print the computed digest as JSON.
    #[arg(long)]
    json: bool,

    /// Also write the report to this file. Written on delivery failure too.
    #[arg(long)]
    report_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let settings = kpi_digest_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let options = RunOptions {
        thresholds: settings.alert_thresholds(),
        as_of_date: resolve_as_of_date(args.as_of_date.as_deref())?,
    };

    let source = build_source(&args, &settings)?;
    let notifier = build_notifier(args.dry_run, &settings)?;

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("daily_report", %run_id, dry_run = args.dry_run);

    println!("🤖 Daily Data Summary - Starting Daily Analysis...");
    let result = kpi_digest_core::pipeline::run(source.as_ref(), notifier.as_ref(), &options)
        .instrument(span)
        .await;

    match result {
        Ok(digest) => {
            if let Some(path) = &args.report_out {
                write_report(path, &digest.report)?;
            }
            if args.json {
                println!("{}", serde_json::to_string_pretty(&digest)?);
            }
            println!(
                "🎉 Daily report for {} delivered via {}",
                digest.date,
                notifier.channel()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Ok(report_failure(err, args.report_out.as_deref())),
    }
}

fn report_failure(err: RunError, report_out: Option<&Path>) -> ExitCode {
    if let Some(report) = err.report() {
        println!("{}\n\n{}", report.subject, report.body);
        if let Some(path) = report_out {
            if let Err(write_err) = write_report(path, report) {
                tracing::error!(error = %write_err, "failed to save undelivered report");
            }
        }
    }

    let code = match err {
        RunError::NoData { .. } => {
            tracing::warn!(error = %err, "daily report skipped");
            EXIT_NO_DATA
        }
        _ => {
            tracing::error!(error = %err, "daily report failed");
            EXIT_FAILURE
        }
    };

    println!("❌ Analysis failed: {err}");
    if code == EXIT_FAILURE {
        sentry_anyhow::capture_anyhow(&anyhow::Error::new(err));
    }
    ExitCode::from(code)
}

fn build_source(
    args: &Args,
    settings: &kpi_digest_core::config::Settings,
) -> anyhow::Result<Box<dyn DataSource>> {
    if let Some(path) = &args.data {
        return Ok(Box::new(CsvFileSource::new(path)));
    }
    if let Some(url) = &args.url {
        let timeout = Duration::from_secs(settings.data_timeout_secs);
        return Ok(Box::new(HttpCsvSource::new(url.as_str(), timeout)?));
    }
    if settings.data_path.is_none() && settings.data_url.is_some() {
        return Ok(Box::new(HttpCsvSource::from_settings(settings)?));
    }
    Ok(Box::new(CsvFileSource::from_settings(settings)?))
}

fn build_notifier(
    dry_run: bool,
    settings: &kpi_digest_core::config::Settings,
) -> anyhow::Result<Box<dyn Notifier>> {
    if dry_run {
        return Ok(Box::new(ConsoleNotifier::new()));
    }

    match settings.email() {
        Some(email) => {
            tracing::info!(host = %email.smtp_host, port = email.smtp_port, "email delivery enabled");
            Ok(Box::new(SmtpNotifier::from_email_settings(&email)?))
        }
        None => {
            tracing::info!("email not configured (SMTP_SENDER, SMTP_PASSWORD, REPORT_RECIPIENT); printing report");
            Ok(Box::new(ConsoleNotifier::new()))
        }
    }
}

fn write_report(path: &Path, report: &Report) -> anyhow::Result<()> {
    std::fs::write(path, format!("{}\n\n{}\n", report.subject, report.body))
        .with_context(|| format!("failed to write report to {}", path.display()))
}

fn init_sentry(settings: &kpi_digest_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

fn resolve_as_of_date(as_of_date_arg: Option<&str>) -> anyhow::Result<Option<chrono::NaiveDate>> {
    as_of_date_arg
        .map(|s| {
            chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid --as-of-date {s:?}, expected YYYY-MM-DD"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::try_parse_from([
            "kpi_digest_worker",
            "--data",
            "transactions.csv",
            "--as-of-date",
            "2024-01-02",
            "--dry-run",
            "--json",
        ])
        .unwrap();
        assert_eq!(args.data, Some(PathBuf::from("transactions.csv")));
        assert_eq!(args.as_of_date.as_deref(), Some("2024-01-02"));
        assert!(args.dry_run);
        assert!(args.json);
        assert!(args.report_out.is_none());
    }

    #[test]
    fn data_and_url_conflict() {
        let res = Args::try_parse_from([
            "kpi_digest_worker",
            "--data",
            "transactions.csv",
            "--url",
            "https://example.com/log.csv",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn resolves_optional_as_of_date() {
        assert_eq!(resolve_as_of_date(None).unwrap(), None);
        assert_eq!(
            resolve_as_of_date(Some("2024-01-02")).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        );
        assert!(resolve_as_of_date(Some("01/02/2024")).is_err());
    }

    #[test]
    fn writes_report_file() {
        let path = std::env::temp_dir().join(format!("kpi_digest_report_{}.txt", std::process::id()));
        let report = Report {
            subject: "subject".to_string(),
            body: "body".to_string(),
        };
        write_report(&path, &report).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, "subject\n\nbody\n");
    }
}
