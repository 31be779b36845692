pub mod alert;
pub mod domain;
pub mod ingest;
pub mod kpi;
pub mod notify;
pub mod pipeline;
pub mod report;

pub mod config {
    use anyhow::Context;

    const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
    const DEFAULT_SMTP_PORT: u16 = 587;
    const DEFAULT_DATA_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub data_path: Option<String>,
        pub data_url: Option<String>,
        pub data_timeout_secs: u64,
        pub smtp_host: String,
        pub smtp_port: u16,
        pub smtp_sender: Option<String>,
        pub smtp_password: Option<String>,
        pub report_recipient: Option<String>,
        pub sentry_dsn: Option<String>,
        pub tpv_drop_pct: Option<f64>,
        pub avg_ticket_drop_pct: Option<f64>,
        pub transactions_drop_pct: Option<f64>,
    }

    /// Everything the SMTP notifier needs. Only built when all credentials are present.
    #[derive(Debug, Clone)]
    pub struct EmailSettings {
        pub smtp_host: String,
        pub smtp_port: u16,
        pub sender: String,
        pub password: String,
        pub recipient: String,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                data_path: non_empty_var("KPI_DATA_PATH"),
                data_url: non_empty_var("KPI_DATA_URL"),
                data_timeout_secs: parsed_var("KPI_DATA_TIMEOUT_SECS")
                    .unwrap_or(DEFAULT_DATA_TIMEOUT_SECS),
                smtp_host: non_empty_var("SMTP_HOST")
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                smtp_port: parsed_var("SMTP_PORT").unwrap_or(DEFAULT_SMTP_PORT),
                smtp_sender: non_empty_var("SMTP_SENDER"),
                smtp_password: non_empty_var("SMTP_PASSWORD"),
                report_recipient: non_empty_var("REPORT_RECIPIENT"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                tpv_drop_pct: parsed_var("ALERT_TPV_DROP_PCT"),
                avg_ticket_drop_pct: parsed_var("ALERT_AVG_TICKET_DROP_PCT"),
                transactions_drop_pct: parsed_var("ALERT_TRANSACTIONS_DROP_PCT"),
            })
        }

        pub fn require_data_path(&self) -> anyhow::Result<&str> {
            self.data_path
                .as_deref()
                .context("KPI_DATA_PATH is required")
        }

        /// Returns `None` when any of sender, password or recipient is missing; the caller
        /// then falls back to console delivery.
        pub fn email(&self) -> Option<EmailSettings> {
            match (
                &self.smtp_sender,
                &self.smtp_password,
                &self.report_recipient,
            ) {
                (Some(sender), Some(password), Some(recipient)) => Some(EmailSettings {
                    smtp_host: self.smtp_host.clone(),
                    smtp_port: self.smtp_port,
                    sender: sender.clone(),
                    password: password.clone(),
                    recipient: recipient.clone(),
                }),
                _ => None,
            }
        }

        pub fn alert_thresholds(&self) -> crate::alert::AlertThresholds {
            let defaults = crate::alert::AlertThresholds::default();
            crate::alert::AlertThresholds {
                tpv_drop_pct: self.tpv_drop_pct.unwrap_or(defaults.tpv_drop_pct),
                avg_ticket_drop_pct: self
                    .avg_ticket_drop_pct
                    .unwrap_or(defaults.avg_ticket_drop_pct),
                transactions_drop_pct: self
                    .transactions_drop_pct
                    .unwrap_or(defaults.transactions_drop_pct),
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn parsed_var<T: std::str::FromStr>(key: &str) -> Option<T> {
        non_empty_var(key).and_then(|s| s.parse::<T>().ok())
    }

}
