mod console;
mod smtp;

pub use console::ConsoleNotifier;
pub use smtp::SmtpNotifier;

use crate::domain::report::Report;

/// Delivers a rendered report. One attempt per call.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;

    async fn send(&self, report: &Report) -> anyhow::Result<()>;
}
