use crate::domain::report::Report;
use crate::notify::Notifier;
use anyhow::Result;

/// Prints the report to stdout. Used when email is not configured and for dry runs.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    fn channel(&self) -> &'static str {
        "console"
    }

    async fn send(&self, report: &Report) -> Result<()> {
        println!("{}\n\n{}", report.subject, report.body);
        tracing::info!(subject = %report.subject, "report printed to console");
        Ok(())
    }
}
