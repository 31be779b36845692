use crate::config::EmailSettings;
use crate::domain::report::Report;
use crate::notify::Notifier;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends the report as a plain-text email over STARTTLS to a single recipient.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpNotifier {
    pub fn from_email_settings(email: &EmailSettings) -> Result<Self> {
        let sender = email
            .sender
            .parse::<Mailbox>()
            .with_context(|| format!("invalid SMTP_SENDER address: {}", email.sender))?;
        let recipient = email
            .recipient
            .parse::<Mailbox>()
            .with_context(|| format!("invalid REPORT_RECIPIENT address: {}", email.recipient))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&email.smtp_host)
            .with_context(|| format!("failed to configure SMTP relay {}", email.smtp_host))?
            .port(email.smtp_port)
            .credentials(Credentials::new(
                email.sender.clone(),
                email.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    fn channel(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, report: &Report) -> Result<()> {
        let message = build_message(&self.sender, &self.recipient, report)?;
        self.transport
            .send(message)
            .await
            .context("SMTP delivery failed")?;
        tracing::info!(recipient = %self.recipient, subject = %report.subject, "report emailed");
        Ok(())
    }
}

fn build_message(sender: &Mailbox, recipient: &Mailbox, report: &Report) -> Result<Message> {
    Message::builder()
        .from(sender.clone())
        .to(recipient.clone())
        .subject(report.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(report.body.clone())
        .context("failed to build report email")
}
