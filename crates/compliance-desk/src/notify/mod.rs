//! Expiry-warning notifications.
//!
//! Dispatch is best effort by policy: an unconfigured transport is a
//! silent success, and a configured transport that fails to deliver is
//! logged and swallowed. The caller never learns whether a recipient
//! exists or a relay was reachable.

use std::sync::Arc;

use lettre::message::{header, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::warn;

use crate::config::MailConfig;

/// Outbound message handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub recipients: Vec<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Mail dispatch error. Never crosses the notifier boundary.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("malformed address '{0}'")]
    Address(String),
    #[error("mail transport failure: {0}")]
    Transport(String),
}

/// Delivery capability consumed by the notifier. `is_configured`
/// returning false turns dispatch into a no-op before any message is
/// built.
pub trait MailTransport: Send + Sync {
    fn is_configured(&self) -> bool;
    fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Formats expiry warnings and hands them to the transport.
#[derive(Debug)]
pub struct ExpiryNotifier<M> {
    transport: Arc<M>,
}

impl<M: MailTransport> ExpiryNotifier<M> {
    pub fn new(transport: Arc<M>) -> Self {
        Self { transport }
    }

    /// Send the fixed-template expiry warning for `artifact_label` to
    /// `recipients`. Infallible at this boundary; delivery problems are
    /// recorded at warn level and dropped.
    pub fn notify_expiry(&self, recipients: &[String], artifact_label: &str, days_left: i64) {
        if !self.transport.is_configured() {
            return;
        }

        let message = expiry_message(recipients, artifact_label, days_left);
        if let Err(err) = self.transport.send(&message) {
            warn!(artifact = artifact_label, error = %err, "expiry notification dropped");
        }
    }
}

fn expiry_message(recipients: &[String], artifact_label: &str, days_left: i64) -> MailMessage {
    let subject = format!("{artifact_label} expires in {days_left} day(s)");
    let text_body = format!(
        "Hello,\n\nThe compliance document {artifact_label} expires in {days_left} day(s). \
         Please review its outstanding conditions.\n",
    );
    let html_body = format!(
        "<p>Hello,</p><p>The compliance document <strong>{artifact_label}</strong> expires in \
         {days_left} day(s). Please review its outstanding conditions.</p>",
    );

    MailMessage {
        recipients: recipients.to_vec(),
        subject,
        text_body,
        html_body,
    }
}

/// SMTP-backed transport. Built without credentials it reports itself
/// unconfigured and the notifier short-circuits.
#[derive(Debug)]
pub struct SmtpMailer {
    config: Option<MailConfig>,
}

impl SmtpMailer {
    pub fn from_config(config: Option<MailConfig>) -> Self {
        Self { config }
    }

    pub fn unconfigured() -> Self {
        Self { config: None }
    }
}

impl MailTransport for SmtpMailer {
    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let Some(config) = &self.config else {
            return Ok(());
        };

        let from: Mailbox = config
            .from_address
            .parse()
            .map_err(|_| MailError::Address(config.from_address.clone()))?;

        let mut builder = Message::builder().from(from).subject(message.subject.clone());
        for recipient in &message.recipients {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|_| MailError::Address(recipient.clone()))?;
            builder = builder.to(mailbox);
        }

        let email = builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(message.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(message.html_body.clone()),
                    ),
            )
            .map_err(|err| MailError::Transport(err.to_string()))?;

        let transport = SmtpTransport::starttls_relay(&config.smtp_server)
            .map_err(|err| MailError::Transport(err.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .port(config.smtp_port)
            .build();

        transport
            .send(&email)
            .map_err(|err| MailError::Transport(err.to_string()))?;

        Ok(())
    }
}
