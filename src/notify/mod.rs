//! Report delivery by email.
//!
//! A [`ReportMailer`] sends a composed [`ReportEmail`]; the HTTP layer holds
//! one as an injected capability. [`SmtpMailer`] relays through an SMTP
//! server over implicit TLS using credentials read from the environment.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::config::MailConfig;
use crate::error::{TrackerError, TrackerResult};

/// A report email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEmail {
    /// Destination address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// File name of the attachment.
    pub attachment_name: String,
    /// Attachment content (CSV).
    pub attachment: Vec<u8>,
}

impl ReportEmail {
    /// Builds an email using the subject, body and file name from `config`.
    pub fn from_config(config: &MailConfig, recipient: &str, attachment: Vec<u8>) -> Self {
        Self {
            recipient: recipient.trim().to_string(),
            subject: config.subject.clone(),
            body: config.body.clone(),
            attachment_name: config.attachment_name.clone(),
            attachment,
        }
    }
}

/// Delivers report emails.
pub trait ReportMailer: Send + Sync {
    /// Sends the email once; failures are reported, never retried.
    fn send(&self, email: &ReportEmail) -> TrackerResult<()>;
}

/// Validates a recipient address.
pub fn parse_recipient(recipient: &str) -> TrackerResult<Mailbox> {
    recipient
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| TrackerError::InvalidRequest {
            field: "recipient".to_string(),
            message: e.to_string(),
        })
}

fn mail_error(error: impl std::fmt::Display) -> TrackerError {
    TrackerError::Mail {
        message: error.to_string(),
    }
}

/// SMTP relay mailer.
pub struct SmtpMailer {
    relay: String,
    port: u16,
    sender: Mailbox,
    credentials: Credentials,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("relay", &self.relay)
            .field("port", &self.port)
            .field("sender", &self.sender.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Creates a mailer for the configured relay with explicit credentials.
    ///
    /// The sender defaults to the relay username when `config.sender` is unset.
    pub fn new(config: &MailConfig, username: String, password: String) -> TrackerResult<Self> {
        let sender = config
            .sender
            .as_deref()
            .unwrap_or(&username)
            .parse::<Mailbox>()
            .map_err(|e| TrackerError::InvalidConfig {
                field: "mail.sender".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            relay: config.relay.clone(),
            port: config.port,
            sender,
            credentials: Credentials::new(username, password),
        })
    }

    /// Creates a mailer with credentials taken from the environment variables
    /// named in `config`.
    ///
    /// Returns [`TrackerError::MailNotConfigured`] if either variable is unset
    /// or empty.
    pub fn from_env(config: &MailConfig) -> TrackerResult<Self> {
        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .ok_or(TrackerError::MailNotConfigured)
        };
        let username = read(&config.username_env)?;
        let password = read(&config.password_env)?;
        Self::new(config, username, password)
    }

    /// Builds the MIME message: a plain-text part plus the CSV attachment.
    pub fn compose(&self, email: &ReportEmail) -> TrackerResult<Message> {
        let recipient = parse_recipient(&email.recipient)?;
        let csv = ContentType::parse("text/csv").map_err(mail_error)?;

        Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(email.subject.clone())
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(email.body.clone()))
                    .singlepart(
                        Attachment::new(email.attachment_name.clone())
                            .body(email.attachment.clone(), csv),
                    ),
            )
            .map_err(mail_error)
    }
}

impl ReportMailer for SmtpMailer {
    fn send(&self, email: &ReportEmail) -> TrackerResult<()> {
        let message = self.compose(email)?;

        let transport = SmtpTransport::relay(&self.relay)
            .map_err(mail_error)?
            .port(self.port)
            .credentials(self.credentials.clone())
            .build();

        transport.send(&message).map_err(mail_error)?;

        info!(
            relay = %self.relay,
            recipient = %email.recipient,
            attachment_bytes = email.attachment.len(),
            "Report email sent"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer() -> SmtpMailer {
        SmtpMailer::new(
            &MailConfig::default(),
            "reports@example.com".to_string(),
            "app-password".to_string(),
        )
        .unwrap()
    }

    fn email(recipient: &str) -> ReportEmail {
        ReportEmail::from_config(
            &MailConfig::default(),
            recipient,
            b"Emp ID,Name\nE001,John Doe\n".to_vec(),
        )
    }

    #[test]
    fn test_email_uses_configured_text() {
        let email = email("  hr@example.com ");
        assert_eq!(email.recipient, "hr@example.com");
        assert_eq!(email.subject, "Gratuity Report");
        assert_eq!(email.attachment_name, "filtered_report.csv");
    }

    #[test]
    fn test_compose_includes_subject_and_attachment() {
        let message = mailer().compose(&email("hr@example.com")).unwrap();
        let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(formatted.contains("Subject: Gratuity Report"));
        assert!(formatted.contains("To: hr@example.com"));
        assert!(formatted.contains("From: reports@example.com"));
        assert!(formatted.contains("filtered_report.csv"));
        assert!(formatted.contains("text/csv"));
    }

    #[test]
    fn test_compose_rejects_bad_recipient() {
        let result = mailer().compose(&email("not an address"));
        assert!(matches!(
            result,
            Err(TrackerError::InvalidRequest { field, .. }) if field == "recipient"
        ));
    }

    #[test]
    fn test_explicit_sender_overrides_username() {
        let config = MailConfig {
            sender: Some("Payroll <payroll@example.com>".to_string()),
            ..MailConfig::default()
        };
        let mailer = SmtpMailer::new(&config, "relay-user@example.com".to_string(), "pw".to_string())
            .unwrap();
        let message = mailer.compose(&email("hr@example.com")).unwrap();
        let formatted = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(formatted.contains("payroll@example.com"));
    }

    #[test]
    fn test_invalid_sender_rejected() {
        let result = SmtpMailer::new(&MailConfig::default(), "no-at-sign".to_string(), "pw".to_string());
        assert!(matches!(result, Err(TrackerError::InvalidConfig { .. })));
    }

    #[test]
    fn test_from_env_without_credentials() {
        let config = MailConfig {
            username_env: "GRATUITY_TRACKER_TEST_UNSET_USER".to_string(),
            password_env: "GRATUITY_TRACKER_TEST_UNSET_PASS".to_string(),
            ..MailConfig::default()
        };
        assert!(matches!(
            SmtpMailer::from_env(&config),
            Err(TrackerError::MailNotConfigured)
        ));
    }
}
