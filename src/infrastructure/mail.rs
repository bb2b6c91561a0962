use crate::domain::mail::{MailMessage, MailSender};
use crate::infrastructure::config::SmtpConfig;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, instrument};

/// Delivers notification mail through an SMTP relay.
pub struct SmtpMailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .with_context(|| format!("Invalid SMTP relay: {}", config.host))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        let mut builder = builder.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        info!(host = %config.host, port = config.port, "SMTP transport ready");
        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailSender for SmtpMailSender {
    #[instrument(skip(self, message), fields(subject = %message.subject, to = ?message.to))]
    async fn send(&self, message: &MailMessage) -> Result<()> {
        let email = build_message(message)?;
        self.transport
            .send(email)
            .await
            .context("SMTP relay rejected message")?;
        debug!("Mail accepted by relay");
        Ok(())
    }
}

/// Renders a plain-text message. Fails on an empty or unparsable address.
pub fn build_message(message: &MailMessage) -> Result<Message> {
    if message.to.is_empty() {
        bail!("message has no recipients");
    }
    let from: Mailbox = message
        .from
        .parse()
        .with_context(|| format!("Invalid sender address: {}", message.from))?;

    let mut builder = Message::builder()
        .from(from)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN);
    for to in &message.to {
        let mailbox: Mailbox = to
            .parse()
            .with_context(|| format!("Invalid recipient address: {}", to))?;
        builder = builder.to(mailbox);
    }

    builder
        .body(message.body.clone())
        .context("Failed to build mail message")
}

/// Logs messages instead of delivering them. Used when no SMTP relay is
/// configured, e.g. in local development.
#[derive(Debug, Default, Clone)]
pub struct LogMailSender;

impl LogMailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailSender for LogMailSender {
    #[instrument(skip(self, message), fields(subject = %message.subject))]
    async fn send(&self, message: &MailMessage) -> Result<()> {
        build_message(message)?;
        info!(
            from = %message.from,
            to = ?message.to,
            body = %message.body,
            "Mail not delivered, no SMTP relay configured"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: Vec<&str>) -> MailMessage {
        MailMessage {
            subject: "Recipe Like Notification".to_string(),
            body: "Your recipe \"Cake\" has received new likes today!".to_string(),
            from: "noreply@recipes.local".to_string(),
            to: to.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_build_message_renders_headers_and_body() {
        let email = build_message(&message(vec!["cook@example.com"])).unwrap();
        let raw = String::from_utf8(email.formatted()).unwrap();

        assert!(raw.contains("Subject: Recipe Like Notification"));
        assert!(raw.contains("From: noreply@recipes.local"));
        assert!(raw.contains("To: cook@example.com"));
        assert!(raw.contains("has received new likes today!"));
    }

    #[test]
    fn test_build_message_rejects_missing_or_bad_addresses() {
        assert!(build_message(&message(vec![])).is_err());
        assert!(build_message(&message(vec!["not-an-address"])).is_err());

        let mut bad_sender = message(vec!["cook@example.com"]);
        bad_sender.from = "nobody".to_string();
        assert!(build_message(&bad_sender).is_err());
    }

    #[tokio::test]
    async fn test_smtp_sender_builds_transport_without_connecting() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: Some("mailer".to_string()),
            password: Some("secret".to_string()),
            starttls: false,
        };
        assert!(SmtpMailSender::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_smtp_sender_reports_unreachable_relay() {
        let config = SmtpConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            username: None,
            password: None,
            starttls: false,
        };
        let sender = SmtpMailSender::new(&config).unwrap();
        assert!(sender.send(&message(vec!["cook@example.com"])).await.is_err());
    }

    #[tokio::test]
    async fn test_log_sender_accepts_valid_message() {
        let sender = LogMailSender::new();
        assert!(sender.send(&message(vec!["cook@example.com"])).await.is_ok());
    }

    #[tokio::test]
    async fn test_log_sender_rejects_missing_or_bad_recipients() {
        let sender = LogMailSender::new();
        assert!(sender.send(&message(vec![])).await.is_err());
        assert!(sender.send(&message(vec!["not-an-address"])).await.is_err());
    }
}
