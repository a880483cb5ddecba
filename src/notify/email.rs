use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};
use std::time::Duration;

use super::{DeliveryError, Notifier};
use crate::config::{MailCredentials, SmtpSettings};
use crate::report::Report;

/// SMTP reply codes that mean the login itself was refused.
const AUTH_CODES: [&str; 3] = ["530", "534", "535"];

/// Plain-text mail over STARTTLS.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

fn parse_mailbox(addr: &str) -> Result<Mailbox, DeliveryError> {
    addr.parse().map_err(|e: lettre::address::AddressError| DeliveryError::InvalidAddress {
        address: addr.to_string(),
        reason: e.to_string(),
    })
}

fn classify(err: lettre::transport::smtp::Error) -> DeliveryError {
    let is_auth = err
        .status()
        .is_some_and(|code| AUTH_CODES.contains(&code.to_string().as_str()));
    if is_auth {
        DeliveryError::Authentication(err.to_string())
    } else {
        DeliveryError::Transport(err.to_string())
    }
}

impl EmailNotifier {
    pub fn new(smtp: &SmtpSettings, mail: MailCredentials) -> Result<Self, DeliveryError> {
        let from = parse_mailbox(&mail.sender)?;
        let to = parse_mailbox(&mail.recipient)?;

        let creds = Credentials::new(mail.sender, mail.password);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(|e| DeliveryError::Transport(format!("invalid smtp host {}: {e}", smtp.host)))?
            .port(smtp.port)
            .credentials(creds)
            .timeout(Some(Duration::from_secs(smtp.timeout_secs)))
            .build();

        Ok(Self { mailer, from, to })
    }

    pub fn build_message(&self, report: &Report) -> Result<Message, DeliveryError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(report.subject.clone())
            .header(header::ContentType::TEXT_PLAIN)
            .body(report.body.clone())
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, report: &Report) -> Result<(), DeliveryError> {
        let msg = self.build_message(report)?;
        self.mailer.send(msg).await.map_err(classify)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "email"
    }
}
