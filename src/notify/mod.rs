pub mod email;
pub mod log;

use metrics::counter;

use crate::report::Report;
pub use email::EmailNotifier;
pub use log::LogNotifier;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("authentication rejected: {0}")]
    Authentication(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("could not build message: {0}")]
    Build(String),
}

/// Delivers a finished report to a fixed destination.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, report: &Report) -> Result<(), DeliveryError>;
    fn name(&self) -> &'static str;
}

/// Send and log the outcome. Never retries, never fails the run.
pub async fn deliver(notifier: &dyn Notifier, report: &Report) -> bool {
    tracing::info!(notifier = notifier.name(), subject = %report.subject, "delivering report");
    match notifier.send(report).await {
        Ok(()) => {
            tracing::info!(notifier = notifier.name(), "report delivered");
            true
        }
        Err(e @ DeliveryError::Authentication(_)) => {
            tracing::error!(
                notifier = notifier.name(),
                error = %e,
                "delivery failed: check EMAIL_ADDRESS and EMAIL_PASSWORD (Gmail needs an app password)"
            );
            counter!("notify_failures_total").increment(1);
            false
        }
        Err(e) => {
            tracing::error!(notifier = notifier.name(), error = %e, "delivery failed");
            counter!("notify_failures_total").increment(1);
            false
        }
    }
}
