use super::{DeliveryError, Notifier};
use crate::report::Report;

/// Dry-run sink used when no mail credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, report: &Report) -> Result<(), DeliveryError> {
        tracing::info!(
            subject = %report.subject,
            body_len = report.body.len(),
            "mail not configured, report follows"
        );
        tracing::info!("\n{}", report.body);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
