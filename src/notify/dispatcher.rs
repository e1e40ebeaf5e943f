use super::channels::DeliveryChannels;
use super::types::{Attempt, DispatchReport, NotificationRequest};
use log::{error, info, warn};

/// Delivers alerts through the request's channel plan, stopping at the
/// first channel that succeeds.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    channels: C,
}

impl<C: DeliveryChannels> Dispatcher<C> {
    pub fn new(channels: C) -> Self {
        Self { channels }
    }

    /// Never fails; per-channel failures are logged and recorded in the report.
    pub async fn dispatch(&self, request: &NotificationRequest) -> DispatchReport {
        info!("[notify] {}: {}", request.title, request.message);

        let mut report = DispatchReport::default();
        for channel in request.plan() {
            match self.channels.deliver(channel, request).await {
                Ok(()) => {
                    report.attempts.push(Attempt {
                        channel,
                        error: None,
                    });
                    report.delivered = true;
                    break;
                }
                Err(e) => {
                    warn!("⚠️ {channel} delivery failed: {e}");
                    report.attempts.push(Attempt {
                        channel,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        if !report.delivered {
            match request.provider.remote_channel() {
                Some(remote) if !request.fallback_to_local => {
                    error!("❌ {remote} delivery failed and local fallback is disabled");
                }
                _ => warn!("⚠️ Alert was not delivered on any channel"),
            }
        }
        report
    }
}
