use super::error::{NotifyError, NotifyResult};
use super::remote::{self, Endpoints};
use super::types::{ChannelKind, NotificationRequest};
use super::local;
use std::future::Future;
use std::time::Duration;

/// Delivery backend for the individual channels.
///
/// The dispatcher only decides the order; implementations perform one
/// attempt on one channel and report success or failure.
pub trait DeliveryChannels: Send + Sync {
    fn deliver(
        &self,
        channel: ChannelKind,
        request: &NotificationRequest,
    ) -> impl Future<Output = NotifyResult<()>> + Send;
}

/// Real channels: HTTPS providers, desktop toast helpers and the beep.
#[derive(Debug, Clone)]
pub struct SystemChannels {
    http: reqwest::Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl SystemChannels {
    /// `timeout` bounds every remote call and every local helper process.
    pub fn new(timeout: Duration) -> NotifyResult<Self> {
        Self::with_endpoints(timeout, Endpoints::default())
    }

    /// Same as [`SystemChannels::new`] with the provider URLs replaced.
    pub fn with_endpoints(timeout: Duration, endpoints: Endpoints) -> NotifyResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| NotifyError::HttpClient { source })?;
        Ok(Self {
            http,
            endpoints,
            timeout,
        })
    }
}

impl DeliveryChannels for SystemChannels {
    async fn deliver(&self, channel: ChannelKind, request: &NotificationRequest) -> NotifyResult<()> {
        match channel {
            ChannelKind::Pushover => {
                let creds = request
                    .pushover
                    .as_ref()
                    .ok_or(NotifyError::MissingCredentials { channel })?;
                let url = &self.endpoints.pushover_url;
                remote::send_pushover(&self.http, url, creds, &request.title, &request.message).await
            }
            ChannelKind::Telegram => {
                let creds = request
                    .telegram
                    .as_ref()
                    .ok_or(NotifyError::MissingCredentials { channel })?;
                let api = &self.endpoints.telegram_api;
                remote::send_telegram(&self.http, api, creds, &request.title, &request.message).await
            }
            ChannelKind::Toast => local::show_toast(&request.title, &request.message, self.timeout).await,
            ChannelKind::Beep => local::beep(self.timeout).await,
        }
    }
}
