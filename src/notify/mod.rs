/// Alert delivery with remote providers and local fallback
///
/// - `types`: provider, channel plan and dispatch report
/// - `channels`: the delivery backend trait and the system implementation
/// - `dispatcher`: ordered delivery with stop-at-first-success
pub mod channels;
pub mod dispatcher;
pub mod error;
mod local;
mod remote;
pub mod types;

#[cfg(test)]
pub(crate) mod tests;

pub use channels::{DeliveryChannels, SystemChannels};
pub use dispatcher::Dispatcher;
pub use error::{NotifyError, NotifyResult};
pub use remote::Endpoints;
pub use types::{
    Attempt, ChannelKind, DispatchReport, NotificationPolicy, NotificationRequest, Provider,
    PushoverCredentials, TelegramCredentials,
};
