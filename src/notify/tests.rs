//! Dispatcher tests against a scripted channel backend

use crate::notify::{
    ChannelKind, DeliveryChannels, Dispatcher, NotificationPolicy, NotificationRequest,
    NotifyError, NotifyResult, Provider, PushoverCredentials,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Channels that fail or succeed as configured and record every attempt.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedChannels {
    failing: HashSet<ChannelKind>,
    log: Arc<Mutex<Vec<(ChannelKind, String)>>>,
}

impl ScriptedChannels {
    pub(crate) fn failing(channels: &[ChannelKind]) -> Self {
        Self {
            failing: channels.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Channels attempted so far, in order
    pub(crate) fn attempted(&self) -> Vec<ChannelKind> {
        self.log.lock().unwrap().iter().map(|(c, _)| *c).collect()
    }

    /// Messages seen so far, in order
    pub(crate) fn messages(&self) -> Vec<String> {
        self.log.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
    }
}

impl DeliveryChannels for ScriptedChannels {
    async fn deliver(&self, channel: ChannelKind, request: &NotificationRequest) -> NotifyResult<()> {
        self.log
            .lock()
            .unwrap()
            .push((channel, request.message.clone()));
        if self.failing.contains(&channel) {
            Err(NotifyError::Unsupported { channel })
        } else {
            Ok(())
        }
    }
}

fn pushover_policy(fallback_to_local: bool) -> NotificationPolicy {
    NotificationPolicy {
        provider: Provider::Pushover,
        fallback_to_local,
        pushover: Some(PushoverCredentials {
            app_token: "app".to_string(),
            user_key: "user".to_string(),
        }),
        ..NotificationPolicy::default()
    }
}

#[tokio::test]
async fn test_local_toast_failure_falls_back_to_beep() {
    let channels = ScriptedChannels::failing(&[ChannelKind::Toast]);
    let dispatcher = Dispatcher::new(channels.clone());

    let report = dispatcher
        .dispatch(&NotificationPolicy::default().request("Match score 0.950"))
        .await;

    assert!(report.delivered);
    assert_eq!(report.attempts_on(ChannelKind::Toast), 1);
    assert_eq!(report.attempts_on(ChannelKind::Beep), 1);
    assert_eq!(report.delivered_via(), Some(ChannelKind::Beep));
    assert_eq!(channels.attempted(), vec![ChannelKind::Toast, ChannelKind::Beep]);
}

#[tokio::test]
async fn test_remote_success_skips_local_channels() {
    let channels = ScriptedChannels::default();
    let dispatcher = Dispatcher::new(channels.clone());

    let report = dispatcher.dispatch(&pushover_policy(true).request("hit")).await;

    assert!(report.delivered);
    assert_eq!(report.delivered_via(), Some(ChannelKind::Pushover));
    assert_eq!(report.local_attempts(), 0);
    assert_eq!(channels.attempted(), vec![ChannelKind::Pushover]);
}

#[tokio::test]
async fn test_remote_failure_without_fallback_is_not_delivered() {
    let channels = ScriptedChannels::failing(&[ChannelKind::Pushover]);
    let dispatcher = Dispatcher::new(channels.clone());

    let report = dispatcher.dispatch(&pushover_policy(false).request("hit")).await;

    assert!(!report.delivered);
    assert_eq!(report.local_attempts(), 0);
    assert_eq!(report.attempts.len(), 1);
    assert!(report.attempts[0].error.is_some());
}

#[tokio::test]
async fn test_remote_failure_with_fallback_uses_toast() {
    let channels = ScriptedChannels::failing(&[ChannelKind::Pushover]);
    let dispatcher = Dispatcher::new(channels.clone());

    let report = dispatcher.dispatch(&pushover_policy(true).request("hit")).await;

    assert!(report.delivered);
    assert_eq!(report.delivered_via(), Some(ChannelKind::Toast));
    assert_eq!(report.attempts_on(ChannelKind::Beep), 0);
}

#[tokio::test]
async fn test_every_channel_failing() {
    let channels = ScriptedChannels::failing(&[ChannelKind::Toast, ChannelKind::Beep]);
    let dispatcher = Dispatcher::new(channels);

    let report = dispatcher
        .dispatch(&NotificationPolicy::default().request("hit"))
        .await;

    assert!(!report.delivered);
    assert_eq!(report.attempts.len(), 2);
    assert_eq!(report.delivered_via(), None);
}

#[tokio::test]
async fn test_no_enabled_channels_reports_undelivered() {
    let policy = NotificationPolicy {
        use_toast: false,
        beep_fallback: false,
        ..NotificationPolicy::default()
    };
    let report = Dispatcher::new(ScriptedChannels::default())
        .dispatch(&policy.request("hit"))
        .await;

    assert!(!report.delivered);
    assert!(report.attempts.is_empty());
}

#[tokio::test]
async fn test_system_channels_require_credentials() {
    let channels = crate::notify::SystemChannels::new(std::time::Duration::from_secs(1)).unwrap();
    let mut request = pushover_policy(false).request("hit");
    request.pushover = None;

    let result = channels.deliver(ChannelKind::Pushover, &request).await;
    assert!(matches!(
        result,
        Err(NotifyError::MissingCredentials {
            channel: ChannelKind::Pushover
        })
    ));
}
