// Notification request and report types
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Preferred delivery provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Local,
    Pushover,
    Telegram,
}

impl Provider {
    pub fn name(self) -> &'static str {
        match self {
            Provider::Local => "local",
            Provider::Pushover => "pushover",
            Provider::Telegram => "telegram",
        }
    }

    /// Remote channel tried first for this provider, if any
    pub fn remote_channel(self) -> Option<ChannelKind> {
        match self {
            Provider::Local => None,
            Provider::Pushover => Some(ChannelKind::Pushover),
            Provider::Telegram => Some(ChannelKind::Telegram),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Provider::Local),
            "pushover" => Ok(Provider::Pushover),
            "telegram" => Ok(Provider::Telegram),
            other => Err(format!(
                "unknown provider '{other}' (expected local, pushover or telegram)"
            )),
        }
    }
}

/// A single delivery channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Pushover,
    Telegram,
    Toast,
    Beep,
}

impl ChannelKind {
    pub fn is_local(self) -> bool {
        matches!(self, ChannelKind::Toast | ChannelKind::Beep)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Pushover => "pushover",
            ChannelKind::Telegram => "telegram",
            ChannelKind::Toast => "toast",
            ChannelKind::Beep => "beep",
        };
        f.write_str(name)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PushoverCredentials {
    pub app_token: String,
    pub user_key: String,
}

// Secrets never end up in logs
impl fmt::Debug for PushoverCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushoverCredentials")
            .field("app_token", &"<redacted>")
            .field("user_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Notification settings of one watch session
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPolicy {
    pub title: String,
    pub provider: Provider,
    pub fallback_to_local: bool,
    pub use_toast: bool,
    pub beep_fallback: bool,
    pub pushover: Option<PushoverCredentials>,
    pub telegram: Option<TelegramCredentials>,
    /// Upper bound for each remote call and each local helper process
    pub timeout: Duration,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            title: "Watcher Alert".to_string(),
            provider: Provider::Local,
            fallback_to_local: true,
            use_toast: true,
            beep_fallback: true,
            pushover: None,
            telegram: None,
            timeout: Duration::from_secs(5),
        }
    }
}

impl NotificationPolicy {
    /// Build the request for one alert event
    pub fn request(&self, message: impl Into<String>) -> NotificationRequest {
        NotificationRequest {
            title: self.title.clone(),
            message: message.into(),
            provider: self.provider,
            fallback_to_local: self.fallback_to_local,
            use_toast: self.use_toast,
            beep_fallback: self.beep_fallback,
            pushover: self.pushover.clone(),
            telegram: self.telegram.clone(),
        }
    }
}

/// One alert to deliver
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    pub provider: Provider,
    pub fallback_to_local: bool,
    pub use_toast: bool,
    pub beep_fallback: bool,
    pub pushover: Option<PushoverCredentials>,
    pub telegram: Option<TelegramCredentials>,
}

impl NotificationRequest {
    /// Ordered channels to try; delivery stops at the first success.
    ///
    /// Remote provider first, then (only if fallback is allowed or the
    /// provider is local) toast and beep as enabled.
    pub fn plan(&self) -> Vec<ChannelKind> {
        let mut plan = Vec::with_capacity(3);
        if let Some(remote) = self.provider.remote_channel() {
            plan.push(remote);
            if !self.fallback_to_local {
                return plan;
            }
        }
        if self.use_toast {
            plan.push(ChannelKind::Toast);
        }
        if self.beep_fallback {
            plan.push(ChannelKind::Beep);
        }
        plan
    }
}

/// Outcome of one channel attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub channel: ChannelKind,
    /// `None` on success
    pub error: Option<String>,
}

impl Attempt {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub delivered: bool,
    pub attempts: Vec<Attempt>,
}

impl DispatchReport {
    pub fn attempts_on(&self, channel: ChannelKind) -> usize {
        self.attempts.iter().filter(|a| a.channel == channel).count()
    }

    pub fn local_attempts(&self) -> usize {
        self.attempts.iter().filter(|a| a.channel.is_local()).count()
    }

    pub fn delivered_via(&self) -> Option<ChannelKind> {
        self.attempts.iter().find(|a| a.succeeded()).map(|a| a.channel)
    }
}
