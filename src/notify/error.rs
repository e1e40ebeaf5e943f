use super::types::ChannelKind;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for notification channels.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Failure of a single delivery channel. Never fatal to the watch loop.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("{channel} credentials are missing")]
    MissingCredentials { channel: ChannelKind },

    #[error("{channel} request failed: {source}")]
    Http {
        channel: ChannelKind,
        source: reqwest::Error,
    },

    #[error("Failed to build HTTP client: {source}")]
    HttpClient { source: reqwest::Error },

    #[error("{channel} timed out after {duration:?}")]
    Timeout {
        channel: ChannelKind,
        duration: Duration,
    },

    #[error("Failed to launch {channel} helper '{program}': {source}")]
    Spawn {
        channel: ChannelKind,
        program: &'static str,
        source: std::io::Error,
    },

    #[error("{channel} helper exited with {status}: {stderr}")]
    CommandFailed {
        channel: ChannelKind,
        status: String,
        stderr: String,
    },

    #[error("{channel} is not supported on this platform")]
    Unsupported { channel: ChannelKind },

    #[error("Audio playback failed: {description}")]
    Audio { description: String },
}
