use crate::capture::CaptureError;
use crate::config::ConfigError;
use crate::notify::NotifyError;
use crate::template_matching::MatchError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A specialized `Result` type for watch sessions.
pub type WatchResult<T> = Result<T, WatchError>;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Matching(#[from] MatchError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error(
        "Template '{name}' ({template_width}x{template_height}) is larger than the region ({region_width}x{region_height})"
    )]
    TemplateLargerThanRegion {
        name: String,
        template_width: u32,
        template_height: u32,
        region_width: u32,
        region_height: u32,
    },

    #[error("Session '{label}' did not stop within {timeout:?}")]
    StopTimeout { label: String, timeout: Duration },

    #[error("Watch loop task failed: {source}")]
    Join { source: tokio::task::JoinError },

    #[error("Failed to create debug directory {}: {source}", path.display())]
    ArtifactDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write snapshot {}: {source}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        source: image::ImageError,
    },
}
