use super::types::Region;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for frame capture.
pub type CaptureResult<T> = Result<T, CaptureError>;

/// The error type for frame sources.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Region {region} lies outside the {width}x{height} source image")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },

    #[error("No monitor covers the top-left corner of region {region}")]
    NoMonitor { region: Region },

    #[error("Screen capture failed: {description}")]
    ScreenCaptureFailed { description: String },

    #[error("Failed to read frame image {path:?}: {source}")]
    FrameReadFailed {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to list frame images in {dir:?}: {source}")]
    ListFailed {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("No frame images available from {origin}")]
    NoFrames { origin: String },

    #[error("Live screen capture is not compiled in. Rebuild with `--features screen-capture` or use --replay.")]
    Unsupported,
}
