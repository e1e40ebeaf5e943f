// Capture module - frame sources for the watch loop
// The loop only needs `grab(region)`; live screen capture is optional so the
// crate builds on machines without the platform capture libraries.

pub mod error;
pub mod replay;
#[cfg(feature = "screen-capture")]
pub mod screen;
pub mod types;

pub use error::{CaptureError, CaptureResult};
pub use replay::ReplaySource;
#[cfg(feature = "screen-capture")]
pub use screen::ScreenCapture;
pub use types::{Frame, FrameSource, Region, crop_region};

/// Frame source for the live screen, if this build supports it.
pub fn live_source() -> CaptureResult<Box<dyn FrameSource>> {
    #[cfg(feature = "screen-capture")]
    {
        Ok(Box::new(ScreenCapture::new()))
    }
    #[cfg(not(feature = "screen-capture"))]
    {
        Err(CaptureError::Unsupported)
    }
}
