//! Live screen capture through `xcap`.

use super::error::{CaptureError, CaptureResult};
use super::types::{Frame, FrameSource, Region, crop_region};
use xcap::Monitor;

/// Samples the monitor that contains the region's top-left corner.
#[derive(Debug, Default)]
pub struct ScreenCapture;

impl ScreenCapture {
    pub fn new() -> Self {
        Self
    }

    fn monitors() -> CaptureResult<Vec<Monitor>> {
        Monitor::all().map_err(|e| CaptureError::ScreenCaptureFailed {
            description: format!("Failed to enumerate monitors: {e}"),
        })
    }
}

fn covers(monitor: &Monitor, region: &Region) -> bool {
    let (x, y) = (i64::from(monitor.x()), i64::from(monitor.y()));
    let (left, top) = (i64::from(region.left), i64::from(region.top));
    left >= x
        && top >= y
        && left < x + i64::from(monitor.width())
        && top < y + i64::from(monitor.height())
}

impl FrameSource for ScreenCapture {
    fn grab(&mut self, region: &Region) -> CaptureResult<Frame> {
        let monitor = Self::monitors()?
            .into_iter()
            .find(|m| covers(m, region))
            .ok_or(CaptureError::NoMonitor { region: *region })?;

        let shot = monitor
            .capture_image()
            .map_err(|e| CaptureError::ScreenCaptureFailed {
                description: e.to_string(),
            })?;
        let (width, height) = (shot.width(), shot.height());
        let rgba = image::RgbaImage::from_raw(width, height, shot.into_raw()).ok_or_else(|| {
            CaptureError::ScreenCaptureFailed {
                description: format!("Monitor returned a malformed {width}x{height} buffer"),
            }
        })?;
        let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

        crop_region(&rgb, (i64::from(monitor.x()), i64::from(monitor.y())), region)
    }

    fn screen_bounds(&self) -> CaptureResult<Region> {
        let monitors = Self::monitors()?;
        if monitors.is_empty() {
            return Err(CaptureError::ScreenCaptureFailed {
                description: "No monitors found".to_string(),
            });
        }

        let left = monitors.iter().map(|m| i64::from(m.x())).min().unwrap_or(0);
        let top = monitors.iter().map(|m| i64::from(m.y())).min().unwrap_or(0);
        let right = monitors
            .iter()
            .map(|m| i64::from(m.x()) + i64::from(m.width()))
            .max()
            .unwrap_or(0);
        let bottom = monitors
            .iter()
            .map(|m| i64::from(m.y()) + i64::from(m.height()))
            .max()
            .unwrap_or(0);

        // Regions are non-negative, so monitors left of / above the origin are clipped
        let clamp = |v: i64| v.clamp(0, i64::from(u32::MAX)) as u32;
        let (left_c, top_c) = (clamp(left), clamp(top));
        Ok(Region::new(
            left_c,
            top_c,
            clamp(right).saturating_sub(left_c),
            clamp(bottom).saturating_sub(top_c),
        ))
    }

    fn describe(&self) -> String {
        "live screen".to_string()
    }
}
