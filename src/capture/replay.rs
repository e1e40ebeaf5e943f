//! Frame source that replays still images instead of sampling the screen.
//!
//! Each image is treated as a full screenshot whose top-left pixel is the
//! screen origin. Frames are served in order and wrap around at the end.

use super::error::{CaptureError, CaptureResult};
use super::types::{Frame, FrameSource, Region, crop_region};
use image::RgbImage;
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Clone)]
enum ReplayFrame {
    File(PathBuf),
    Image(RgbImage),
}

pub struct ReplaySource {
    frames: Vec<ReplayFrame>,
    cursor: usize,
    origin: String,
}

impl ReplaySource {
    /// Replay every PNG/JPEG file in `dir`, sorted by file name.
    pub fn from_dir(dir: impl AsRef<Path>) -> CaptureResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| CaptureError::ListFailed {
            dir: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_frame_file(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(CaptureError::NoFrames {
                origin: dir.display().to_string(),
            });
        }

        log::debug!("📂 Replaying {} frame(s) from {}", paths.len(), dir.display());
        Ok(Self {
            frames: paths.into_iter().map(ReplayFrame::File).collect(),
            cursor: 0,
            origin: dir.display().to_string(),
        })
    }

    /// Replay in-memory images.
    pub fn from_images(images: Vec<RgbImage>) -> Self {
        Self {
            frames: images.into_iter().map(ReplayFrame::Image).collect(),
            cursor: 0,
            origin: "memory".to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn current(&self) -> CaptureResult<&ReplayFrame> {
        if self.frames.is_empty() {
            return Err(CaptureError::NoFrames {
                origin: self.origin.clone(),
            });
        }
        Ok(&self.frames[self.cursor % self.frames.len()])
    }

    fn next_image(&mut self) -> CaptureResult<RgbImage> {
        let image = match self.current()? {
            ReplayFrame::Image(image) => image.clone(),
            ReplayFrame::File(path) => image::open(path)
                .map_err(|source| CaptureError::FrameReadFailed {
                    path: path.clone(),
                    source,
                })?
                .to_rgb8(),
        };
        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(image)
    }
}

impl FrameSource for ReplaySource {
    fn grab(&mut self, region: &Region) -> CaptureResult<Frame> {
        let image = self.next_image()?;
        crop_region(&image, (0, 0), region)
    }

    fn screen_bounds(&self) -> CaptureResult<Region> {
        let (width, height) = match self.current()? {
            ReplayFrame::Image(image) => image.dimensions(),
            ReplayFrame::File(path) => {
                image::image_dimensions(path).map_err(|source| CaptureError::FrameReadFailed {
                    path: path.clone(),
                    source,
                })?
            }
        };
        Ok(Region::new(0, 0, width, height))
    }

    fn describe(&self) -> String {
        format!("replay of {} frame(s) from {}", self.frames.len(), self.origin)
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FRAME_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
