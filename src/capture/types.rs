// Core capture types and the frame source seam
use super::error::{CaptureError, CaptureResult};
use image::RgbImage;
use std::fmt;

/// Pixel buffer for one tick of the watch loop.
pub type Frame = RgbImage;

/// Screen rectangle sampled every tick, in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Check if this region is valid (non-zero dimensions)
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn right(&self) -> u64 {
        u64::from(self.left) + u64::from(self.width)
    }

    pub fn bottom(&self) -> u64 {
        u64::from(self.top) + u64::from(self.height)
    }

    /// Check if `other` lies completely inside this region
    pub fn contains(&self, other: &Region) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Check if a `width`x`height` window fits inside this region
    pub fn fits(&self, width: u32, height: u32) -> bool {
        width <= self.width && height <= self.height
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{}]",
            self.left, self.top, self.width, self.height
        )
    }
}

/// Supplier of frames for the watch loop.
///
/// Implementations hand back the pixels of `region` only; the returned
/// frame is region-relative (its top-left pixel is `region.left, region.top`).
pub trait FrameSource: Send {
    fn grab(&mut self, region: &Region) -> CaptureResult<Frame>;

    /// Bounds of the whole virtual screen this source can sample.
    fn screen_bounds(&self) -> CaptureResult<Region>;

    fn describe(&self) -> String;
}

impl<T: FrameSource + ?Sized> FrameSource for Box<T> {
    fn grab(&mut self, region: &Region) -> CaptureResult<Frame> {
        (**self).grab(region)
    }

    fn screen_bounds(&self) -> CaptureResult<Region> {
        (**self).screen_bounds()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Cut `region` out of an image whose top-left pixel sits at `origin`
/// in screen coordinates.
pub fn crop_region(image: &RgbImage, origin: (i64, i64), region: &Region) -> CaptureResult<Frame> {
    let rel_x = i64::from(region.left) - origin.0;
    let rel_y = i64::from(region.top) - origin.1;
    let out_of_bounds = || CaptureError::RegionOutOfBounds {
        region: *region,
        width: image.width(),
        height: image.height(),
    };

    if !region.is_valid()
        || rel_x < 0
        || rel_y < 0
        || rel_x + i64::from(region.width) > i64::from(image.width())
        || rel_y + i64::from(region.height) > i64::from(image.height())
    {
        return Err(out_of_bounds());
    }

    let (x, y) = (rel_x as u32, rel_y as u32);
    if x == 0 && y == 0 && region.width == image.width() && region.height == image.height() {
        return Ok(image.clone());
    }

    Ok(image::imageops::crop_imm(image, x, y, region.width, region.height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_region_contains() {
        let screen = Region::new(0, 0, 1920, 1080);
        assert!(screen.contains(&Region::new(100, 100, 400, 300)));
        assert!(screen.contains(&Region::new(1520, 780, 400, 300)));
        assert!(!screen.contains(&Region::new(1521, 780, 400, 300)));
    }

    #[test]
    fn test_crop_region_relative_to_origin() {
        let image = RgbImage::from_fn(20, 10, |x, y| Rgb([x as u8, y as u8, 0]));
        let frame = crop_region(&image, (100, 50), &Region::new(105, 52, 4, 3)).unwrap();

        assert_eq!(frame.dimensions(), (4, 3));
        assert_eq!(frame.get_pixel(0, 0), &Rgb([5, 2, 0]));
        assert_eq!(frame.get_pixel(3, 2), &Rgb([8, 4, 0]));
    }

    #[test]
    fn test_crop_region_out_of_bounds() {
        let image = RgbImage::new(20, 10);
        let result = crop_region(&image, (0, 0), &Region::new(18, 0, 4, 4));
        assert!(matches!(
            result,
            Err(CaptureError::RegionOutOfBounds { width: 20, height: 10, .. })
        ));

        // Region starting before the image origin
        let result = crop_region(&image, (10, 10), &Region::new(5, 12, 2, 2));
        assert!(result.is_err());
    }
}
