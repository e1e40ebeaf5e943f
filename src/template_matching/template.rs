//! Template loading and preprocessing

use super::error::{MatchError, MatchResult};
use super::types::{MatchMethod, Preprocess};
use image::{GrayImage, Luma, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use std::path::{Path, PathBuf};

/// Equivalent of a 3x3 Gaussian kernel
const EDGE_BLUR_SIGMA: f32 = 0.8;
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Reference image, preprocessed once and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    path: Option<PathBuf>,
    preprocess: Preprocess,
    method: MatchMethod,
    width: u32,
    height: u32,
    planes: Vec<GrayImage>,
}

impl Template {
    /// Load a template from disk. An unreadable file is a startup error.
    pub fn load(path: &Path, preprocess: Preprocess, method: MatchMethod) -> MatchResult<Self> {
        let image = image::open(path)
            .map_err(|source| MatchError::TemplateLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mut template = Self::from_image(name, &image, preprocess, method)?;
        template.path = Some(path.to_path_buf());
        Ok(template)
    }

    pub fn from_image(
        name: impl Into<String>,
        image: &RgbImage,
        preprocess: Preprocess,
        method: MatchMethod,
    ) -> MatchResult<Self> {
        let name = name.into();
        if image.width() == 0 || image.height() == 0 {
            return Err(MatchError::EmptyTemplate { name });
        }

        Ok(Self {
            name,
            path: None,
            preprocess,
            method,
            width: image.width(),
            height: image.height(),
            planes: planes(image, preprocess),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn preprocess(&self) -> Preprocess {
        self.preprocess
    }

    pub fn method(&self) -> MatchMethod {
        self.method
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn planes(&self) -> &[GrayImage] {
        &self.planes
    }
}

/// Split an image into the single-channel planes matched for `preprocess`.
pub(crate) fn planes(image: &RgbImage, preprocess: Preprocess) -> Vec<GrayImage> {
    match preprocess {
        Preprocess::Color => (0..3)
            .map(|channel| {
                GrayImage::from_fn(image.width(), image.height(), |x, y| {
                    Luma([image.get_pixel(x, y)[channel]])
                })
            })
            .collect(),
        Preprocess::Grayscale => vec![image::imageops::grayscale(image)],
        Preprocess::Edge => {
            let gray = image::imageops::grayscale(image);
            let blurred = gaussian_blur_f32(&gray, EDGE_BLUR_SIGMA);
            vec![canny(&blurred, CANNY_LOW, CANNY_HIGH)]
        }
    }
}
