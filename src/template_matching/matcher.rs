//! Template scoring on top of `imageproc`'s correlation primitives
//!
//! Every method is mapped onto a higher-is-better scale so the rest of the
//! watcher can compare scores without knowing which method produced them.
use super::error::{MatchError, MatchResult};
use super::template::{Template, planes};
use super::types::{MatchMethod, Score};
use image::{GrayImage, RgbImage};
use imageproc::template_matching::{MatchTemplateMethod, match_template};

/// Windows whose variance falls below this are treated as flat
const FLAT_VARIANCE: f64 = 1e-3;

/// Scores one template against frames
#[derive(Debug, Clone)]
pub struct TemplateScorer {
    template: Template,
}

impl TemplateScorer {
    pub fn new(template: Template) -> Self {
        Self { template }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Find the best alignment of the template inside `frame`.
    ///
    /// The frame goes through the template's preprocessing first. With more
    /// than one plane (color mode) the correlation terms of all planes are
    /// summed before normalizing, so the score covers every channel at once.
    pub fn score(&self, frame: &RgbImage) -> MatchResult<Score> {
        let template = &self.template;
        if frame.width() < template.width() || frame.height() < template.height() {
            return Err(MatchError::FrameTooSmall {
                name: template.name().to_string(),
                frame_width: frame.width(),
                frame_height: frame.height(),
                template_width: template.width(),
                template_height: template.height(),
            });
        }

        let frame_planes = planes(frame, template.preprocess());
        let map_width = frame.width() - template.width() + 1;
        let map_height = frame.height() - template.height() + 1;

        let mut totals = vec![Totals::default(); (map_width * map_height) as usize];
        for (image, patch) in frame_planes.iter().zip(template.planes()) {
            accumulate(&mut totals, image, patch, template.method());
        }

        let pixel_count = f64::from(template.width())
            * f64::from(template.height())
            * frame_planes.len().max(1) as f64;
        let values: Vec<f32> = totals
            .iter()
            .map(|t| t.finish(template.method(), pixel_count))
            .collect();

        best_location(&values, map_width).ok_or_else(|| MatchError::DegenerateScores {
            name: template.name().to_string(),
        })
    }
}

/// Correlation terms of one window position, summed over planes
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    /// `sum(I * T)`
    cross: f64,
    /// `sum((I - mean_I) * (T - mean_T))`, means taken per plane
    centered: f64,
    t_var: f64,
    i_var: f64,
    t_sq: f64,
    i_sq: f64,
    /// `sum((I - T)^2)`
    sse: f64,
}

impl Totals {
    /// Higher-is-better score for `method`; `pixel_count` spans all planes.
    fn finish(&self, method: MatchMethod, pixel_count: f64) -> f32 {
        let value = match method {
            MatchMethod::CcoeffNormed => {
                if self.t_var <= FLAT_VARIANCE || self.i_var <= FLAT_VARIANCE {
                    return 0.0;
                }
                (self.centered / (self.t_var * self.i_var).sqrt()).clamp(-1.0, 1.0)
            }
            MatchMethod::CcorrNormed => {
                let norm = (self.t_sq * self.i_sq).sqrt();
                if norm <= FLAT_VARIANCE {
                    return 0.0;
                }
                (self.cross / norm).clamp(0.0, 1.0)
            }
            MatchMethod::SqdiffNormed => {
                let norm = (self.t_sq * self.i_sq).sqrt();
                if norm <= FLAT_VARIANCE {
                    // Both black is a perfect match; one black side is undefined
                    return if self.sse <= FLAT_VARIANCE { 1.0 } else { 0.0 };
                }
                1.0 - self.sse / norm
            }
            // Max possible difference: every sample off by 255
            MatchMethod::Sqdiff => 1.0 - self.sse / (pixel_count * 255.0 * 255.0),
        };
        value as f32
    }
}

/// Add one plane's correlation terms into `totals` (row-major, one entry per
/// window position).
fn accumulate(totals: &mut [Totals], image: &GrayImage, template: &GrayImage, method: MatchMethod) {
    let (tw, th) = template.dimensions();
    let n = f64::from(tw) * f64::from(th);

    let (t_sum, t_sq) = template.pixels().fold((0.0f64, 0.0f64), |(s, q), p| {
        let v = f64::from(p[0]);
        (s + v, q + v * v)
    });
    let t_mean = t_sum / n;
    let t_var = t_sq - t_sum * t_mean;

    let sums = WindowSums::new(image);
    let primitive = match method {
        MatchMethod::CcoeffNormed | MatchMethod::CcorrNormed => MatchTemplateMethod::CrossCorrelation,
        MatchMethod::SqdiffNormed | MatchMethod::Sqdiff => MatchTemplateMethod::SumOfSquaredErrors,
    };
    let map = match_template(image, template, primitive);

    for ((x, y, value), total) in map.enumerate_pixels().zip(totals.iter_mut()) {
        let value = f64::from(value[0]);
        let (s1, s2) = sums.window(x, y, tw, th);
        match primitive {
            MatchTemplateMethod::CrossCorrelation => {
                total.cross += value;
                total.centered += value - t_mean * s1;
            }
            _ => total.sse += value,
        }
        total.t_var += t_var;
        total.i_var += s2 - s1 * s1 / n;
        total.t_sq += t_sq;
        total.i_sq += s2;
    }
}

/// Summed-area tables of pixel values and squared pixel values
struct WindowSums {
    stride: usize,
    sum: Vec<f64>,
    sq: Vec<f64>,
}

impl WindowSums {
    fn new(image: &GrayImage) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut sum = vec![0.0; stride * (h + 1)];
        let mut sq = vec![0.0; stride * (h + 1)];

        for (y, row) in image.rows().enumerate() {
            let (mut row_sum, mut row_sq) = (0.0, 0.0);
            for (x, pixel) in row.enumerate() {
                let v = f64::from(pixel[0]);
                row_sum += v;
                row_sq += v * v;
                let i = (y + 1) * stride + x + 1;
                sum[i] = sum[i - stride] + row_sum;
                sq[i] = sq[i - stride] + row_sq;
            }
        }

        Self { stride, sum, sq }
    }

    fn window(&self, x: u32, y: u32, w: u32, h: u32) -> (f64, f64) {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        let rect = |table: &[f64]| {
            table[y1 * self.stride + x1] - table[y0 * self.stride + x1]
                - table[y1 * self.stride + x0]
                + table[y0 * self.stride + x0]
        };
        (rect(&self.sum), rect(&self.sq))
    }
}

/// Highest finite value; the first one in row-major order wins ties.
fn best_location(values: &[f32], map_width: u32) -> Option<Score> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }

    let map_width = map_width.max(1) as usize;
    best.map(|(i, value)| Score {
        value,
        x: (i % map_width) as u32,
        y: (i / map_width) as u32,
    })
}
