//! Template matching data types
use std::fmt;
use std::str::FromStr;

/// How template and frame pixels are transformed before matching.
///
/// The same transform is applied to the template at load time and to every
/// frame at match time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preprocess {
    /// Compare the raw R, G and B planes
    Color,
    /// Compare single-channel luminance
    #[default]
    Grayscale,
    /// Luminance, blurred, reduced to an edge map (text and icons)
    Edge,
}

impl Preprocess {
    pub fn name(self) -> &'static str {
        match self {
            Preprocess::Color => "color",
            Preprocess::Grayscale => "grayscale",
            Preprocess::Edge => "edge",
        }
    }
}

impl fmt::Display for Preprocess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preprocess {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "color" | "colour" => Ok(Preprocess::Color),
            "grayscale" | "greyscale" | "gray" => Ok(Preprocess::Grayscale),
            "edge" | "edges" | "edge_only" | "text_only" => Ok(Preprocess::Edge),
            other => Err(format!(
                "unknown preprocessing mode '{other}' (expected color, grayscale or edge)"
            )),
        }
    }
}

/// Supported correlation methods.
///
/// Every method is reported on a higher-is-better scale; squared-difference
/// methods are inverted by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMethod {
    /// Zero-mean normalized cross-correlation, range [-1, 1]
    #[default]
    CcoeffNormed,
    /// Normalized cross-correlation, range [0, 1]
    CcorrNormed,
    /// 1 - normalized sum of squared differences
    SqdiffNormed,
    /// 1 - sum of squared differences scaled by the worst possible difference, range [0, 1]
    Sqdiff,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 4] = [
        MatchMethod::CcoeffNormed,
        MatchMethod::CcorrNormed,
        MatchMethod::SqdiffNormed,
        MatchMethod::Sqdiff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MatchMethod::CcoeffNormed => "ccoeff_normed",
            MatchMethod::CcorrNormed => "ccorr_normed",
            MatchMethod::SqdiffNormed => "sqdiff_normed",
            MatchMethod::Sqdiff => "sqdiff",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchMethod {
    type Err = String;

    /// Accepts `ccoeff_normed` as well as the classic `TM_CCOEFF_NORMED` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let key = normalized.strip_prefix("tm_").unwrap_or(&normalized);
        MatchMethod::ALL
            .into_iter()
            .find(|method| method.name() == key)
            .ok_or_else(|| {
                format!(
                    "unknown matching method '{}' (expected one of: {})",
                    s.trim(),
                    MatchMethod::ALL.map(|m| m.name()).join(", ")
                )
            })
    }
}

/// Best alignment of one template inside one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Score {
    /// Higher is better
    pub value: f32,
    /// Top-left of the best window, frame-relative
    pub x: u32,
    pub y: u32,
}

/// Winning template for one frame
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateMatch {
    pub score: f32,
    pub x: u32,
    pub y: u32,
    /// Position of the template in configured order
    pub template_index: usize,
    pub template_name: String,
    pub template_width: u32,
    pub template_height: u32,
}

impl TemplateMatch {
    /// Format match as string with its score
    pub fn describe(&self) -> String {
        format!(
            "{} at ({},{}) - {:.3}",
            self.template_name, self.x, self.y, self.score
        )
    }
}
