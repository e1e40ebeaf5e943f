use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for template matching.
pub type MatchResult<T> = Result<T, MatchError>;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Failed to load template image {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Template '{name}' has empty dimensions")]
    EmptyTemplate { name: String },

    #[error("No templates configured")]
    NoTemplates,

    #[error(
        "Frame {frame_width}x{frame_height} is smaller than template '{name}' ({template_width}x{template_height})"
    )]
    FrameTooSmall {
        name: String,
        frame_width: u32,
        frame_height: u32,
        template_width: u32,
        template_height: u32,
    },

    #[error("Template '{name}' produced no finite score for this frame")]
    DegenerateScores { name: String },

    #[error("All {count} template(s) failed to score this frame")]
    AllTemplatesFailed { count: usize },
}
