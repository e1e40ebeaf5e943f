/// Template matching module for scoring screen regions
///
/// This module provides:
/// - Template loading with color / grayscale / edge preprocessing
/// - Per-template scoring on a uniform higher-is-better scale
/// - Best-of-N evaluation with a first-configured-wins tie-break
pub mod error;
pub mod evaluator;
pub mod matcher;
pub mod template;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{MatchError, MatchResult};
pub use evaluator::{MultiTemplateEvaluator, select_best};
pub use matcher::TemplateScorer;
pub use template::Template;
pub use types::{MatchMethod, Preprocess, Score, TemplateMatch};
