//! Best-of-N evaluation of all configured templates against one frame

use super::error::{MatchError, MatchResult};
use super::matcher::TemplateScorer;
use super::template::Template;
use super::types::{Score, TemplateMatch};
use image::RgbImage;

/// Owns the templates of one watch session, in configured order.
#[derive(Debug, Clone)]
pub struct MultiTemplateEvaluator {
    scorers: Vec<TemplateScorer>,
}

impl MultiTemplateEvaluator {
    /// An empty template list is a configuration error.
    pub fn new(templates: Vec<Template>) -> MatchResult<Self> {
        if templates.is_empty() {
            return Err(MatchError::NoTemplates);
        }
        Ok(Self {
            scorers: templates.into_iter().map(TemplateScorer::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    /// Score every template against the same frame and keep the best.
    ///
    /// A template that fails to score is logged and skipped; the frame is
    /// only rejected when no template produced a score.
    pub fn evaluate(&self, frame: &RgbImage) -> MatchResult<TemplateMatch> {
        let results = self.score_all(frame);

        let candidates = results
            .into_iter()
            .enumerate()
            .filter_map(|(index, result)| match result {
                Ok(score) => Some((index, score)),
                Err(e) => {
                    log::warn!("⚠️ Template #{index} skipped: {e}");
                    None
                }
            });

        let (index, score) = select_best(candidates).ok_or(MatchError::AllTemplatesFailed {
            count: self.scorers.len(),
        })?;

        let template = self.scorers[index].template();
        Ok(TemplateMatch {
            score: score.value,
            x: score.x,
            y: score.y,
            template_index: index,
            template_name: template.name().to_string(),
            template_width: template.width(),
            template_height: template.height(),
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn score_all(&self, frame: &RgbImage) -> Vec<MatchResult<Score>> {
        self.scorers.iter().map(|s| s.score(frame)).collect()
    }

    // `collect` on an indexed parallel iterator keeps configured order
    #[cfg(feature = "parallel")]
    fn score_all(&self, frame: &RgbImage) -> Vec<MatchResult<Score>> {
        use rayon::prelude::*;
        self.scorers.par_iter().map(|s| s.score(frame)).collect()
    }
}

/// Pure reduction over `(template index, score)` pairs in configured order.
///
/// A candidate replaces the running best only when strictly greater, so on
/// an exact tie the earlier template wins.
pub fn select_best<I>(candidates: I) -> Option<(usize, Score)>
where
    I: IntoIterator<Item = (usize, Score)>,
{
    candidates
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.1.value > best.1.value {
                candidate
            } else {
                best
            }
        })
}
