//! Tests for template scoring and multi-template evaluation

use crate::template_matching::{
    MatchError, MatchMethod, MultiTemplateEvaluator, Preprocess, Score, Template, TemplateScorer,
    select_best,
};
use image::{Rgb, RgbImage};

/// Deterministic per-pixel noise so no two windows look alike
fn noise(x: u32, y: u32, seed: u32) -> u8 {
    let mut h = x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663) ^ seed.wrapping_mul(83_492_791);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    (h & 0xff) as u8
}

fn noisy(width: u32, height: u32, seed: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([noise(x, y, seed), noise(x, y, seed + 1), noise(x, y, seed + 2)])
    })
}

/// Background noise with `patch` pasted at (x, y)
fn frame_with(patch: &RgbImage, x: u32, y: u32) -> RgbImage {
    let mut frame = noisy(32, 24, 900);
    image::imageops::replace(&mut frame, patch, i64::from(x), i64::from(y));
    frame
}

fn template(name: &str, image: &RgbImage, preprocess: Preprocess, method: MatchMethod) -> Template {
    Template::from_image(name, image, preprocess, method).unwrap()
}

#[test]
fn test_every_method_locates_embedded_patch() {
    let patch = noisy(8, 6, 7);
    let frame = frame_with(&patch, 13, 9);

    for method in MatchMethod::ALL {
        for preprocess in [Preprocess::Color, Preprocess::Grayscale] {
            let scorer = TemplateScorer::new(template("patch", &patch, preprocess, method));
            let score = scorer.score(&frame).unwrap();
            assert_eq!(
                (score.x, score.y),
                (13, 9),
                "{method} / {preprocess} should find the patch"
            );
            assert!(score.value > 0.99, "{method} / {preprocess} scored {}", score.value);
        }
    }
}

#[test]
fn test_squared_difference_is_inverted_to_higher_is_better() {
    let patch = noisy(8, 8, 3);
    let hit = frame_with(&patch, 4, 4);
    let miss = noisy(32, 24, 555);

    for method in [MatchMethod::Sqdiff, MatchMethod::SqdiffNormed] {
        let scorer = TemplateScorer::new(template("patch", &patch, Preprocess::Grayscale, method));
        let on_hit = scorer.score(&hit).unwrap().value;
        let on_miss = scorer.score(&miss).unwrap().value;
        assert!(on_hit > on_miss, "{method}: hit {on_hit} should beat miss {on_miss}");
    }
}

#[test]
fn test_flat_frame_scores_zero_with_ccoeff() {
    let patch = noisy(6, 6, 11);
    let scorer = TemplateScorer::new(template(
        "patch",
        &patch,
        Preprocess::Grayscale,
        MatchMethod::CcoeffNormed,
    ));
    let blank = RgbImage::from_pixel(20, 20, Rgb([40, 40, 40]));
    let score = scorer.score(&blank).unwrap();
    assert_eq!(score.value, 0.0);
    assert_eq!((score.x, score.y), (0, 0));
}

#[test]
fn test_edge_mode_matches_outline() {
    // White square with a black margin so the edge maps line up exactly
    let mut icon = RgbImage::from_pixel(14, 14, Rgb([0, 0, 0]));
    for y in 4..10 {
        for x in 4..10 {
            icon.put_pixel(x, y, Rgb([255, 255, 255]));
        }
    }
    let mut frame = RgbImage::from_pixel(40, 30, Rgb([0, 0, 0]));
    image::imageops::replace(&mut frame, &icon, 20, 11);

    let scorer = TemplateScorer::new(template(
        "icon",
        &icon,
        Preprocess::Edge,
        MatchMethod::CcoeffNormed,
    ));
    let score = scorer.score(&frame).unwrap();
    assert_eq!((score.x, score.y), (20, 11));
    assert!(score.value > 0.99);
}

#[test]
fn test_evaluator_rejects_empty_template_list() {
    assert!(matches!(
        MultiTemplateEvaluator::new(Vec::new()),
        Err(MatchError::NoTemplates)
    ));
}

#[test]
fn test_evaluator_picks_matching_template() {
    let wanted = noisy(8, 8, 21);
    let other = noisy(8, 8, 42);
    let frame = frame_with(&wanted, 10, 5);

    let evaluator = MultiTemplateEvaluator::new(vec![
        template("other", &other, Preprocess::Grayscale, MatchMethod::CcoeffNormed),
        template("wanted", &wanted, Preprocess::Grayscale, MatchMethod::CcoeffNormed),
    ])
    .unwrap();

    let best = evaluator.evaluate(&frame).unwrap();
    assert_eq!(best.template_index, 1);
    assert_eq!(best.template_name, "wanted");
    assert_eq!((best.x, best.y), (10, 5));
    assert_eq!((best.template_width, best.template_height), (8, 8));
}

#[test]
fn test_evaluator_exact_tie_reports_first_template() {
    let patch = noisy(8, 8, 5);
    let frame = frame_with(&patch, 2, 2);

    let evaluator = MultiTemplateEvaluator::new(vec![
        template("first", &patch, Preprocess::Grayscale, MatchMethod::CcoeffNormed),
        template("second", &patch, Preprocess::Grayscale, MatchMethod::CcoeffNormed),
    ])
    .unwrap();

    let best = evaluator.evaluate(&frame).unwrap();
    assert_eq!(best.template_index, 0);
    assert_eq!(best.template_name, "first");
}

#[test]
fn test_evaluator_skips_failing_template() {
    let small = noisy(6, 6, 8);
    let frame = frame_with(&small, 3, 3);
    let evaluator = MultiTemplateEvaluator::new(vec![
        template("too_big", &noisy(64, 64, 1), Preprocess::Grayscale, MatchMethod::CcoeffNormed),
        template("small", &small, Preprocess::Grayscale, MatchMethod::CcoeffNormed),
    ])
    .unwrap();

    let best = evaluator.evaluate(&frame).unwrap();
    assert_eq!(best.template_name, "small");
}

#[test]
fn test_evaluator_all_templates_failing() {
    let evaluator = MultiTemplateEvaluator::new(vec![template(
        "too_big",
        &noisy(64, 64, 1),
        Preprocess::Grayscale,
        MatchMethod::CcoeffNormed,
    )])
    .unwrap();

    assert!(matches!(
        evaluator.evaluate(&RgbImage::new(10, 10)),
        Err(MatchError::AllTemplatesFailed { count: 1 })
    ));
}

fn score(value: f32) -> Score {
    Score { value, x: 0, y: 0 }
}

#[test]
fn test_select_best_tie_goes_to_earlier_position() {
    let best = select_best(vec![(0, score(0.5)), (1, score(0.9)), (2, score(0.9))]).unwrap();
    assert_eq!(best.0, 1);
}

#[test]
fn test_select_best_is_order_stable_without_ties() {
    let scores = [("a", 0.31f32), ("b", 0.92), ("c", -0.4), ("d", 0.77)];
    let orders: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];

    for order in orders {
        let candidates = order
            .iter()
            .enumerate()
            .map(|(position, &i)| (position, score(scores[i].1)));
        let (position, _) = select_best(candidates).unwrap();
        assert_eq!(scores[order[position]].0, "b");
    }
}

#[test]
fn test_select_best_empty() {
    assert!(select_best(Vec::new()).is_none());
}

/// Red square on black: only one channel carries any signal
fn red_icon() -> RgbImage {
    let mut icon = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
    for y in 3..7 {
        for x in 3..7 {
            icon.put_pixel(x, y, Rgb([220, 0, 0]));
        }
    }
    icon
}

#[test]
fn test_color_mode_scores_single_hue_icon_as_full_match() {
    let icon = red_icon();
    let mut frame = RgbImage::from_pixel(40, 30, Rgb([0, 0, 0]));
    image::imageops::replace(&mut frame, &icon, 12, 9);

    for method in MatchMethod::ALL {
        let scorer = TemplateScorer::new(template("red", &icon, Preprocess::Color, method));
        let score = scorer.score(&frame).unwrap();
        assert!(score.value > 0.99, "{method} scored {}", score.value);
        assert_eq!((score.x, score.y), (12, 9), "{method}");
    }
}

#[test]
fn test_color_mode_tells_hues_apart() {
    let icon = red_icon();
    let green: RgbImage = RgbImage::from_fn(10, 10, |x, y| {
        let p = icon.get_pixel(x, y);
        Rgb([p[1], p[0], p[2]])
    });
    let mut frame = RgbImage::from_pixel(40, 30, Rgb([0, 0, 0]));
    image::imageops::replace(&mut frame, &green, 12, 9);

    let scorer = TemplateScorer::new(template(
        "red",
        &icon,
        Preprocess::Color,
        MatchMethod::CcoeffNormed,
    ));
    let score = scorer.score(&frame).unwrap();
    assert!(score.value < 0.5, "green icon scored {}", score.value);
}
