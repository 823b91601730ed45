//! Integration tests for the complete classification pipeline
//!
//! All scenarios run on synthetic images built in memory, so no test assets
//! are required: a navy disc stands in for the blue background of a
//! mandatory-direction sign, and arrow-like asymmetry is produced by
//! filling only parts of the disc with the target color.

use opencv::{
    core::{Mat, Point, Scalar, Size, CV_8UC3},
    imgproc::{ellipse, rectangle, FILLED, LINE_8},
    prelude::*,
};
use signscan::{
    classify, Direction, Outcome, PipelineConfig, Quadrant, RecordedOutcome, ScoringConfig,
    SignClassifier, SignType, StatsManager,
};

/// BGR value inside the default navy-blue HSV band
fn navy() -> Scalar {
    Scalar::new(120.0, 30.0, 20.0, 0.0)
}

fn blank(rows: i32, cols: i32) -> Mat {
    Mat::new_rows_cols_with_default(rows, cols, CV_8UC3, Scalar::all(0.0)).unwrap()
}

/// Disc spanning nearly the whole frame, filled with the target color
fn full_navy_disc(rows: i32, cols: i32) -> Mat {
    let mut image = blank(rows, cols);
    ellipse(
        &mut image,
        Point::new(cols / 2, rows / 2),
        Size::new(cols / 2 - 2, rows / 2 - 2),
        0.0,
        0.0,
        360.0,
        navy(),
        FILLED,
        LINE_8,
        0,
    )
    .unwrap();
    image
}

/// Frame-spanning navy ring whose interior is navy only on the left half.
/// The ring keeps the outer contour circular so the boundary fit succeeds.
fn left_heavy_disc(rows: i32, cols: i32) -> Mat {
    let mut image = blank(rows, cols);
    ellipse(
        &mut image,
        Point::new(cols / 2, rows / 2),
        Size::new(cols / 2 - 4, rows / 2 - 4),
        0.0,
        0.0,
        360.0,
        navy(),
        6,
        LINE_8,
        0,
    )
    .unwrap();
    // Navy fill on the left half only (clipped to the ring interior by the
    // fitted boundary during partitioning).
    let mut left_fill = blank(rows, cols);
    ellipse(
        &mut left_fill,
        Point::new(cols / 2, rows / 2),
        Size::new(cols / 2 - 4, rows / 2 - 4),
        0.0,
        0.0,
        360.0,
        navy(),
        FILLED,
        LINE_8,
        0,
    )
    .unwrap();
    rectangle(
        &mut left_fill,
        opencv::core::Rect::new(cols / 2, 0, cols - cols / 2, rows),
        Scalar::all(0.0),
        FILLED,
        LINE_8,
        0,
    )
    .unwrap();
    let mut combined = Mat::default();
    opencv::core::bitwise_or(&image, &left_fill, &mut combined, &Mat::default()).unwrap();
    combined
}

fn classifier() -> SignClassifier {
    SignClassifier::new(&PipelineConfig::default())
}

// ============================================================================
// Scenario A: uniformly target-colored disc
// ============================================================================

#[test]
fn test_full_disc_all_quadrants_near_100() {
    let image = full_navy_disc(200, 200);
    let config = PipelineConfig::default();
    let classifier = SignClassifier::new(&config);

    let mask = signscan::compute_mask(&image, &config.colors.target).unwrap();
    let detection = signscan::BoundaryDetector::new(&config.detection)
        .detect(&mask, &image)
        .unwrap();
    assert!(detection.ellipse.width / 200.0 > 0.9);
    assert!(detection.ellipse.height / 200.0 > 0.9);

    let partition = signscan::QuadrantPartitioner::new(config.colors.target.clone())
        .partition(&image, &detection.ellipse)
        .unwrap();
    for (_, measurement) in partition.measurements.iter() {
        assert!(measurement.percentage > 95.0 && measurement.percentage <= 100.0);
    }

    // Near-tied quadrants still yield a definite direction for every rule.
    for sign_type in [
        SignType::AheadLeftOnly,
        SignType::LeftOnly,
        SignType::KeepRight,
        SignType::NoRightTurn,
    ] {
        let direction = classifier.classify(&image, sign_type).unwrap();
        assert!(matches!(direction, Direction::Left | Direction::Right));
    }
}

// ============================================================================
// Scenario B: target color concentrated in the left half
// ============================================================================

#[test]
fn test_left_heavy_disc_classifies_left() {
    let image = left_heavy_disc(200, 200);
    let config = PipelineConfig::default();

    let mask = signscan::compute_mask(&image, &config.colors.target).unwrap();
    let detection = signscan::BoundaryDetector::new(&config.detection)
        .detect(&mask, &image)
        .unwrap();
    let partition = signscan::QuadrantPartitioner::new(config.colors.target.clone())
        .partition(&image, &detection.ellipse)
        .unwrap();

    let measurements = partition.measurements;
    let left_top = measurements.percentage(Quadrant::LeftTop);
    let right_top = measurements.percentage(Quadrant::RightTop);
    let left_bottom = measurements.percentage(Quadrant::LeftBottom);
    let right_bottom = measurements.percentage(Quadrant::RightBottom);

    assert!(left_top > 80.0, "left top was {left_top}");
    assert!(left_bottom > 80.0, "left bottom was {left_bottom}");
    assert!(right_top < 40.0, "right top was {right_top}");
    assert!(right_bottom < 40.0, "right bottom was {right_bottom}");

    assert_eq!(classify(&measurements, SignType::AheadLeftOnly), Direction::Left);
    assert_eq!(classify(&measurements, SignType::LeftOnly), Direction::Left);

    // The left-column rule ignores the right side; its verdict follows only
    // the LeftBottom vs LeftTop comparison.
    let expected = if left_bottom > left_top {
        Direction::Right
    } else {
        Direction::Left
    };
    assert_eq!(classify(&measurements, SignType::KeepRight), expected);
}

// ============================================================================
// Scenario C: sub-threshold blob scores as an invalid sign
// ============================================================================

#[test]
fn test_tiny_blob_scores_invalid_sign() {
    let mut image = blank(200, 200);
    rectangle(
        &mut image,
        opencv::core::Rect::new(95, 95, 6, 6),
        navy(),
        FILLED,
        LINE_8,
        0,
    )
    .unwrap();

    let mut stats = StatsManager::new(ScoringConfig::default());
    stats.record_processed();
    let outcome = classifier().classify_outcome(&image, SignType::AheadRightOnly);
    assert_eq!(outcome, RecordedOutcome::Known(Outcome::InvalidSign));
    stats.add_result("tiny.png", outcome);
    stats.calculate_total_score();

    assert_eq!(stats.total_processed(), 1);
    assert_eq!(stats.count(Outcome::InvalidSign), 1);
    assert!((stats.total_score() - (-0.25)).abs() < 1e-9);
}

// ============================================================================
// Scenario D: report determinism
// ============================================================================

#[test]
fn test_report_byte_identical_without_mutation() {
    let classifier = classifier();
    let mut stats = StatsManager::new(ScoringConfig::default());

    let images: [(&str, Mat); 3] = [
        ("full.png", full_navy_disc(200, 200)),
        ("left.png", left_heavy_disc(200, 200)),
        ("blank.png", blank(200, 200)),
    ];
    for (name, image) in &images {
        stats.record_processed();
        stats.add_result(*name, classifier.classify_outcome(image, SignType::LeftOnly));
    }
    stats.calculate_total_score();

    let first = stats.render_report();
    let second = stats.render_report();
    assert_eq!(first, second);
    assert!(first.starts_with("--- Statistics ---\nTotal Processed Images: 3\n"));
    assert!(first.contains("\n--- Results ---\n"));
}

// ============================================================================
// Detection failure taxonomy end to end
// ============================================================================

#[test]
fn test_blank_image_is_no_sign_detected() {
    let image = blank(200, 200);
    let outcome = classifier().classify_outcome(&image, SignType::KeepLeft);
    assert_eq!(outcome, RecordedOutcome::Known(Outcome::NoSignDetected));
}

#[test]
fn test_undersized_disc_is_invalid_ellipse() {
    let mut image = blank(200, 200);
    ellipse(
        &mut image,
        Point::new(100, 100),
        Size::new(30, 30),
        0.0,
        0.0,
        360.0,
        navy(),
        FILLED,
        LINE_8,
        0,
    )
    .unwrap();

    let outcome = classifier().classify_outcome(&image, SignType::NoLeftTurn);
    assert_eq!(outcome, RecordedOutcome::Known(Outcome::InvalidEllipse));
}

#[test]
fn test_debug_output_stages_match_frame() {
    let image = full_navy_disc(200, 200);
    let (direction, debug) = classifier()
        .classify_debug(&image, SignType::AheadRightOnly)
        .unwrap();

    assert!(matches!(direction, Direction::Left | Direction::Right));
    assert_eq!(debug.color_mask.size().unwrap(), image.size().unwrap());
    assert_eq!(debug.annotated.size().unwrap(), image.size().unwrap());
    assert_eq!(debug.masked_image.size().unwrap(), image.size().unwrap());
    assert_eq!(debug.interior_mask.size().unwrap(), image.size().unwrap());
    assert!(debug.summary.rows() > 0);
}
