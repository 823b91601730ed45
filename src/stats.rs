//! Outcome accumulation, scoring, and the batch results report
//!
//! Every processed image maps to exactly one recorded outcome: a direction,
//! one of the defined error categories, or an unexpected error string.
//! Known categories are counted toward the statistics table and weighted
//! into the total score; unexpected strings are kept in the per-image
//! results listing only, so a surprising failure never corrupts the score.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use tracing::error;

use crate::config::ScoringConfig;
use crate::direction::Direction;
use crate::error::{ClassifyError, Result};

/// The closed set of scored outcome categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Left,
    Right,
    NoSignDetected,
    InvalidSign,
    InvalidEllipse,
    ImageReadError,
}

impl Outcome {
    /// Categories in the order they appear in the statistics block
    pub const REPORT_ORDER: [Outcome; 6] = [
        Outcome::InvalidEllipse,
        Outcome::InvalidSign,
        Outcome::NoSignDetected,
        Outcome::Left,
        Outcome::Right,
        Outcome::ImageReadError,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Left => "LEFT",
            Outcome::Right => "RIGHT",
            Outcome::NoSignDetected => "No sign detected",
            Outcome::InvalidSign => "No valid sign found",
            Outcome::InvalidEllipse => "Invalid ellipse detection:",
            Outcome::ImageReadError => "Image could not be read",
        }
    }

    pub fn weight(&self, scoring: &ScoringConfig) -> f64 {
        match self {
            Outcome::Left => scoring.left,
            Outcome::Right => scoring.right,
            Outcome::NoSignDetected => scoring.no_sign_detected,
            Outcome::InvalidSign => scoring.invalid_sign,
            Outcome::InvalidEllipse => scoring.invalid_ellipse,
            Outcome::ImageReadError => scoring.image_read_error,
        }
    }

    fn index(&self) -> usize {
        match self {
            Outcome::InvalidEllipse => 0,
            Outcome::InvalidSign => 1,
            Outcome::NoSignDetected => 2,
            Outcome::Left => 3,
            Outcome::Right => 4,
            Outcome::ImageReadError => 5,
        }
    }

    /// Map a pipeline error to its scored category, when it has one.
    /// Caller defects (bad sign names) and unexpected failures have none.
    pub fn from_error(error: &ClassifyError) -> Option<Outcome> {
        match error {
            ClassifyError::ImageRead { .. } => Some(Outcome::ImageReadError),
            ClassifyError::NoSignDetected => Some(Outcome::NoSignDetected),
            ClassifyError::InvalidSign { .. } => Some(Outcome::InvalidSign),
            ClassifyError::InvalidEllipse { .. } => Some(Outcome::InvalidEllipse),
            _ => None,
        }
    }
}

impl From<Direction> for Outcome {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => Outcome::Left,
            Direction::Right => Outcome::Right,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What actually gets recorded per image: a known category, or an error
/// string outside the closed set (tolerated, reported, never scored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOutcome {
    Known(Outcome),
    Unexpected(String),
}

impl fmt::Display for RecordedOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordedOutcome::Known(outcome) => f.write_str(outcome.label()),
            RecordedOutcome::Unexpected(message) => f.write_str(message),
        }
    }
}

/// Accumulates per-image outcomes over one batch run and renders the report.
///
/// Call order: [`record_processed`](Self::record_processed) /
/// [`add_result`](Self::add_result) per image, then
/// [`calculate_total_score`](Self::calculate_total_score) once processing is
/// done, then [`render_report`](Self::render_report) or
/// [`write_report`](Self::write_report). The total score is derived, not
/// accumulated live: recording more results requires recalculating before
/// the next report.
#[derive(Debug, Clone)]
pub struct StatsManager {
    scoring: ScoringConfig,
    counts: [u64; 6],
    total_processed: u64,
    total_score: f64,
    results: IndexMap<String, RecordedOutcome>,
}

impl StatsManager {
    pub fn new(scoring: ScoringConfig) -> Self {
        Self {
            scoring,
            counts: [0; 6],
            total_processed: 0,
            total_score: 0.0,
            results: IndexMap::new(),
        }
    }

    /// Count one input image, regardless of its outcome
    pub fn record_processed(&mut self) {
        self.total_processed += 1;
    }

    /// Record the outcome for one image. A prior entry under the same id is
    /// overwritten in place; known categories also bump the stats table.
    pub fn add_result(&mut self, image_id: impl Into<String>, outcome: RecordedOutcome) {
        if let RecordedOutcome::Known(known) = &outcome {
            self.counts[known.index()] += 1;
        }
        self.results.insert(image_id.into(), outcome);
    }

    pub fn count(&self, outcome: Outcome) -> u64 {
        self.counts[outcome.index()]
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    /// Recompute the total score from the current counts. Idempotent while
    /// no further results are recorded.
    pub fn calculate_total_score(&mut self) {
        self.total_score = Outcome::REPORT_ORDER
            .iter()
            .map(|outcome| self.counts[outcome.index()] as f64 * outcome.weight(&self.scoring))
            .sum();
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn results(&self) -> &IndexMap<String, RecordedOutcome> {
        &self.results
    }

    /// Render the plain-text report: the statistics block followed by the
    /// per-image results in processing order. Pure read; two calls over the
    /// same state produce byte-identical text.
    pub fn render_report(&self) -> String {
        let mut report = String::new();
        report.push_str("--- Statistics ---\n");
        report.push_str(&format!("Total Processed Images: {}\n", self.total_processed));

        for outcome in Outcome::REPORT_ORDER {
            let count = self.counts[outcome.index()];
            // + 0.0 folds the -0.0 produced by zero counts into plain 0
            let score = count as f64 * outcome.weight(&self.scoring) + 0.0;
            report.push_str(&format!("{}: {} (Score: {})\n", outcome.label(), count, score));
        }
        report.push_str(&format!("Total Score: {}\n", self.total_score + 0.0));

        report.push_str("\n--- Results ---\n");
        for (image_id, outcome) in &self.results {
            report.push_str(&format!("{}: {}\n", image_id, outcome));
        }
        report
    }

    /// Persist the report. This is the only fatal failure of a batch run: a
    /// run that cannot write its results has no useful side effect.
    pub fn write_report(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render_report()).map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to write results report");
            ClassifyError::ReportWrite {
                path: path.display().to_string(),
                source: e,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> StatsManager {
        StatsManager::new(ScoringConfig::default())
    }

    #[test]
    fn test_counts_and_score() {
        let mut stats = manager();
        for (name, outcome) in [
            ("a.png", Outcome::Left),
            ("b.png", Outcome::Left),
            ("c.png", Outcome::Right),
            ("d.png", Outcome::InvalidSign),
            ("e.png", Outcome::ImageReadError),
        ] {
            stats.record_processed();
            stats.add_result(name, RecordedOutcome::Known(outcome));
        }
        stats.calculate_total_score();

        assert_eq!(stats.total_processed(), 5);
        assert_eq!(stats.count(Outcome::Left), 2);
        assert_eq!(stats.count(Outcome::Right), 1);
        let expected = 2.0 * 0.1 + 1.0 * -0.5 + 1.0 * -0.25 + 1.0 * -1.0;
        assert!((stats.total_score() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_score_recomputed_after_more_results() {
        let mut stats = manager();
        stats.record_processed();
        stats.add_result("a.png", RecordedOutcome::Known(Outcome::Left));
        stats.calculate_total_score();
        assert!((stats.total_score() - 0.1).abs() < 1e-9);

        stats.record_processed();
        stats.add_result("b.png", RecordedOutcome::Known(Outcome::Right));
        stats.calculate_total_score();
        assert!((stats.total_score() - (0.1 - 0.5)).abs() < 1e-9);

        // Idempotent with no intervening updates.
        let before = stats.total_score();
        stats.calculate_total_score();
        assert_eq!(stats.total_score(), before);
    }

    #[test]
    fn test_same_id_overwrites_in_place() {
        let mut stats = manager();
        stats.add_result("a.png", RecordedOutcome::Known(Outcome::Left));
        stats.add_result("b.png", RecordedOutcome::Known(Outcome::Right));
        stats.add_result("a.png", RecordedOutcome::Known(Outcome::Right));

        assert_eq!(stats.results().len(), 2);
        let keys: Vec<_> = stats.results().keys().cloned().collect();
        assert_eq!(keys, ["a.png", "b.png"]);
        assert_eq!(
            stats.results()["a.png"],
            RecordedOutcome::Known(Outcome::Right)
        );
    }

    #[test]
    fn test_unexpected_outcome_reported_not_scored() {
        let mut stats = manager();
        stats.record_processed();
        stats.add_result(
            "weird.png",
            RecordedOutcome::Unexpected("OpenCV error during fit_ellipse".into()),
        );
        stats.calculate_total_score();

        assert_eq!(stats.total_score(), 0.0);
        for outcome in Outcome::REPORT_ORDER {
            assert_eq!(stats.count(outcome), 0);
        }
        let report = stats.render_report();
        assert!(report.contains("weird.png: OpenCV error during fit_ellipse"));
    }

    #[test]
    fn test_report_layout() {
        let mut stats = manager();
        stats.record_processed();
        stats.add_result("sign.jpg", RecordedOutcome::Known(Outcome::Left));
        stats.calculate_total_score();

        let report = stats.render_report();
        assert!(report.starts_with("--- Statistics ---\nTotal Processed Images: 1\n"));
        assert!(report.contains("LEFT: 1 (Score: 0.1)"));
        assert!(report.contains("RIGHT: 0 (Score: 0)"));
        assert!(report.contains("Total Score: 0.1\n"));
        assert!(report.contains("\n--- Results ---\nsign.jpg: LEFT\n"));
    }

    #[test]
    fn test_report_is_deterministic() {
        let mut stats = manager();
        for (i, outcome) in [Outcome::Left, Outcome::Right, Outcome::NoSignDetected]
            .into_iter()
            .enumerate()
        {
            stats.record_processed();
            stats.add_result(format!("img{}.png", i), RecordedOutcome::Known(outcome));
        }
        stats.calculate_total_score();

        assert_eq!(stats.render_report(), stats.render_report());
    }
}
