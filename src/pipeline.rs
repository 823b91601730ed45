//! Per-image classification driver
//!
//! Glues the stages together: color mask → boundary detection → quadrant
//! partitioning → direction rule. One [`SignClassifier`] is built from an
//! immutable configuration and reused across a batch; it holds no per-image
//! state, so images may also be processed on separate instances in parallel
//! and merged afterwards.

use opencv::core::Mat;
use opencv::prelude::MatTraitConst;
use tracing::debug;

use crate::config::PipelineConfig;
use crate::detection::{BoundaryDetector, QuadrantPartitioner};
use crate::direction::{classify, Direction, SignType};
use crate::error::Result;
use crate::mask::{compute_mask, ColorBand};
use crate::stats::{Outcome, RecordedOutcome};
use crate::visualize::quadrant_summary;

/// Per-stage artifacts for diagnostics; nothing downstream consumes these
#[derive(Debug)]
pub struct DebugOutput {
    /// Binary mask of the target color band
    pub color_mask: Mat,
    /// Input copy with the fitted boundary outline drawn on it
    pub annotated: Mat,
    /// Input copy with exterior pixels painted with the sentinel color
    pub masked_image: Mat,
    /// Binary mask of the boundary interior
    pub interior_mask: Mat,
    /// Quadrant measurement summary rendering
    pub summary: Mat,
}

/// The per-image pipeline, wired from one immutable configuration
#[derive(Debug, Clone)]
pub struct SignClassifier {
    detector: BoundaryDetector,
    partitioner: QuadrantPartitioner,
    target: ColorBand,
}

impl SignClassifier {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            detector: BoundaryDetector::new(&config.detection),
            partitioner: QuadrantPartitioner::new(config.colors.target.clone()),
            target: config.colors.target.clone(),
        }
    }

    /// Classify the arrow direction on one cropped sign image.
    ///
    /// # Errors
    ///
    /// The detection-stage failures ([`crate::ClassifyError::NoSignDetected`],
    /// [`crate::ClassifyError::InvalidSign`],
    /// [`crate::ClassifyError::InvalidEllipse`]) plus any OpenCV failure.
    pub fn classify(&self, image: &Mat, sign_type: SignType) -> Result<Direction> {
        let mask = compute_mask(image, &self.target)?;
        let detection = self.detector.detect(&mask, image)?;
        let partition = self.partitioner.partition(image, &detection.ellipse)?;
        let direction = classify(&partition.measurements, sign_type);
        debug!(sign_type = %sign_type, direction = %direction, "classified sign");
        Ok(direction)
    }

    /// Classify and convert the result into a recorded outcome.
    ///
    /// This is the batch entry point: every failure becomes an outcome
    /// rather than an error, so no single bad image can abort a run. Errors
    /// outside the scored categories are recorded verbatim for reporting.
    pub fn classify_outcome(&self, image: &Mat, sign_type: SignType) -> RecordedOutcome {
        match self.classify(image, sign_type) {
            Ok(direction) => RecordedOutcome::Known(direction.into()),
            Err(error) => match Outcome::from_error(&error) {
                Some(outcome) => RecordedOutcome::Known(outcome),
                None => RecordedOutcome::Unexpected(error.to_string()),
            },
        }
    }

    /// Classify with per-stage diagnostic artifacts
    pub fn classify_debug(
        &self,
        image: &Mat,
        sign_type: SignType,
    ) -> Result<(Direction, DebugOutput)> {
        let mask = compute_mask(image, &self.target)?;
        let detection = self.detector.detect(&mask, image)?;
        let partition = self.partitioner.partition(image, &detection.ellipse)?;
        let direction = classify(&partition.measurements, sign_type);

        let center = detection.ellipse.center_i32();
        let summary = quadrant_summary(
            &partition.measurements,
            center,
            (image.cols(), image.rows()),
        )?;

        Ok((
            direction,
            DebugOutput {
                color_mask: mask,
                annotated: detection.annotated,
                masked_image: partition.masked_image,
                interior_mask: partition.interior_mask,
                summary,
            },
        ))
    }
}
