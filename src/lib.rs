//! # signscan
//!
//! Classifies the directional arrow on cropped circular traffic sign
//! photographs by measuring where the sign's background color sits within
//! its fitted boundary.
//!
//! The per-image pipeline:
//! - builds a binary mask of the target color band (HSV windows)
//! - fits a rotated ellipse to the largest mask blob and validates its size
//!   against the frame
//! - splits the frame into four quadrants anchored at the ellipse center and
//!   measures the target-color density inside the boundary per quadrant
//! - applies the sign category's comparison rule to produce LEFT or RIGHT
//!
//! Batch runs accumulate per-image outcomes (directions and error
//! categories) into a [`StatsManager`], which computes a weighted total
//! score and renders a plain-text report.
//!
//! ## Example
//!
//! ```rust,no_run
//! use signscan::{image_loader, PipelineConfig, SignClassifier, SignType};
//! use std::path::Path;
//!
//! let config = PipelineConfig::default();
//! let classifier = SignClassifier::new(&config);
//! let image = image_loader::load_image(Path::new("sign.png"))?;
//! let direction = classifier.classify(&image, SignType::AheadRightOnly)?;
//! println!("arrow points {}", direction);
//! # Ok::<(), signscan::ClassifyError>(())
//! ```

pub mod config;
pub mod constants;
pub mod detection;
pub mod direction;
pub mod error;
pub mod image_loader;
pub mod mask;
pub mod pipeline;
pub mod stats;
pub mod visualize;

pub use config::{ColorConfig, DetectionConfig, IoConfig, PipelineConfig, ScoringConfig};
pub use detection::{
    BoundaryDetection, BoundaryDetector, Measurement, PartitionResult, Quadrant,
    QuadrantMeasurements, QuadrantPartitioner, SignEllipse,
};
pub use direction::{classify, DecisionRule, Direction, SignType};
pub use error::{ClassifyError, Result};
pub use mask::{compute_mask, count_band_pixels, ColorBand, HsvRange};
pub use pipeline::{DebugOutput, SignClassifier};
pub use stats::{Outcome, RecordedOutcome, StatsManager};
