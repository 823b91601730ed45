//! Configuration for the classification pipeline
//!
//! All tunable values — color bands, detection thresholds, score weights,
//! batch IO settings — live in one immutable [`PipelineConfig`] value that
//! is passed to component constructors. Nothing in the pipeline reads
//! ambient global state, so tests can run with alternate thresholds.
//!
//! Configuration can be loaded from JSON files or constructed
//! programmatically:
//!
//! ```no_run
//! use signscan::PipelineConfig;
//! use std::path::Path;
//!
//! let config = PipelineConfig::from_json_file(Path::new("config.json"))?;
//! // Or use the built-in defaults:
//! let config = PipelineConfig::default();
//! # Ok::<(), signscan::ClassifyError>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{detection, io, scoring};
use crate::error::{ClassifyError, Result};
use crate::mask::ColorBand;

/// Complete pipeline configuration for a batch classification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Folder of cropped sign images to process
    pub input_path: PathBuf,

    /// Color band settings
    pub colors: ColorConfig,

    /// Boundary detection settings
    pub detection: DetectionConfig,

    /// Score weights per outcome category
    pub scoring: ScoringConfig,

    /// Batch IO settings
    pub io: IoConfig,
}

/// Color bands used by the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    /// The color measured inside the boundary (the sign background)
    pub target: ColorBand,

    /// Secondary comparison color (prohibition-sign border)
    pub secondary: ColorBand,
}

/// Boundary detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum contour area for a valid sign candidate
    pub min_contour_area: f64,

    /// Maximum deviation of ellipse/frame size ratios from 1.0
    pub ellipse_size_tolerance: f64,

    /// Square structuring element side for morphological closing
    pub morph_kernel_size: i32,
}

/// Score weight per outcome category; negative weights penalize failures
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub left: f64,
    pub right: f64,
    pub no_sign_detected: f64,
    pub invalid_sign: f64,
    pub invalid_ellipse: f64,
    pub image_read_error: f64,
}

/// Batch IO settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    /// Accepted file extensions (lowercase, no dot)
    pub supported_extensions: Vec<String>,

    /// Folder for the results report, relative to the input folder
    pub output_folder: String,

    /// Name of the results report file
    pub results_file_name: String,

    /// Folder for per-image debug artifacts, relative to the input folder
    pub debug_folder: String,

    /// Write per-image debug artifacts
    #[serde(default)]
    pub write_debug_images: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("images"),
            colors: ColorConfig {
                target: ColorBand::navy_blue(),
                secondary: ColorBand::red(),
            },
            detection: DetectionConfig::default(),
            scoring: ScoringConfig::default(),
            io: IoConfig::default(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_contour_area: detection::MIN_CONTOUR_AREA,
            ellipse_size_tolerance: detection::ELLIPSE_SIZE_TOLERANCE,
            morph_kernel_size: detection::MORPH_KERNEL_SIZE,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            left: scoring::LEFT,
            right: scoring::RIGHT,
            no_sign_detected: scoring::NO_SIGN_DETECTED,
            invalid_sign: scoring::INVALID_SIGN,
            invalid_ellipse: scoring::INVALID_ELLIPSE,
            image_read_error: scoring::IMAGE_READ_ERROR,
        }
    }
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            supported_extensions: io::SUPPORTED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output_folder: io::OUTPUT_FOLDER.to_string(),
            results_file_name: io::RESULTS_FILE_NAME.to_string(),
            debug_folder: io::DEBUG_FOLDER.to_string(),
            write_debug_images: false,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClassifyError::config(path.display().to_string(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| ClassifyError::config(path.display().to_string(), e))
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassifyError::config("serialization", e))?;
        std::fs::write(path, json)
            .map_err(|e| ClassifyError::config(path.display().to_string(), e))
    }
}
