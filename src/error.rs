//! Error types for the signscan library

use thiserror::Error;

/// Result type alias for signscan operations
pub type Result<T> = std::result::Result<T, ClassifyError>;

/// Errors raised while classifying a sign image or persisting a batch report.
///
/// The first four variants correspond to scored outcome categories and are
/// converted into recorded outcomes at the pipeline boundary rather than
/// aborting a batch; see [`crate::stats::Outcome`].
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// Source bytes could not be decoded as an image
    #[error("Image could not be read: {message}")]
    ImageRead {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No closed contour found in the color mask
    #[error("No sign detected")]
    NoSignDetected,

    /// Largest contour is noise or too degenerate to be a sign
    #[error("No valid sign found: largest contour area {area:.0} (minimum {minimum:.0})")]
    InvalidSign { area: f64, minimum: f64 },

    /// Fitted ellipse implausibly sized relative to the frame
    #[error(
        "Invalid ellipse detection: width ratio {width_ratio:.2}, height ratio {height_ratio:.2} \
         (tolerance {tolerance})"
    )]
    InvalidEllipse {
        width_ratio: f64,
        height_ratio: f64,
        tolerance: f64,
    },

    /// Unrecognized sign-type key. This indicates a caller or configuration
    /// defect, not a bad image, and is never scored as an outcome category.
    #[error("Error in sign name: {name:?}")]
    InvalidSignName { name: String },

    /// Configuration could not be loaded or serialized
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OpenCV operation failed
    #[error("OpenCV error during {operation}")]
    OpenCv {
        operation: String,
        #[source]
        source: opencv::Error,
    },

    /// Results report could not be persisted; the only fatal batch error
    #[error("Failed to write results to {path}")]
    ReportWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClassifyError {
    /// Create an image read error with context
    pub fn image_read<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageRead {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an OpenCV error with context
    pub fn opencv(operation: impl Into<String>, source: opencv::Error) -> Self {
        Self::OpenCv {
            operation: operation.into(),
            source,
        }
    }
}
