//! Compile-time defaults for the classification pipeline
//!
//! These are the baseline values behind [`crate::config::PipelineConfig::default`];
//! runs with alternate thresholds should go through the configuration layer
//! rather than editing these.

/// HSV color windows for sign colors (OpenCV ranges: H 0-180, S/V 0-255)
pub mod hsv {
    /// Minimum HSV values for the navy-blue sign background
    pub const NAVY_BLUE_LOWER: [u8; 3] = [105, 105, 55];

    /// Maximum HSV values for the navy-blue sign background
    pub const NAVY_BLUE_UPPER: [u8; 3] = [140, 255, 165];

    /// Red hue window below the wrap point
    pub const RED_LOW_LOWER: [u8; 3] = [0, 100, 100];
    pub const RED_LOW_UPPER: [u8; 3] = [10, 255, 255];

    /// Red hue window above the wrap point
    pub const RED_HIGH_LOWER: [u8; 3] = [160, 100, 100];
    pub const RED_HIGH_UPPER: [u8; 3] = [180, 255, 255];
}

/// Boundary detection thresholds
pub mod detection {
    /// Minimum contour area for a blob to count as a sign candidate
    pub const MIN_CONTOUR_AREA: f64 = 100.0;

    /// Maximum deviation of ellipse/frame size ratios from 1.0
    pub const ELLIPSE_SIZE_TOLERANCE: f64 = 0.3;

    /// Square structuring element side for morphological closing
    pub const MORPH_KERNEL_SIZE: i32 = 3;
}

/// Score weights per outcome category
pub mod scoring {
    pub const LEFT: f64 = 0.1;
    pub const RIGHT: f64 = -0.5;
    pub const NO_SIGN_DETECTED: f64 = -0.25;
    pub const INVALID_SIGN: f64 = -0.25;
    pub const INVALID_ELLIPSE: f64 = -0.25;
    pub const IMAGE_READ_ERROR: f64 = -1.0;
}

/// File handling defaults for batch runs
pub mod io {
    /// Extensions accepted by the folder scanner (lowercase, no dot)
    pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png"];

    /// Folder for the results report, relative to the input folder
    pub const OUTPUT_FOLDER: &str = "output";

    /// Name of the results report file
    pub const RESULTS_FILE_NAME: &str = "results.txt";

    /// Folder for per-image debug artifacts, relative to the input folder
    pub const DEBUG_FOLDER: &str = "debug_images";
}
