//! HSV color bands and binary mask extraction
//!
//! A [`ColorBand`] names one or more inclusive HSV windows; a pixel belongs
//! to the band when all three of its HSV components fall inside any window.
//! Bands with two windows model colors whose hue wraps past the top of the
//! hue axis (red), and their per-window masks combine with a logical OR.

use opencv::{
    core::{self, Mat, Scalar},
    imgproc::{cvt_color, COLOR_BGR2HSV},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::constants::hsv;
use crate::error::{ClassifyError, Result};

/// One inclusive HSV window (OpenCV ranges: H 0-180, S/V 0-255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    fn lower_scalar(&self) -> Scalar {
        Scalar::new(
            self.lower[0] as f64,
            self.lower[1] as f64,
            self.lower[2] as f64,
            0.0,
        )
    }

    fn upper_scalar(&self) -> Scalar {
        Scalar::new(
            self.upper[0] as f64,
            self.upper[1] as f64,
            self.upper[2] as f64,
            0.0,
        )
    }
}

/// A named color band: the union of one or more HSV windows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    pub name: String,
    pub ranges: Vec<HsvRange>,
}

impl ColorBand {
    /// The navy-blue background of mandatory-direction signs
    pub fn navy_blue() -> Self {
        Self {
            name: "navy_blue".into(),
            ranges: vec![HsvRange::new(hsv::NAVY_BLUE_LOWER, hsv::NAVY_BLUE_UPPER)],
        }
    }

    /// The red border of prohibition signs; two hue windows because red
    /// wraps around the top of the hue axis
    pub fn red() -> Self {
        Self {
            name: "red".into(),
            ranges: vec![
                HsvRange::new(hsv::RED_LOW_LOWER, hsv::RED_LOW_UPPER),
                HsvRange::new(hsv::RED_HIGH_LOWER, hsv::RED_HIGH_UPPER),
            ],
        }
    }
}

/// Build a binary mask of the pixels of `image` (BGR) that fall inside `band`.
///
/// The result is a single-channel 0/255 mask with the same extent as the
/// input. Multi-window bands are combined with `bitwise_or`, so overlapping
/// windows cannot overflow the binary range.
pub fn compute_mask(image: &Mat, band: &ColorBand) -> Result<Mat> {
    let mut hsv_image = Mat::default();
    cvt_color(image, &mut hsv_image, COLOR_BGR2HSV, 0)
        .map_err(|e| ClassifyError::opencv("cvt_color to HSV", e))?;

    let mut combined = Mat::default();
    for (i, range) in band.ranges.iter().enumerate() {
        let mut mask = Mat::default();
        core::in_range(
            &hsv_image,
            &range.lower_scalar(),
            &range.upper_scalar(),
            &mut mask,
        )
        .map_err(|e| ClassifyError::opencv("in_range", e))?;

        if i == 0 {
            combined = mask;
        } else {
            let mut merged = Mat::default();
            core::bitwise_or(&combined, &mask, &mut merged, &Mat::default())
                .map_err(|e| ClassifyError::opencv("bitwise_or of band windows", e))?;
            combined = merged;
        }
    }

    Ok(combined)
}

/// Count the pixels of `image` that belong to `band` within `region`.
///
/// `region` is a 0/255 mask restricting where pixels are counted; pixels
/// outside it never contribute even when their color matches.
pub fn count_band_pixels(image: &Mat, region: &Mat, band: &ColorBand) -> Result<i32> {
    let color_mask = compute_mask(image, band)?;

    let mut restricted = Mat::default();
    core::bitwise_and(&color_mask, region, &mut restricted, &Mat::default())
        .map_err(|e| ClassifyError::opencv("bitwise_and with region", e))?;

    core::count_non_zero(&restricted).map_err(|e| ClassifyError::opencv("count_non_zero", e))
}
