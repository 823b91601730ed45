//! Sign boundary detection via contour extraction and ellipse fitting
//!
//! The boundary of a circular sign projects to a rotated ellipse in image
//! coordinates. Detection closes small gaps in the color mask, takes the
//! largest outer contour, fits an ellipse to it, and rejects fits whose size
//! is implausible for a pre-cropped sign photograph (the boundary is expected
//! to span most of the frame in both dimensions).

use opencv::{
    core::{Mat, Point, Scalar, Size, Vector, BORDER_CONSTANT},
    imgproc::{
        contour_area, ellipse, find_contours, fit_ellipse, get_structuring_element, morphology_ex,
        CHAIN_APPROX_SIMPLE, FILLED, LINE_8, MORPH_CLOSE, MORPH_RECT, RETR_EXTERNAL,
    },
    prelude::*,
};
use tracing::debug;

use crate::config::DetectionConfig;
use crate::error::{ClassifyError, Result};

type VectorOfPoint = Vector<Point>;

/// A fitted sign boundary: center, full axis lengths, rotation in degrees.
///
/// Instances are never mutated; geometric adjustments return a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignEllipse {
    pub cx: f32,
    pub cy: f32,
    /// Full length of the first axis
    pub width: f32,
    /// Full length of the second axis
    pub height: f32,
    /// Rotation angle in degrees
    pub angle: f32,
}

impl SignEllipse {
    /// Non-destructive scale/shift transform for boundary tolerance tuning.
    ///
    /// `scale_factor` multiplies both axis lengths about the unchanged
    /// center; `shift_factor` offsets the center by that fraction of each
    /// axis length. The identity is `adjusted(1.0, 0.0)`.
    pub fn adjusted(&self, scale_factor: f32, shift_factor: f32) -> Self {
        Self {
            cx: self.cx + self.width * shift_factor,
            cy: self.cy + self.height * shift_factor,
            width: self.width * scale_factor,
            height: self.height * scale_factor,
            angle: self.angle,
        }
    }

    /// Integer center used for quadrant anchoring and rasterization
    pub fn center_i32(&self) -> (i32, i32) {
        (self.cx as i32, self.cy as i32)
    }

    /// Draw the ellipse outline onto `image`
    pub fn draw_outline(&self, image: &mut Mat, color: Scalar, thickness: i32) -> Result<()> {
        self.draw(image, color, thickness)
    }

    /// Fill the ellipse interior in `mask` with 255
    pub fn fill(&self, mask: &mut Mat) -> Result<()> {
        self.draw(mask, Scalar::all(255.0), FILLED)
    }

    fn draw(&self, image: &mut Mat, color: Scalar, thickness: i32) -> Result<()> {
        ellipse(
            image,
            Point::new(self.cx as i32, self.cy as i32),
            Size::new((self.width / 2.0) as i32, (self.height / 2.0) as i32),
            self.angle as f64,
            0.0,
            360.0,
            color,
            thickness,
            LINE_8,
            0,
        )
        .map_err(|e| ClassifyError::opencv("ellipse draw", e))
    }
}

/// Successful boundary detection: the fitted ellipse plus a diagnostic copy
/// of the input image with the boundary outline drawn on it.
#[derive(Debug)]
pub struct BoundaryDetection {
    pub ellipse: SignEllipse,
    pub annotated: Mat,
}

/// Boundary detector over a binary color mask
#[derive(Debug, Clone)]
pub struct BoundaryDetector {
    min_contour_area: f64,
    size_tolerance: f64,
    morph_kernel_size: i32,
}

impl BoundaryDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            min_contour_area: config.min_contour_area,
            size_tolerance: config.ellipse_size_tolerance,
            morph_kernel_size: config.morph_kernel_size,
        }
    }

    /// Detect the sign boundary in `mask` and validate it against the frame
    /// of `image`.
    ///
    /// # Errors
    ///
    /// - [`ClassifyError::NoSignDetected`] when the mask has no contours
    /// - [`ClassifyError::InvalidSign`] when the largest blob is below the
    ///   minimum area (or too degenerate to fit an ellipse)
    /// - [`ClassifyError::InvalidEllipse`] when the fitted boundary size is
    ///   implausible relative to the frame
    pub fn detect(&self, mask: &Mat, image: &Mat) -> Result<BoundaryDetection> {
        let closed = self.close_gaps(mask)?;
        let contour = self.largest_contour(&closed)?;

        // fit_ellipse is undefined below five points
        if contour.len() < 5 {
            let area = contour_area(&contour, false)
                .map_err(|e| ClassifyError::opencv("contour_area", e))?;
            return Err(ClassifyError::InvalidSign {
                area,
                minimum: self.min_contour_area,
            });
        }

        let fitted =
            fit_ellipse(&contour).map_err(|e| ClassifyError::opencv("fit_ellipse", e))?;
        let sign_ellipse = SignEllipse {
            cx: fitted.center.x,
            cy: fitted.center.y,
            width: fitted.size.width,
            height: fitted.size.height,
            angle: fitted.angle,
        };
        debug!(
            cx = sign_ellipse.cx,
            cy = sign_ellipse.cy,
            width = sign_ellipse.width,
            height = sign_ellipse.height,
            angle = sign_ellipse.angle,
            "fitted boundary ellipse"
        );

        self.validate_size(&sign_ellipse, image)?;

        let mut annotated = image
            .try_clone()
            .map_err(|e| ClassifyError::opencv("image clone", e))?;
        sign_ellipse.draw_outline(&mut annotated, Scalar::new(0.0, 255.0, 0.0, 0.0), 2)?;

        Ok(BoundaryDetection {
            ellipse: sign_ellipse,
            annotated,
        })
    }

    /// Morphological closing to bridge small gaps before contour extraction
    fn close_gaps(&self, mask: &Mat) -> Result<Mat> {
        let kernel = get_structuring_element(
            MORPH_RECT,
            Size::new(self.morph_kernel_size, self.morph_kernel_size),
            Point::new(-1, -1),
        )
        .map_err(|e| ClassifyError::opencv("get_structuring_element", e))?;

        let mut closed = Mat::default();
        morphology_ex(
            mask,
            &mut closed,
            MORPH_CLOSE,
            &kernel,
            Point::new(-1, -1),
            1,
            BORDER_CONSTANT,
            Scalar::default(),
        )
        .map_err(|e| ClassifyError::opencv("morphology_ex close", e))?;

        Ok(closed)
    }

    /// Largest outer contour by enclosed area, enforcing the minimum area
    fn largest_contour(&self, mask: &Mat) -> Result<VectorOfPoint> {
        let mut contours = Vector::<VectorOfPoint>::new();
        find_contours(
            mask,
            &mut contours,
            RETR_EXTERNAL,
            CHAIN_APPROX_SIMPLE,
            Point::new(0, 0),
        )
        .map_err(|e| ClassifyError::opencv("find_contours", e))?;

        if contours.is_empty() {
            return Err(ClassifyError::NoSignDetected);
        }

        let mut best: Option<VectorOfPoint> = None;
        let mut best_area = -1.0;
        for contour in contours.iter() {
            let area = contour_area(&contour, false)
                .map_err(|e| ClassifyError::opencv("contour_area", e))?;
            if area > best_area {
                best_area = area;
                best = Some(contour);
            }
        }

        if best_area < self.min_contour_area {
            return Err(ClassifyError::InvalidSign {
                area: best_area,
                minimum: self.min_contour_area,
            });
        }

        // best is always set here: contours is non-empty
        best.ok_or(ClassifyError::NoSignDetected)
    }

    /// Reject ellipses whose size deviates too far from the frame in either
    /// dimension.
    fn validate_size(&self, sign_ellipse: &SignEllipse, image: &Mat) -> Result<()> {
        let width_ratio = sign_ellipse.width as f64 / image.cols() as f64;
        let height_ratio = sign_ellipse.height as f64 / image.rows() as f64;

        if (1.0 - width_ratio).abs() > self.size_tolerance
            || (1.0 - height_ratio).abs() > self.size_tolerance
        {
            return Err(ClassifyError::InvalidEllipse {
                width_ratio,
                height_ratio,
                tolerance: self.size_tolerance,
            });
        }
        Ok(())
    }
}
