//! Quadrant partitioning and per-quadrant color measurement
//!
//! The frame rectangle is split into four pieces meeting at the ellipse
//! center. The split is axis-aligned on the frame, by Cartesian position
//! relative to the center, not rotated with the ellipse. Each quadrant is
//! intersected with the ellipse interior before counting, so only
//! in-boundary pixels contribute to the percentages.

use opencv::{
    core::{self, Mat, Point, Rect, Scalar},
    imgproc::{rectangle, FILLED, LINE_8},
    prelude::*,
};

use crate::detection::boundary::SignEllipse;
use crate::error::{ClassifyError, Result};
use crate::mask::{compute_mask, ColorBand};

/// Sentinel color painted outside the boundary in the masked copy (pure red
/// in BGR). Visualization only; measurement uses the binary interior mask.
fn exterior_sentinel() -> Scalar {
    Scalar::new(0.0, 0.0, 255.0, 0.0)
}

/// One of the four frame regions around the ellipse center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    LeftTop,
    RightTop,
    LeftBottom,
    RightBottom,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::LeftTop,
        Quadrant::RightTop,
        Quadrant::LeftBottom,
        Quadrant::RightBottom,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::LeftTop => "Left_Top",
            Quadrant::RightTop => "Right_Top",
            Quadrant::LeftBottom => "Left_Bottom",
            Quadrant::RightBottom => "Right_Bottom",
        }
    }

    /// The quadrant's 4-point polygon over a `width` x `height` frame with
    /// the split anchored at `center` (frame corners/edges plus the center).
    pub fn polygon(&self, center: (i32, i32), width: i32, height: i32) -> [Point; 4] {
        let (cx, cy) = center;
        match self {
            Quadrant::LeftTop => [
                Point::new(0, 0),
                Point::new(cx, 0),
                Point::new(cx, cy),
                Point::new(0, cy),
            ],
            Quadrant::RightTop => [
                Point::new(cx, 0),
                Point::new(width, 0),
                Point::new(width, cy),
                Point::new(cx, cy),
            ],
            Quadrant::LeftBottom => [
                Point::new(0, cy),
                Point::new(cx, cy),
                Point::new(cx, height),
                Point::new(0, height),
            ],
            Quadrant::RightBottom => [
                Point::new(cx, cy),
                Point::new(width, cy),
                Point::new(width, height),
                Point::new(cx, height),
            ],
        }
    }

    /// Half-open raster rectangle of the quadrant. The center row and column
    /// belong to the bottom/right quadrants, so the four rectangles tile the
    /// frame exactly with no shared pixels.
    pub fn rect(&self, center: (i32, i32), width: i32, height: i32) -> Rect {
        let cx = center.0.clamp(0, width);
        let cy = center.1.clamp(0, height);
        match self {
            Quadrant::LeftTop => Rect::new(0, 0, cx, cy),
            Quadrant::RightTop => Rect::new(cx, 0, width - cx, cy),
            Quadrant::LeftBottom => Rect::new(0, cy, cx, height - cy),
            Quadrant::RightBottom => Rect::new(cx, cy, width - cx, height - cy),
        }
    }

    fn index(&self) -> usize {
        match self {
            Quadrant::LeftTop => 0,
            Quadrant::RightTop => 1,
            Quadrant::LeftBottom => 2,
            Quadrant::RightBottom => 3,
        }
    }
}

/// Pixel counts for one quadrant restricted to the boundary interior
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurement {
    /// In-boundary pixels in this quadrant
    pub total: i32,
    /// In-boundary pixels matching the target color band
    pub target: i32,
    /// `target / total * 100`, or 0 when the quadrant holds no boundary pixels
    pub percentage: f64,
}

/// Read-only per-quadrant measurements, the sole input to classification
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadrantMeasurements {
    slots: [Measurement; 4],
}

impl QuadrantMeasurements {
    pub fn get(&self, quadrant: Quadrant) -> Measurement {
        self.slots[quadrant.index()]
    }

    pub fn percentage(&self, quadrant: Quadrant) -> f64 {
        self.get(quadrant).percentage
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, Measurement)> + '_ {
        Quadrant::ALL.iter().map(|q| (*q, self.slots[q.index()]))
    }

    #[cfg(test)]
    pub(crate) fn from_percentages(lt: f64, rt: f64, lb: f64, rb: f64) -> Self {
        let m = |p: f64| Measurement {
            total: 100,
            target: p as i32,
            percentage: p,
        };
        Self {
            slots: [m(lt), m(rt), m(lb), m(rb)],
        }
    }
}

/// Everything `partition` produces for one image
#[derive(Debug)]
pub struct PartitionResult {
    /// Copy of the input with exterior pixels painted with the sentinel color
    pub masked_image: Mat,
    /// Binary mask of the ellipse interior
    pub interior_mask: Mat,
    pub measurements: QuadrantMeasurements,
}

/// Splits the frame around a fitted boundary and measures the target color
/// density inside each quadrant.
#[derive(Debug, Clone)]
pub struct QuadrantPartitioner {
    target: ColorBand,
}

impl QuadrantPartitioner {
    pub fn new(target: ColorBand) -> Self {
        Self { target }
    }

    pub fn partition(&self, image: &Mat, sign_ellipse: &SignEllipse) -> Result<PartitionResult> {
        let width = image.cols();
        let height = image.rows();

        let interior_mask = self.interior_mask(sign_ellipse, width, height)?;
        let masked_image = self.mask_exterior(image, &interior_mask)?;

        // One pass over the masked image; per-quadrant counts intersect it
        // with each quadrant's raster rectangle.
        let target_mask = compute_mask(&masked_image, &self.target)?;
        let mut interior_target = Mat::default();
        core::bitwise_and(&target_mask, &interior_mask, &mut interior_target, &Mat::default())
            .map_err(|e| ClassifyError::opencv("bitwise_and target/interior", e))?;

        let center = sign_ellipse.center_i32();
        let mut slots = [Measurement::default(); 4];
        for quadrant in Quadrant::ALL {
            let mut quadrant_mask = Mat::zeros(height, width, core::CV_8UC1)
                .map_err(|e| ClassifyError::opencv("quadrant mask alloc", e))?
                .to_mat()
                .map_err(|e| ClassifyError::opencv("quadrant mask alloc", e))?;
            let rect = quadrant.rect(center, width, height);
            if rect.width > 0 && rect.height > 0 {
                rectangle(
                    &mut quadrant_mask,
                    rect,
                    Scalar::all(255.0),
                    FILLED,
                    LINE_8,
                    0,
                )
                .map_err(|e| ClassifyError::opencv("quadrant rect fill", e))?;
            }

            let mut in_boundary = Mat::default();
            core::bitwise_and(
                &quadrant_mask,
                &interior_mask,
                &mut in_boundary,
                &Mat::default(),
            )
            .map_err(|e| ClassifyError::opencv("bitwise_and quadrant/interior", e))?;
            let total = core::count_non_zero(&in_boundary)
                .map_err(|e| ClassifyError::opencv("count_non_zero total", e))?;

            let mut in_target = Mat::default();
            core::bitwise_and(
                &quadrant_mask,
                &interior_target,
                &mut in_target,
                &Mat::default(),
            )
            .map_err(|e| ClassifyError::opencv("bitwise_and quadrant/target", e))?;
            let target = core::count_non_zero(&in_target)
                .map_err(|e| ClassifyError::opencv("count_non_zero target", e))?;

            let percentage = if total > 0 {
                target as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            slots[quadrant.index()] = Measurement {
                total,
                target,
                percentage,
            };
        }

        Ok(PartitionResult {
            masked_image,
            interior_mask,
            measurements: QuadrantMeasurements { slots },
        })
    }

    fn interior_mask(&self, sign_ellipse: &SignEllipse, width: i32, height: i32) -> Result<Mat> {
        let mut mask = Mat::zeros(height, width, core::CV_8UC1)
            .map_err(|e| ClassifyError::opencv("interior mask alloc", e))?
            .to_mat()
            .map_err(|e| ClassifyError::opencv("interior mask alloc", e))?;
        sign_ellipse.fill(&mut mask)?;
        Ok(mask)
    }

    fn mask_exterior(&self, image: &Mat, interior_mask: &Mat) -> Result<Mat> {
        let mut exterior = Mat::default();
        core::bitwise_not(interior_mask, &mut exterior, &Mat::default())
            .map_err(|e| ClassifyError::opencv("bitwise_not interior", e))?;

        let mut masked = image
            .try_clone()
            .map_err(|e| ClassifyError::opencv("image clone", e))?;
        masked
            .set_to(&exterior_sentinel(), &exterior)
            .map_err(|e| ClassifyError::opencv("set_to sentinel", e))?;
        Ok(masked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn centered_ellipse(width: i32, height: i32) -> SignEllipse {
        SignEllipse {
            cx: width as f32 / 2.0,
            cy: height as f32 / 2.0,
            width: width as f32 - 4.0,
            height: height as f32 - 4.0,
            angle: 0.0,
        }
    }

    fn navy_image(rows: i32, cols: i32) -> Mat {
        Mat::new_rows_cols_with_default(
            rows,
            cols,
            core::CV_8UC3,
            Scalar::new(120.0, 30.0, 20.0, 0.0),
        )
        .unwrap()
    }

    #[test]
    fn test_quadrant_rects_tile_frame_exactly() {
        // Off-center anchor; every frame pixel lands in exactly one rect.
        let center = (37, 51);
        let (w, h) = (120, 90);

        let mut covered = Mat::zeros(h, w, core::CV_8UC1).unwrap().to_mat().unwrap();
        let mut total_area = 0;
        for quadrant in Quadrant::ALL {
            let rect = quadrant.rect(center, w, h);
            total_area += rect.width * rect.height;
            rectangle(
                &mut covered,
                rect,
                Scalar::all(255.0),
                FILLED,
                LINE_8,
                0,
            )
            .unwrap();
        }

        // Union covers the whole frame and rect areas sum to the frame area,
        // so the rects are disjoint.
        assert_eq!(core::count_non_zero(&covered).unwrap(), w * h);
        assert_eq!(total_area, w * h);
    }

    #[test]
    fn test_quadrant_rect_center_on_edge() {
        let rect = Quadrant::LeftTop.rect((0, 0), 100, 100);
        assert_eq!(rect.width, 0);
        let rect = Quadrant::RightBottom.rect((0, 0), 100, 100);
        assert_eq!((rect.width, rect.height), (100, 100));
    }

    #[test]
    fn test_polygon_corners() {
        let polygon = Quadrant::RightBottom.polygon((50, 40), 100, 80);
        assert_eq!(polygon[0], Point::new(50, 40));
        assert_eq!(polygon[2], Point::new(100, 80));
    }

    #[test]
    fn test_full_navy_disc_measures_near_100_everywhere() {
        let image = navy_image(200, 200);
        let sign_ellipse = centered_ellipse(200, 200);
        let partitioner = QuadrantPartitioner::new(ColorBand::navy_blue());

        let result = partitioner.partition(&image, &sign_ellipse).unwrap();
        for (_, m) in result.measurements.iter() {
            assert!(m.total > 0);
            assert!(m.percentage > 99.0 && m.percentage <= 100.0);
        }
    }

    #[test]
    fn test_percentages_bounded() {
        let image = navy_image(120, 120);
        let sign_ellipse = centered_ellipse(120, 120);
        let partitioner = QuadrantPartitioner::new(ColorBand::red());

        let result = partitioner.partition(&image, &sign_ellipse).unwrap();
        for (_, m) in result.measurements.iter() {
            assert!(m.percentage >= 0.0 && m.percentage <= 100.0);
            // Navy pixels never match the red band.
            assert_eq!(m.target, 0);
        }
    }

    #[test]
    fn test_zero_total_yields_zero_percentage() {
        // Degenerate boundary off in a corner: some quadrants hold no
        // interior pixels at all.
        let image = navy_image(100, 100);
        let sign_ellipse = SignEllipse {
            cx: 95.0,
            cy: 95.0,
            width: 8.0,
            height: 8.0,
            angle: 0.0,
        };
        let partitioner = QuadrantPartitioner::new(ColorBand::navy_blue());

        let result = partitioner.partition(&image, &sign_ellipse).unwrap();
        let left_top = result.measurements.get(Quadrant::LeftTop);
        assert_eq!(left_top.total, 0);
        assert_eq!(left_top.percentage, 0.0);
    }

    #[test]
    fn test_masked_image_has_sentinel_exterior() {
        let image = navy_image(100, 100);
        let sign_ellipse = centered_ellipse(100, 100);
        let partitioner = QuadrantPartitioner::new(ColorBand::navy_blue());

        let result = partitioner.partition(&image, &sign_ellipse).unwrap();
        // Frame corner is outside the boundary: pure red in BGR.
        let corner = result
            .masked_image
            .at_2d::<core::Vec3b>(0, 0)
            .unwrap();
        assert_eq!(corner.0, [0, 0, 255]);
    }
}
