//! Diagnostic renderings of quadrant measurements
//!
//! Produces a standalone summary image: the four quadrant polygons scaled
//! onto a small canvas, each labeled with its total/target pixel counts and
//! percentage. A fixed palette keeps artifacts reproducible run to run.

use opencv::{
    core::{self, Mat, Point, Scalar, Vector},
    imgproc::{fill_poly, put_text, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

use crate::detection::quadrant::{Quadrant, QuadrantMeasurements};
use crate::error::{ClassifyError, Result};

const CANVAS_HEIGHT: i32 = 500;
const CANVAS_WIDTH: i32 = 400;

fn quadrant_fill(quadrant: Quadrant) -> Scalar {
    match quadrant {
        Quadrant::LeftTop => Scalar::new(180.0, 120.0, 60.0, 0.0),
        Quadrant::RightTop => Scalar::new(80.0, 180.0, 120.0, 0.0),
        Quadrant::LeftBottom => Scalar::new(120.0, 80.0, 200.0, 0.0),
        Quadrant::RightBottom => Scalar::new(60.0, 160.0, 220.0, 0.0),
    }
}

/// Render the quadrant summary for one image.
///
/// `center` is the quadrant anchor and `frame` the (width, height) of the
/// analyzed image; polygons are scaled down to fit the canvas.
pub fn quadrant_summary(
    measurements: &QuadrantMeasurements,
    center: (i32, i32),
    frame: (i32, i32),
) -> Result<Mat> {
    let (frame_width, frame_height) = frame;
    let mut canvas = Mat::new_rows_cols_with_default(
        CANVAS_HEIGHT,
        CANVAS_WIDTH,
        core::CV_8UC3,
        Scalar::all(240.0),
    )
    .map_err(|e| ClassifyError::opencv("canvas alloc", e))?;

    let scale = CANVAS_HEIGHT as f64 / frame_width.max(frame_height) as f64;

    for quadrant in Quadrant::ALL {
        let polygon = quadrant.polygon(center, frame_width, frame_height);
        let mut scaled = Vector::<Point>::new();
        for point in polygon {
            scaled.push(Point::new(
                (point.x as f64 * scale) as i32,
                (point.y as f64 * scale) as i32,
            ));
        }
        let mut polygons = Vector::<Vector<Point>>::new();
        polygons.push(scaled.clone());
        fill_poly(
            &mut canvas,
            &polygons,
            quadrant_fill(quadrant),
            LINE_8,
            0,
            Point::new(0, 0),
        )
        .map_err(|e| ClassifyError::opencv("fill_poly quadrant", e))?;

        // Anchor the labels near the polygon centroid, nudged left so the
        // text stays on the canvas.
        let mut anchor = Point::new(0, 0);
        for point in scaled.iter() {
            anchor.x += point.x;
            anchor.y += point.y;
        }
        anchor.x = (anchor.x / 4 - 60).max(10);
        anchor.y /= 4;

        let measurement = measurements.get(quadrant);
        put_text(
            &mut canvas,
            &format!("T:{} C:{}", measurement.total, measurement.target),
            Point::new(anchor.x, anchor.y - 10),
            FONT_HERSHEY_SIMPLEX,
            0.5,
            Scalar::all(0.0),
            2,
            LINE_8,
            false,
        )
        .map_err(|e| ClassifyError::opencv("put_text counts", e))?;
        put_text(
            &mut canvas,
            &format!("%{:.1}", measurement.percentage),
            Point::new(anchor.x, anchor.y + 10),
            FONT_HERSHEY_SIMPLEX,
            0.5,
            Scalar::all(0.0),
            2,
            LINE_8,
            false,
        )
        .map_err(|e| ClassifyError::opencv("put_text percentage", e))?;
    }

    Ok(canvas)
}
