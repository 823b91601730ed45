//! Sign boundary detection and quadrant measurement

pub mod boundary;
pub mod quadrant;

pub use boundary::{BoundaryDetection, BoundaryDetector, SignEllipse};
pub use quadrant::{
    Measurement, PartitionResult, Quadrant, QuadrantMeasurements, QuadrantPartitioner,
};
