//! Scale abstractions shared by every coordinate-aware layer

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Pure domain -> range mapping used for coordinate math.
///
/// The compositor never mutates scales; it forwards them unchanged to
/// every layer that needs them.
pub trait Scale: Send + Sync {
    /// Map a domain value into range coordinates
    fn apply(&self, value: f64) -> f64;

    /// The input domain as (start, end)
    fn domain(&self) -> (f64, f64);

    /// The output range as (start, end)
    fn range(&self) -> (f64, f64);
}

/// Linear interpolation between a domain and a range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a new linear scale
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// The identity mapping over the unit interval
    pub fn identity() -> Self {
        Self::new((0.0, 1.0), (0.0, 1.0))
    }
}

impl Scale for LinearScale {
    fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    fn domain(&self) -> (f64, f64) {
        self.domain
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// The x/y (and optional r) scales shared by all layers of one frame
#[derive(Clone)]
pub struct FrameScales {
    pub x: Arc<dyn Scale>,
    pub y: Arc<dyn Scale>,
    pub r: Option<Arc<dyn Scale>>,
}

impl FrameScales {
    /// Create frame scales from x and y mappings
    pub fn new(x: Arc<dyn Scale>, y: Arc<dyn Scale>) -> Self {
        Self { x, y, r: None }
    }

    /// Attach a radius scale
    pub fn with_r(mut self, r: Arc<dyn Scale>) -> Self {
        self.r = Some(r);
        self
    }
}

impl Default for FrameScales {
    fn default() -> Self {
        Self::new(
            Arc::new(LinearScale::identity()),
            Arc::new(LinearScale::identity()),
        )
    }
}

/// Field-name aliases for projected coordinates in mark data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedCoordinateNames {
    pub x: String,
    pub y: String,
}

impl Default for ProjectedCoordinateNames {
    fn default() -> Self {
        Self {
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale_maps_domain_to_range() {
        let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert_eq!(scale.apply(0.0), 0.0);
        assert_eq!(scale.apply(5.0), 50.0);
        assert_eq!(scale.apply(10.0), 100.0);
    }

    #[test]
    fn test_linear_scale_degenerate_domain() {
        let scale = LinearScale::new((3.0, 3.0), (0.0, 100.0));
        assert_eq!(scale.apply(3.0), 0.0);
    }

    #[test]
    fn test_default_coordinate_names() {
        let names = ProjectedCoordinateNames::default();
        assert_eq!(names.x, "x");
        assert_eq!(names.y, "y");
    }
}
