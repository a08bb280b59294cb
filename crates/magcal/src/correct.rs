//! Apply a calibration transform to a batch of samples.

use crate::points::PointSet;
use crate::transform::CalibrationTransform;

/// Correct every sample, preserving count and order.
pub fn correct_points(points: &PointSet, transform: &CalibrationTransform) -> Vec<[f64; 2]> {
    correct_slice(points.as_slice(), transform)
}

/// Slice variant of [`correct_points`].
pub fn correct_slice(points: &[[f64; 2]], transform: &CalibrationTransform) -> Vec<[f64; 2]> {
    points.iter().map(|&p| transform.apply(p)).collect()
}

/// Radius statistics of a corrected point cloud around the origin.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RadiusStats {
    /// Smallest distance from the origin.
    pub min: f64,
    /// Largest distance from the origin.
    pub max: f64,
    /// Mean distance from the origin.
    pub mean: f64,
}

impl RadiusStats {
    /// All statistics are zero for an empty cloud.
    pub fn from_points(points: &[[f64; 2]]) -> Self {
        if points.is_empty() {
            return Self {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
            };
        }
        let mut min = f64::INFINITY;
        let mut max = 0.0_f64;
        let mut sum = 0.0;
        for &[x, y] in points {
            let r = x.hypot(y);
            min = min.min(r);
            max = max.max(r);
            sum += r;
        }
        Self {
            min,
            max,
            mean: sum / points.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conic::EllipseGeometry;
    use approx::assert_relative_eq;

    #[test]
    fn ellipse_samples_land_on_minor_circle() {
        for &(a, b, phi) in &[(5.0, 2.0, 0.5236), (3.0, 3.0, 0.0), (40.0, 10.0, -1.2)] {
            let g = EllipseGeometry {
                x0: -7.0,
                y0: 11.0,
                a,
                b,
                phi,
            };
            let t = CalibrationTransform::from_geometry(&g);
            let ps = PointSet::new(g.sample_points(90)).unwrap();
            let out = correct_points(&ps, &t);
            let stats = RadiusStats::from_points(&out);
            assert_relative_eq!(stats.min, b, epsilon = 1e-9);
            assert_relative_eq!(stats.max, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn order_and_count_preserved() {
        let t = CalibrationTransform {
            offset: [1.0, 1.0],
            matrix: [[1.0, 0.0], [0.0, 1.0]],
        };
        let ps = PointSet::new(vec![[3.0, 1.0], [1.0, 4.0], [0.0, 0.0]]).unwrap();
        let out = correct_points(&ps, &t);
        assert_eq!(out, vec![[2.0, 0.0], [0.0, 3.0], [-1.0, -1.0]]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let t = CalibrationTransform {
            offset: [0.0, 0.0],
            matrix: [[0.5, 0.0], [0.0, 1.0]],
        };
        assert!(correct_slice(&[], &t).is_empty());
        let stats = RadiusStats::from_points(&[]);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.mean, 0.0);
    }
}
