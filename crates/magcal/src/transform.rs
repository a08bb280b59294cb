//! Calibration transform: hard-iron offset plus soft-iron correction matrix.

use nalgebra::{Matrix2, Vector2};

use crate::conic::EllipseGeometry;

/// Offset-and-matrix pair mapping raw samples onto a centred circle.
///
/// A raw sample `p` is corrected as `Q · (p − offset)`. `Q` rotates onto the
/// ellipse axes, shrinks the major axis to the minor-axis length and rotates
/// back, so the corrected circle has radius `b`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CalibrationTransform {
    /// Ellipse center `(x0, y0)` to subtract from raw samples.
    pub offset: [f64; 2],
    /// Row-major correction matrix `Q`.
    pub matrix: [[f64; 2]; 2],
}

impl CalibrationTransform {
    /// Build the transform for a fitted ellipse.
    ///
    /// The off-diagonal term is computed once and written to both entries,
    /// so `Q` is exactly symmetric.
    pub fn from_geometry(geometry: &EllipseGeometry) -> Self {
        let sx = geometry.b / geometry.a;
        let sy = 1.0;
        let (sp, cp) = geometry.phi.sin_cos();

        let off = (sx - sy) * cp * sp;
        let matrix = [
            [sx * cp * cp + sy * sp * sp, off],
            [off, sx * sp * sp + sy * cp * cp],
        ];

        Self {
            offset: [geometry.x0, geometry.y0],
            matrix,
        }
    }

    /// Correction matrix as an nalgebra matrix.
    pub fn matrix(&self) -> Matrix2<f64> {
        let q = &self.matrix;
        Matrix2::new(q[0][0], q[0][1], q[1][0], q[1][1])
    }

    /// Determinant of `Q`, equal to the minor/major axis ratio.
    pub fn determinant(&self) -> f64 {
        self.matrix().determinant()
    }

    /// Correct a single raw sample.
    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        let centred = Vector2::new(point[0] - self.offset[0], point[1] - self.offset[1]);
        let out = self.matrix() * centred;
        [out[0], out[1]]
    }
}

impl From<&EllipseGeometry> for CalibrationTransform {
    fn from(geometry: &EllipseGeometry) -> Self {
        Self::from_geometry(geometry)
    }
}
