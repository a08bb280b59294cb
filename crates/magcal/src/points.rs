//! Raw sample container.

use crate::error::CalibError;

/// Ordered, immutable batch of finite `(x, y)` samples.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PointSet {
    points: Vec<[f64; 2]>,
}

impl PointSet {
    /// Build from `(x, y)` pairs, rejecting non-finite values.
    pub fn new(points: Vec<[f64; 2]>) -> Result<Self, CalibError> {
        if let Some(index) = points
            .iter()
            .position(|p| !(p[0].is_finite() && p[1].is_finite()))
        {
            return Err(CalibError::NonFiniteSample { index });
        }
        Ok(Self { points })
    }

    /// Build from two equal-length columns.
    pub fn from_columns(xs: &[f64], ys: &[f64]) -> Result<Self, CalibError> {
        if xs.len() != ys.len() {
            return Err(CalibError::ColumnLengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        Self::new(xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the set holds no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples as a slice of `[x, y]`.
    pub fn as_slice(&self) -> &[[f64; 2]] {
        &self.points
    }

    /// Iterate over samples in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, [f64; 2]> {
        self.points.iter()
    }
}

impl AsRef<[[f64; 2]]> for PointSet {
    fn as_ref(&self) -> &[[f64; 2]] {
        &self.points
    }
}
