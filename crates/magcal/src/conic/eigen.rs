//! Eigenpairs of the reduced 3×3 ellipse system.

use nalgebra::linalg::Schur;
use nalgebra::{Matrix3, Vector3};

use crate::error::{CalibError, Instability};

/// Real eigenpair of `C1⁻¹ M` with a unit-norm eigenvector.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EigenPair {
    pub value: f64,
    pub vector: Vector3<f64>,
}

impl EigenPair {
    /// Ellipse constraint `4 a c − b²` evaluated on the eigenvector.
    pub fn ellipse_constraint(&self) -> f64 {
        let v = &self.vector;
        4.0 * v[0] * v[2] - v[1] * v[1]
    }
}

/// Real eigenpairs of `system`, in solver order.
///
/// `C1⁻¹ M` is not symmetric, so the spectrum comes from a real Schur
/// decomposition. Imaginary parts larger than `max_imag_rel` times the
/// largest eigenvalue modulus are reported as instability; smaller ones are
/// dropped. Eigenvalues whose null space cannot be isolated are skipped.
pub(crate) fn real_eigenpairs(
    system: &Matrix3<f64>,
    max_imag_rel: f64,
    max_iters: usize,
) -> Result<Vec<EigenPair>, CalibError> {
    let schur = Schur::try_new(*system, f64::EPSILON, max_iters)
        .ok_or(Instability::EigenSolverDiverged)?;
    let eigenvalues = schur.complex_eigenvalues();

    let scale = eigenvalues
        .iter()
        .map(|z| z.norm())
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut pairs = Vec::with_capacity(3);
    for z in eigenvalues.iter() {
        if !(z.re.is_finite() && z.im.is_finite()) {
            return Err(Instability::NonFinite.into());
        }
        if z.im.abs() > max_imag_rel * scale {
            return Err(Instability::ComplexEigenvalue { re: z.re, im: z.im }.into());
        }
        let shifted = system - Matrix3::identity() * z.re;
        match real_null_vector_3x3(&shifted) {
            Some(vector) => pairs.push(EigenPair {
                value: z.re,
                vector,
            }),
            None => tracing::debug!(eigenvalue = z.re, "null vector not isolated, skipping"),
        }
    }
    Ok(pairs)
}

/// Unit right-singular vector of the smallest singular value.
fn real_null_vector_3x3(a: &Matrix3<f64>) -> Option<Vector3<f64>> {
    let svd = a.svd(false, true);
    let v_t = svd.v_t?;
    let s = svd.singular_values;
    let mut min_i = 0usize;
    if s[1] < s[min_i] {
        min_i = 1;
    }
    if s[2] < s[min_i] {
        min_i = 2;
    }
    let row = v_t.row(min_i);
    let v = Vector3::new(row[0], row[1], row[2]);
    let n = v.norm();
    if !n.is_finite() || n < 1e-15 {
        return None;
    }
    Some(v / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn diagonal_spectrum() {
        let m = Matrix3::new(3.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.5);
        let pairs = real_eigenpairs(&m, 1e-6, 200).unwrap();
        assert_eq!(pairs.len(), 3);
        let mut values: Vec<f64> = pairs.iter().map(|p| p.value).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_relative_eq!(values[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(values[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(values[2], 3.0, epsilon = 1e-12);
        for p in &pairs {
            let residual = (m * p.vector - p.vector * p.value).norm();
            assert!(residual < 1e-10);
            assert_relative_eq!(p.vector.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rotation_block_is_complex() {
        // 90° rotation in the xy-plane has eigenvalues ±i.
        let m = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let err = real_eigenpairs(&m, 1e-6, 200).unwrap_err();
        assert!(matches!(
            err,
            CalibError::NumericInstability(Instability::ComplexEigenvalue { .. })
        ));
    }

    #[test]
    fn ellipse_constraint_sign() {
        let p = EigenPair {
            value: 0.0,
            vector: Vector3::new(1.0, 0.0, 1.0),
        };
        assert!(p.ellipse_constraint() > 0.0);
        let h = EigenPair {
            value: 0.0,
            vector: Vector3::new(1.0, 0.0, -1.0),
        };
        assert!(h.ellipse_constraint() < 0.0);
    }
}
