//! Numerically stable direct least-squares ellipse fit (Halir & Flusser, 1998).

use nalgebra::{DMatrix, Matrix3, Vector6};

use super::eigen::{real_eigenpairs, EigenPair};
use super::types::{ConicCoeffs, EllipseGeometry};
use crate::config::FitConfig;
use crate::error::{CalibError, Instability};

/// Fewest samples that determine a conic.
pub const MIN_POINTS: usize = 6;

/// Fit an ellipse to a set of 2D points.
///
/// The scatter matrix is split into quadratic and linear blocks so that the
/// linear coefficients can be eliminated (`T = −S3⁻¹ S2ᵀ`), leaving a 3×3
/// eigenproblem constrained by `4AC − B² = 1` through
/// `C1 = [[0, 0, 2], [0, −1, 0], [2, 0, 0]]`.
///
/// The returned coefficients always satisfy `B² − 4AC < 0` and `A + C > 0`.
pub fn fit_conic(points: &[[f64; 2]], config: &FitConfig) -> Result<ConicCoeffs, CalibError> {
    let n = points.len();
    let needed = config.min_points.max(MIN_POINTS);
    if n < needed {
        return Err(CalibError::TooFewPoints { needed, got: n });
    }

    let (mean_x, mean_y, scale) = if config.normalize {
        normalization_params(points)
    } else {
        (0.0, 0.0, 1.0)
    };

    // Design matrices D1 = [x², xy, y²] and D2 = [x, y, 1]
    let mut d1 = DMatrix::<f64>::zeros(n, 3);
    let mut d2 = DMatrix::<f64>::zeros(n, 3);
    for (i, &[px, py]) in points.iter().enumerate() {
        let x = (px - mean_x) * scale;
        let y = (py - mean_y) * scale;
        d1[(i, 0)] = x * x;
        d1[(i, 1)] = x * y;
        d1[(i, 2)] = y * y;
        d2[(i, 0)] = x;
        d2[(i, 1)] = y;
        d2[(i, 2)] = 1.0;
    }

    let s1 = to_matrix3(&d1.tr_mul(&d1));
    let s2 = to_matrix3(&d1.tr_mul(&d2));
    let s3 = to_matrix3(&d2.tr_mul(&d2));

    if !(s1.iter().all(|v| v.is_finite()) && s3.iter().all(|v| v.is_finite())) {
        return Err(Instability::NonFinite.into());
    }
    let rcond = symmetric_rcond(&s3);
    tracing::debug!(n, rcond, "linear scatter block");
    if rcond.is_nan() || rcond < config.scatter_rcond_min {
        return Err(CalibError::SingularScatter { rcond });
    }
    let s3_inv = s3
        .try_inverse()
        .ok_or(CalibError::SingularScatter { rcond })?;

    let t = -(s3_inv * s2.transpose());
    let m = s1 + s2 * t;

    // C1⁻¹ for C1 = [[0, 0, 2], [0, -1, 0], [2, 0, 0]]
    let c1_inv = Matrix3::new(0.0, 0.0, 0.5, 0.0, -1.0, 0.0, 0.5, 0.0, 0.0);
    let system = c1_inv * m;

    let pairs = real_eigenpairs(&system, config.max_imag_rel, config.schur_max_iters)?;
    let candidates = pairs.len();
    let a1 = ellipse_eigenvector(&pairs)?;
    let a2 = t * a1;

    let coeffs_norm = Vector6::new(a1[0], a1[1], a1[2], a2[0], a2[1], a2[2]);
    let conic = ConicCoeffs(denormalize_conic(&coeffs_norm, mean_x, mean_y, scale));

    if !conic.is_finite() {
        return Err(Instability::NonFinite.into());
    }
    if !conic.is_ellipse() {
        return Err(CalibError::DegenerateFit { candidates });
    }
    Ok(conic)
}

/// Fit an ellipse and return geometric ellipse parameters.
///
/// Convenience wrapper for call sites that only need the geometric form.
pub fn fit_ellipse(points: &[[f64; 2]], config: &FitConfig) -> Result<EllipseGeometry, CalibError> {
    fit_conic(points, config)?.to_geometry()
}

/// [`select_ellipse_eigenvector`], failing with `DegenerateFit` when no
/// candidate qualifies.
fn ellipse_eigenvector(pairs: &[EigenPair]) -> Result<nalgebra::Vector3<f64>, CalibError> {
    select_ellipse_eigenvector(pairs).ok_or(CalibError::DegenerateFit {
        candidates: pairs.len(),
    })
}

/// Pick the eigenvector satisfying `4AC − B² > 0`.
///
/// Solver order carries no meaning, so every pair is tested. Ties go to the
/// smallest `|λ|`. The sign is flipped so that `A + C > 0`.
fn select_ellipse_eigenvector(pairs: &[EigenPair]) -> Option<nalgebra::Vector3<f64>> {
    let feasible: Vec<&EigenPair> = pairs
        .iter()
        .filter(|p| p.ellipse_constraint() > 0.0)
        .collect();

    for p in pairs {
        tracing::debug!(
            eigenvalue = p.value,
            constraint = p.ellipse_constraint(),
            "eigenpair"
        );
    }
    if feasible.len() > 1 {
        tracing::warn!(
            count = feasible.len(),
            "several ellipse-consistent eigenvectors, taking smallest |λ|"
        );
    }

    let best = feasible
        .into_iter()
        .min_by(|a, b| a.value.abs().total_cmp(&b.value.abs()))?;
    let v = best.vector;
    Some(if v[0] + v[2] < 0.0 { -v } else { v })
}

fn to_matrix3(m: &DMatrix<f64>) -> Matrix3<f64> {
    m.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Ratio of smallest to largest eigenvalue magnitude of a symmetric matrix.
fn symmetric_rcond(m: &Matrix3<f64>) -> f64 {
    let eig = m.symmetric_eigenvalues();
    let max = eig.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let min = eig.iter().fold(f64::INFINITY, |acc, v| acc.min(v.abs()));
    if max > 0.0 {
        min / max
    } else {
        0.0
    }
}

/// Compute normalization parameters for a point set.
/// Returns (mean_x, mean_y, scale).
pub(crate) fn normalization_params(points: &[[f64; 2]]) -> (f64, f64, f64) {
    let n = points.len() as f64;
    let mean_x: f64 = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y: f64 = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let mean_dist: f64 = points
        .iter()
        .map(|p| (p[0] - mean_x).hypot(p[1] - mean_y))
        .sum::<f64>()
        / n;

    let scale = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    (mean_x, mean_y, scale)
}

/// Denormalize conic coefficients from normalized coordinates back to original.
///
/// If normalized coords are x' = s(x − mx), y' = s(y − my), then the conic
/// A'x'² + B'x'y' + C'y'² + D'x' + E'y' + F' = 0 transforms back via
/// substitution.
fn denormalize_conic(c: &Vector6<f64>, mx: f64, my: f64, s: f64) -> [f64; 6] {
    let [a_, b_, c_, d_, e_, f_] = [c[0], c[1], c[2], c[3], c[4], c[5]];
    let s2 = s * s;

    let a = a_ * s2;
    let b = b_ * s2;
    let c = c_ * s2;
    let d = -2.0 * a_ * s2 * mx - b_ * s2 * my + d_ * s;
    let e = -b_ * s2 * mx - 2.0 * c_ * s2 * my + e_ * s;
    let f =
        a_ * s2 * mx * mx + b_ * s2 * mx * my + c_ * s2 * my * my - d_ * s * mx - e_ * s * my + f_;

    [a, b, c, d, e, f]
}

/// Compute RMS Sampson distance of points to an ellipse.
pub fn rms_sampson_distance(ellipse: &EllipseGeometry, points: &[[f64; 2]]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = points
        .iter()
        .map(|&[x, y]| {
            let d = ellipse.sampson_distance(x, y);
            d * d
        })
        .sum();
    (sum_sq / points.len() as f64).sqrt()
}
