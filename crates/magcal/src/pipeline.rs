//! End-to-end calibration: fit → geometry → transform → correction.

use serde::Serialize;

use crate::config::FitConfig;
use crate::conic::{fit_conic, rms_sampson_distance, ConicCoeffs, EllipseGeometry};
use crate::correct::{correct_points, RadiusStats};
use crate::error::CalibError;
use crate::points::PointSet;
use crate::transform::CalibrationTransform;

/// How well the batch fits the ellipse and how round the result is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitQuality {
    /// RMS Sampson distance of the raw samples to the fitted ellipse.
    pub rms_sampson: f64,
    /// Radius spread of the corrected samples around the origin.
    pub corrected_radius: RadiusStats,
}

/// Every intermediate product of one calibration run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    /// Fitted algebraic conic.
    pub conic: ConicCoeffs,
    /// Geometric ellipse parameters.
    pub geometry: EllipseGeometry,
    /// Offset and correction matrix.
    pub transform: CalibrationTransform,
    /// Input samples after correction, in input order.
    pub corrected: Vec<[f64; 2]>,
    /// Residual diagnostics.
    pub quality: FitQuality,
}

/// Run the full pipeline on one batch of samples.
pub fn calibrate(points: &PointSet, config: &FitConfig) -> Result<Calibration, CalibError> {
    let conic = fit_conic(points.as_slice(), config)?;
    tracing::debug!(coeffs = ?conic.0, "conic fitted");

    let geometry = conic.to_geometry()?;
    tracing::debug!(
        x0 = geometry.x0,
        y0 = geometry.y0,
        a = geometry.a,
        b = geometry.b,
        phi = geometry.phi,
        "ellipse geometry"
    );

    let transform = CalibrationTransform::from_geometry(&geometry);
    let corrected = correct_points(points, &transform);

    let corrected_radius = RadiusStats::from_points(&corrected);
    let quality = FitQuality {
        rms_sampson: rms_sampson_distance(&geometry, points.as_slice()),
        corrected_radius,
    };
    tracing::debug!(
        rms_sampson = quality.rms_sampson,
        r_min = corrected_radius.min,
        r_max = corrected_radius.max,
        "calibration quality"
    );

    Ok(Calibration {
        conic,
        geometry,
        transform,
        corrected,
        quality,
    })
}
