//! Conic coefficients, ellipse geometry and the conversions between them.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use crate::error::{CalibError, Instability};

// ── Types ──────────────────────────────────────────────────────────────────

/// General conic: A x² + B xy + C y² + D x + E y + F = 0
/// Stored as [A, B, C, D, E, F].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConicCoeffs(pub [f64; 6]);

/// Geometric ellipse parameters.
///
/// `a` is always the semi-major axis and lies along `phi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EllipseGeometry {
    /// Center x.
    pub x0: f64,
    /// Center y.
    pub y0: f64,
    /// Semi-major axis length.
    pub a: f64,
    /// Semi-minor axis length.
    pub b: f64,
    /// Rotation angle of the major axis from +x, in radians (−π/2, π/2].
    pub phi: f64,
}

// ── Conic utilities ────────────────────────────────────────────────────────

impl ConicCoeffs {
    /// Algebraic distance of a point (x, y) to this conic.
    pub fn algebraic_distance(&self, x: f64, y: f64) -> f64 {
        let [a, b, c, d, e, f] = self.0;
        a * x * x + b * x * y + c * y * y + d * x + e * y + f
    }

    /// Discriminant B² − 4AC.
    pub fn discriminant(&self) -> f64 {
        let [a, b, c, ..] = self.0;
        b * b - 4.0 * a * c
    }

    /// Check whether the conic represents an ellipse (discriminant B²−4AC < 0).
    pub fn is_ellipse(&self) -> bool {
        self.discriminant() < 0.0
    }

    /// All six coefficients are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Convert to geometric ellipse parameters.
    pub fn to_geometry(&self) -> Result<EllipseGeometry, CalibError> {
        conic_to_geometry(self)
    }
}

// ── Ellipse utilities ──────────────────────────────────────────────────────

impl EllipseGeometry {
    /// Check basic validity: ordered positive semi-axes, finite values.
    pub fn is_valid(&self) -> bool {
        self.a >= self.b
            && self.b > 0.0
            && self.a.is_finite()
            && self.x0.is_finite()
            && self.y0.is_finite()
            && self.phi.is_finite()
    }

    /// Eccentricity `sqrt(1 - b²/a²)`.
    pub fn eccentricity(&self) -> f64 {
        let r = self.b / self.a;
        (1.0 - r * r).max(0.0).sqrt()
    }

    /// Convert back to conic coefficients.
    pub fn to_conic(&self) -> ConicCoeffs {
        ellipse_to_conic(self)
    }

    /// Sample `n` points on the ellipse boundary.
    pub fn sample_points(&self, n: usize) -> Vec<[f64; 2]> {
        let cos_p = self.phi.cos();
        let sin_p = self.phi.sin();
        (0..n)
            .map(|i| {
                let t = 2.0 * PI * (i as f64) / (n as f64);
                let px = self.a * t.cos();
                let py = self.b * t.sin();
                [
                    self.x0 + cos_p * px - sin_p * py,
                    self.y0 + sin_p * px + cos_p * py,
                ]
            })
            .collect()
    }

    /// Approximate geometric distance from a point to the ellipse boundary.
    /// Uses the algebraic distance divided by the gradient magnitude as a
    /// first-order approximation (Sampson distance).
    pub fn sampson_distance(&self, x: f64, y: f64) -> f64 {
        let c = self.to_conic();
        let [ca, cb, cc, cd, ce, _cf] = c.0;
        let alg = c.algebraic_distance(x, y);
        let gx = 2.0 * ca * x + cb * y + cd;
        let gy = cb * x + 2.0 * cc * y + ce;
        let grad_mag_sq = gx * gx + gy * gy;
        if grad_mag_sq < 1e-30 {
            return alg.abs();
        }
        alg.abs() / grad_mag_sq.sqrt()
    }
}

// ── Conversion: conic ↔ ellipse ────────────────────────────────────────────

/// Convert general conic coefficients to geometric ellipse parameters.
///
/// Uses the closed form for `a x² + 2b xy + c y² + 2d x + 2f y + g = 0`, so
/// B, D and E are halved first. Note the relabeling: the half-coefficient
/// called `f` below comes from E, and `g` is the constant term F.
pub fn conic_to_geometry(coeffs: &ConicCoeffs) -> Result<EllipseGeometry, CalibError> {
    let [ca, cb, cc, cd, ce, cf] = coeffs.0;
    let a = ca;
    let b = cb / 2.0;
    let c = cc;
    let d = cd / 2.0;
    let f = ce / 2.0;
    let g = cf;

    let den = b * b - a * c;
    if den >= 0.0 || den.is_nan() {
        return Err(CalibError::NotAnEllipse {
            discriminant: coeffs.discriminant(),
        });
    }

    let x0 = (c * d - b * f) / den;
    let y0 = (a * f - b * d) / den;

    let num = 2.0 * (a * f * f + c * d * d + g * b * b - 2.0 * b * d * f - a * c * g);
    let fac = ((a - c).powi(2) + 4.0 * b * b).sqrt();
    // Not sorted: `ap` lies along `phi` but is the minor axis when the
    // coefficients carry an overall negative sign.
    let ap = semi_axis(num / den / (fac - a - c))?;
    let bp = semi_axis(num / den / (-fac - a - c))?;

    let phi = if b == 0.0 {
        if a < c {
            0.0
        } else {
            FRAC_PI_2
        }
    } else {
        let half = (2.0 * b / (a - c)).atan() / 2.0;
        if a > c {
            half + FRAC_PI_2
        } else {
            half
        }
    };

    let (semi_a, semi_b, phi) = if ap >= bp {
        (ap, bp, phi)
    } else {
        (bp, ap, phi + FRAC_PI_2)
    };

    let geometry = EllipseGeometry {
        x0,
        y0,
        a: semi_a,
        b: semi_b,
        phi: normalize_angle(phi),
    };
    debug_assert!(geometry.is_valid(), "invalid geometry {:?}", geometry);
    Ok(geometry)
}

fn semi_axis(radicand: f64) -> Result<f64, CalibError> {
    if radicand > 0.0 && radicand.is_finite() {
        Ok(radicand.sqrt())
    } else {
        Err(Instability::NegativeRadicand { value: radicand }.into())
    }
}

/// Convert geometric ellipse parameters to general conic coefficients.
pub fn ellipse_to_conic(e: &EllipseGeometry) -> ConicCoeffs {
    let cos_p = e.phi.cos();
    let sin_p = e.phi.sin();
    let a2 = e.a * e.a;
    let b2 = e.b * e.b;

    let ca = cos_p * cos_p / a2 + sin_p * sin_p / b2;
    let cb = 2.0 * cos_p * sin_p * (1.0 / a2 - 1.0 / b2);
    let cc = sin_p * sin_p / a2 + cos_p * cos_p / b2;
    let cd = -2.0 * ca * e.x0 - cb * e.y0;
    let ce = -cb * e.x0 - 2.0 * cc * e.y0;
    let cf = ca * e.x0 * e.x0 + cb * e.x0 * e.y0 + cc * e.y0 * e.y0 - 1.0;

    ConicCoeffs([ca, cb, cc, cd, ce, cf])
}

/// Normalize angle to (−π/2, π/2].
pub(crate) fn normalize_angle(mut angle: f64) -> f64 {
    while angle > FRAC_PI_2 {
        angle -= PI;
    }
    while angle <= -FRAC_PI_2 {
        angle += PI;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relabeled_coefficients_axis_aligned() {
        // 4(x-2)² + 25(y+3)² = 100, major axis 5 along x.
        let c = ConicCoeffs([4.0, 0.0, 25.0, -16.0, 150.0, 141.0]);
        let e = c.to_geometry().expect("ellipse");
        assert_relative_eq!(e.x0, 2.0, epsilon = 1e-12);
        assert_relative_eq!(e.y0, -3.0, epsilon = 1e-12);
        assert_relative_eq!(e.a, 5.0, epsilon = 1e-12);
        assert_relative_eq!(e.b, 2.0, epsilon = 1e-12);
        assert_eq!(e.phi, 0.0);
    }

    #[test]
    fn relabeled_coefficients_vertical_major_axis() {
        // 25(x-2)² + 4(y+3)² = 100, major axis 5 along y.
        let c = ConicCoeffs([25.0, 0.0, 4.0, -100.0, 24.0, 36.0]);
        let e = c.to_geometry().expect("ellipse");
        assert_relative_eq!(e.x0, 2.0, epsilon = 1e-12);
        assert_relative_eq!(e.y0, -3.0, epsilon = 1e-12);
        assert_relative_eq!(e.a, 5.0, epsilon = 1e-12);
        assert_relative_eq!(e.b, 2.0, epsilon = 1e-12);
        assert_relative_eq!(e.phi, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn negated_coefficients_keep_major_axis_along_phi() {
        let c = ConicCoeffs([-4.0, 0.0, -25.0, 16.0, -150.0, -141.0]);
        let e = c.to_geometry().expect("ellipse");
        assert_relative_eq!(e.a, 5.0, epsilon = 1e-12);
        assert_relative_eq!(e.b, 2.0, epsilon = 1e-12);
        assert_relative_eq!(e.phi, 0.0, epsilon = 1e-12);
        assert_relative_eq!(e.x0, 2.0, epsilon = 1e-12);
        assert_relative_eq!(e.y0, -3.0, epsilon = 1e-12);
    }

    #[test]
    fn hyperbola_rejected() {
        let c = ConicCoeffs([1.0, 0.0, -1.0, 0.0, 0.0, -1.0]);
        match c.to_geometry() {
            Err(CalibError::NotAnEllipse { discriminant }) => {
                assert_relative_eq!(discriminant, 4.0)
            }
            other => panic!("expected NotAnEllipse, got {:?}", other),
        }
    }

    #[test]
    fn parabola_rejected() {
        // y = x²
        let c = ConicCoeffs([1.0, 0.0, 0.0, 0.0, -1.0, 0.0]);
        assert!(matches!(
            c.to_geometry(),
            Err(CalibError::NotAnEllipse { .. })
        ));
    }

    #[test]
    fn imaginary_ellipse_is_unstable_not_nan() {
        // x² + y² + 1 = 0 has no real points.
        let c = ConicCoeffs([1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        assert!(matches!(
            c.to_geometry(),
            Err(CalibError::NumericInstability(
                Instability::NegativeRadicand { .. }
            ))
        ));
    }

    #[test]
    fn rotated_roundtrip() {
        for &phi in &[0.3, -0.7, 1.0, FRAC_PI_2, std::f64::consts::FRAC_PI_4] {
            let e = EllipseGeometry {
                x0: 2.0,
                y0: -3.0,
                a: 5.0,
                b: 2.0,
                phi,
            };
            let back = e.to_conic().to_geometry().expect("ellipse");
            assert!(back.is_valid());
            assert_relative_eq!(back.x0, e.x0, epsilon = 1e-10);
            assert_relative_eq!(back.y0, e.y0, epsilon = 1e-10);
            assert_relative_eq!(back.a, e.a, epsilon = 1e-10);
            assert_relative_eq!(back.b, e.b, epsilon = 1e-10);
            assert_relative_eq!(back.phi, e.phi, epsilon = 1e-10);
        }
    }

    #[test]
    fn algebraic_distance_on_ellipse() {
        let e = EllipseGeometry {
            x0: 100.0,
            y0: 80.0,
            a: 30.0,
            b: 15.0,
            phi: 0.3,
        };
        let c = e.to_conic();
        assert!(c.is_ellipse());
        for &[x, y] in &e.sample_points(100) {
            assert!(c.algebraic_distance(x, y).abs() < 1e-10);
            assert!(e.sampson_distance(x, y) < 1e-8);
        }
        assert!(e.sampson_distance(e.x0, e.y0) > 1.0);
    }

    #[test]
    fn validity_requires_ordered_positive_axes() {
        let e = EllipseGeometry {
            x0: 1.0,
            y0: 2.0,
            a: 5.0,
            b: 2.0,
            phi: 0.3,
        };
        assert!(e.is_valid());
        assert!(EllipseGeometry { a: 5.0, b: 5.0, ..e }.is_valid());
        assert!(!EllipseGeometry { a: 2.0, b: 5.0, ..e }.is_valid());
        assert!(!EllipseGeometry { b: 0.0, ..e }.is_valid());
        assert!(!EllipseGeometry { a: f64::INFINITY, ..e }.is_valid());
        assert!(!EllipseGeometry { x0: f64::NAN, ..e }.is_valid());
        assert!(!EllipseGeometry { phi: f64::NAN, ..e }.is_valid());
    }

    #[test]
    fn eccentricity_of_circle_is_zero() {
        let e = EllipseGeometry {
            x0: 0.0,
            y0: 0.0,
            a: 3.0,
            b: 3.0,
            phi: 0.0,
        };
        assert_eq!(e.eccentricity(), 0.0);
        let e = EllipseGeometry { b: 1.8, ..e };
        assert_relative_eq!(e.eccentricity(), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn angle_normalization_range() {
        assert_relative_eq!(normalize_angle(PI), 0.0);
        assert_relative_eq!(normalize_angle(-FRAC_PI_2), FRAC_PI_2);
        assert_relative_eq!(normalize_angle(FRAC_PI_2), FRAC_PI_2);
        assert_relative_eq!(normalize_angle(2.5), 2.5 - PI);
    }
}
