//! magcal — hard/soft-iron calibration for 2-axis magnetometers.
//!
//! Raw readings of a magnetometer rotated in a plane trace an offset,
//! rotated, stretched ellipse instead of a circle centred on the origin.
//! The pipeline stages are:
//!
//! 1. **Fit** – direct least-squares conic fit with an ellipse-specific
//!    constraint ([`fit_conic`]).
//! 2. **Geometry** – conic coefficients to center, semi-axes and rotation
//!    ([`ConicCoeffs::to_geometry`]).
//! 3. **Transform** – offset plus a correction matrix that shrinks the major
//!    axis onto the minor axis ([`CalibrationTransform::from_geometry`]).
//! 4. **Correct** – apply the transform to samples ([`correct_points`]).
//!
//! [`calibrate`] runs all four stages. Every stage is a pure function of its
//! inputs, so each can be used on its own.
//!
//! # Examples
//!
//! ```
//! use magcal::{calibrate, EllipseGeometry, FitConfig, PointSet};
//!
//! let truth = EllipseGeometry { x0: 2.0, y0: -3.0, a: 5.0, b: 2.0, phi: 0.5 };
//! let samples = PointSet::new(truth.sample_points(64)).unwrap();
//! let cal = calibrate(&samples, &FitConfig::default()).unwrap();
//! assert!((cal.geometry.b - 2.0).abs() < 1e-6);
//! ```

mod config;
mod conic;
mod correct;
mod error;
mod pipeline;
mod points;
mod transform;

pub use config::FitConfig;
pub use conic::{
    conic_to_geometry, ellipse_to_conic, fit_conic, fit_ellipse, rms_sampson_distance,
    ConicCoeffs, EllipseGeometry, MIN_POINTS,
};
pub use correct::{correct_points, correct_slice, RadiusStats};
pub use error::{CalibError, Instability};
pub use pipeline::{calibrate, Calibration, FitQuality};
pub use points::PointSet;
pub use transform::CalibrationTransform;
