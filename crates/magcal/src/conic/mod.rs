//! Ellipse / conic fitting primitives.
//!
//! Implements:
//! - Direct least-squares conic fit (Halir & Flusser, "Numerically Stable
//!   Direct Least Squares Fitting of Ellipses", 1998).
//! - Conversion between general conic coefficients and geometric ellipse parameters.
//! - Sampson residual computation for fit-quality reporting.

mod eigen;
mod fit;
mod types;

pub use fit::{fit_conic, fit_ellipse, rms_sampson_distance, MIN_POINTS};
pub use types::{conic_to_geometry, ellipse_to_conic, ConicCoeffs, EllipseGeometry};
