//! Error type shared by every calibration stage.

/// Numerical failure modes that make a fit untrustworthy.
#[derive(Debug, Clone, PartialEq)]
pub enum Instability {
    /// The constrained eigensystem produced an eigenvalue whose imaginary
    /// part is not negligible relative to the spectrum.
    ComplexEigenvalue {
        /// Real part of the offending eigenvalue.
        re: f64,
        /// Imaginary part of the offending eigenvalue.
        im: f64,
    },
    /// Real Schur decomposition did not converge.
    EigenSolverDiverged,
    /// A semi-axis radicand was not strictly positive (imaginary or point ellipse).
    NegativeRadicand {
        /// The radicand that was rejected.
        value: f64,
    },
    /// Fitted coefficients contain NaN or infinity.
    NonFinite,
}

impl std::fmt::Display for Instability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ComplexEigenvalue { re, im } => {
                write!(f, "complex eigenvalue {} {:+}i", re, im)
            }
            Self::EigenSolverDiverged => write!(f, "eigen solver did not converge"),
            Self::NegativeRadicand { value } => {
                write!(f, "semi-axis radicand is not positive: {}", value)
            }
            Self::NonFinite => write!(f, "non-finite conic coefficients"),
        }
    }
}

/// Errors returned by the calibration pipeline.
///
/// Every variant is terminal for the current batch: the caller must supply
/// a different sample set rather than retry.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibError {
    /// Too few samples for a stable fit.
    TooFewPoints {
        /// Required minimum number of points.
        needed: usize,
        /// Provided number of points.
        got: usize,
    },
    /// The x and y columns differ in length.
    ColumnLengthMismatch {
        /// Length of the x column.
        x_len: usize,
        /// Length of the y column.
        y_len: usize,
    },
    /// A sample contains NaN or infinity.
    NonFiniteSample {
        /// Index of the offending sample.
        index: usize,
    },
    /// The linear-term scatter block is not invertible (collinear or
    /// coincident samples).
    SingularScatter {
        /// Reciprocal condition number of the block.
        rcond: f64,
    },
    /// No eigenvector of the constrained system satisfies `4ac - b² > 0`.
    DegenerateFit {
        /// Number of real eigenpairs that were examined.
        candidates: usize,
    },
    /// The conic is a parabola or hyperbola.
    NotAnEllipse {
        /// Discriminant `b² - 4ac` of the rejected conic.
        discriminant: f64,
    },
    /// The computation became numerically unreliable.
    NumericInstability(Instability),
}

impl std::fmt::Display for CalibError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewPoints { needed, got } => {
                write!(f, "too few points: need {}, got {}", needed, got)
            }
            Self::ColumnLengthMismatch { x_len, y_len } => {
                write!(f, "column length mismatch: x has {}, y has {}", x_len, y_len)
            }
            Self::NonFiniteSample { index } => write!(f, "non-finite sample at index {}", index),
            Self::SingularScatter { rcond } => {
                write!(f, "singular linear scatter matrix (rcond = {:e})", rcond)
            }
            Self::DegenerateFit { candidates } => write!(
                f,
                "no ellipse-consistent eigenvector among {} candidates",
                candidates
            ),
            Self::NotAnEllipse { discriminant } => write!(
                f,
                "conic is not an ellipse: b^2 - 4ac = {} must be negative",
                discriminant
            ),
            Self::NumericInstability(inner) => write!(f, "numeric instability: {}", inner),
        }
    }
}

impl std::error::Error for CalibError {}

impl From<Instability> for CalibError {
    fn from(inner: Instability) -> Self {
        Self::NumericInstability(inner)
    }
}
