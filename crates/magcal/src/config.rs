//! Fit configuration.

use std::path::Path;

/// Numerical knobs of the ellipse fitter.
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Minimum number of samples accepted by the fitter.
    pub min_points: usize,
    /// Shift samples to their centroid and scale to mean distance √2 before
    /// building the scatter matrices.
    pub normalize: bool,
    /// Reciprocal condition number below which the linear scatter block is
    /// treated as singular.
    pub scatter_rcond_min: f64,
    /// Largest tolerated `|Im λ|` relative to the largest eigenvalue modulus.
    pub max_imag_rel: f64,
    /// Iteration cap for the real Schur decomposition.
    pub schur_max_iters: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_points: 6,
            normalize: true,
            scatter_rcond_min: 1e-12,
            max_imag_rel: 1e-6,
            schur_max_iters: 200,
        }
    }
}

impl FitConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        Ok(config)
    }
}
