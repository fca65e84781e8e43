use thiserror::Error;

/// Error type for the integral/SCF pipeline.
///
/// Everything here is detected before or during the SCF loop and handed back
/// to the caller; no variant is ever turned into a NaN energy. Zero-separation
/// geometries inside the integral formulas are *not* errors - they take the
/// analytic limit path instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The overlap matrix is singular or near-singular, so the basis cannot
    /// be orthogonalized.
    #[error("degenerate basis: smallest overlap eigenvalue {smallest_eigenvalue:.3e}")]
    DegenerateBasis { smallest_eigenvalue: f64 },
    /// The iteration cap was reached before the density settled.
    #[error("SCF did not converge within {max_iterations} iterations (last density rms {density_rms:.3e})")]
    ScfNotConverged {
        max_iterations: usize,
        density_rms: f64,
    },
    /// A contraction or basis mapping is structurally malformed.
    #[error("invalid basis definition: {0}")]
    InvalidBasisDefinition(String),
    /// A numeric input is outside the domain the formulas are defined on.
    #[error("numeric domain error: {0}")]
    NumericDomain(String),
}

pub type Result<T> = std::result::Result<T, Error>;
