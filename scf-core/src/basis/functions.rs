use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Primitive s-type gaussian `c * exp(-alpha * r^2)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gaussian {
    pub exponent: f64,
    /// The contraction coefficient with the primitive normalization folded in
    pub coefficient: f64,
}

impl Gaussian {
    /// Normalization constant `(2 alpha / pi)^(3/4)` of a primitive s-type
    /// gaussian, so the normalized self-overlap is exactly one.
    pub fn norm(exponent: f64) -> f64 {
        (std::f64::consts::FRAC_2_PI * exponent)
            .powi(3)
            .sqrt()
            .sqrt()
    }
}

/// Linear combination of many [`Gaussian`]s sharing one center
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContractedGaussian(pub SmallVec<[Gaussian; 6]>);

impl ContractedGaussian {
    /// Builds a contraction from raw exponent/coefficient lists, folding the
    /// primitive normalization into each coefficient.
    pub fn contracted(exponents: &[f64], coefficients: &[f64]) -> Result<Self> {
        if exponents.is_empty() || exponents.len() != coefficients.len() {
            return Err(Error::InvalidBasisDefinition(format!(
                "contraction needs matching non-empty exponent/coefficient lists (got {} exponents, {} coefficients)",
                exponents.len(),
                coefficients.len()
            )));
        }

        let mut primitives = SmallVec::with_capacity(exponents.len());
        for (&exponent, &coefficient) in exponents.iter().zip(coefficients) {
            if exponent <= 0.0 {
                return Err(Error::NumericDomain(format!(
                    "primitive exponent must be positive (got {exponent})"
                )));
            }

            primitives.push(Gaussian {
                exponent,
                coefficient: coefficient * Gaussian::norm(exponent),
            });
        }

        Ok(Self(primitives))
    }
}

/// A [`ContractedGaussian`] placed on a nucleus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasisFunction {
    pub contracted_gaussian: ContractedGaussian,
    /// The position of this basis function, in bohr
    pub position: Vector3<f64>,
}

impl BasisFunction {
    pub(crate) fn primitives(&self) -> &[Gaussian] {
        &self.contracted_gaussian.0
    }
}
