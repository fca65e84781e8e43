use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    basis::{AtomicBasis, BasisSet, ContractedGaussian},
    error::{Error, Result},
};

/// A basis set in a config file: per-element lists of s-type contractions,
/// keyed by nuclear charge number.
#[derive(Deserialize)]
pub struct ConfigBasisSet {
    elements: HashMap<u32, ConfigAtomicBasis>,
}

#[derive(Deserialize)]
struct ConfigAtomicBasis {
    shells: Vec<ConfigShell>,
}

#[derive(Deserialize)]
struct ConfigShell {
    exponents: Vec<f64>,
    coefficients: Vec<f64>,
}

impl TryFrom<ConfigBasisSet> for BasisSet {
    type Error = Error;

    fn try_from(value: ConfigBasisSet) -> Result<BasisSet> {
        let mut atomic_mapping = HashMap::with_capacity(value.elements.len());

        for (element, configuration) in value.elements {
            let mut functions = Vec::with_capacity(configuration.shells.len());

            for shell in &configuration.shells {
                functions
                    .push(ContractedGaussian::contracted(&shell.exponents, &shell.coefficients)?);
            }

            atomic_mapping.insert(element, AtomicBasis { functions });
        }

        Ok(BasisSet::new(atomic_mapping))
    }
}
