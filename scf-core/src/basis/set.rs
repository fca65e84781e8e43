use std::collections::HashMap;

use crate::atom::Atom;

use super::ContractedGaussian;

/// Maps nuclear charge numbers to the basis functions placed on such a nucleus.
#[derive(Debug)]
pub struct BasisSet {
    atomic_mapping: HashMap<u32, AtomicBasis>,
}

impl BasisSet {
    /// Returns the basis of a given atom, if it exists.
    pub fn for_atom(&self, atom: &Atom) -> Option<&AtomicBasis> {
        self.atomic_mapping.get(&atom.charge)
    }

    /// Create a new basis set given mappings from charge number to the basis
    /// of that element
    pub(crate) fn new(atomic_mapping: HashMap<u32, AtomicBasis>) -> Self {
        Self { atomic_mapping }
    }
}

/// Represents the basis functions for a single atom.
#[derive(Debug)]
pub struct AtomicBasis {
    pub(crate) functions: Vec<ContractedGaussian>,
}

impl AtomicBasis {
    pub fn basis_functions(&self) -> impl Iterator<Item = &ContractedGaussian> {
        self.functions.iter()
    }
}
