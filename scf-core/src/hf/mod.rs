pub mod rhf;
pub(super) mod utils;

pub use rhf::{restricted_hartree_fock, RestrictedHartreeFockOutput};

use nalgebra::DMatrix;

use crate::{
    basis::{BasisFunction, BasisSet},
    error::{Error, Result},
    molecule::Molecule,
};

/// How to seed the density matrix before the first iteration.
#[derive(Clone, Debug, Default)]
pub enum InitialGuess {
    /// Diagonalize the core hamiltonian in the orthogonalized basis.
    #[default]
    CoreHamiltonian,
    /// Start from a caller-supplied density matrix, for example a converged
    /// one or the closed-form symmetric-dimer density.
    Density(DMatrix<f64>),
}

/// The input to a hartree fock calculation
pub struct HartreeFockInput<'a> {
    /// the molecule to run hartree fock for
    pub molecule: &'a Molecule,
    /// what basis set to use
    pub basis_set: &'a BasisSet,
    /// how to seed the density matrix
    pub initial_guess: InitialGuess,
    /// the maximum number of iterations to try
    pub max_iterations: usize,
    /// the smallest number that isn't treated as zero. For example, if the density
    /// matrix rms changes by less than this, the system is considered converged.
    pub epsilon: f64,
}

impl HartreeFockInput<'_> {
    /// Flattens the basis set over the molecule's atoms. The resulting order
    /// is the one indexing every matrix and the two-electron tensor.
    pub(crate) fn basis(&self) -> Result<Vec<BasisFunction>> {
        let mut basis = Vec::new();

        for atom in self.molecule.atoms() {
            let atomic_basis = self.basis_set.for_atom(atom).ok_or_else(|| {
                Error::InvalidBasisDefinition(format!(
                    "no basis for element with charge {}",
                    atom.charge
                ))
            })?;

            basis.extend(
                atomic_basis
                    .basis_functions()
                    .map(|contracted| BasisFunction {
                        contracted_gaussian: contracted.clone(),
                        position: atom.position,
                    }),
            );
        }

        Ok(basis)
    }

    /// Returns the number of total electrons in the system
    pub(crate) fn n_electrons(&self) -> usize {
        self.molecule.n_electrons()
    }
}
