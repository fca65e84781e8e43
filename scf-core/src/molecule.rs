use crate::atom::Atom;
use crate::error::{Error, Result};

/// Represents a molecule
#[derive(Debug)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
}

impl Molecule {
    /// A molecule is a non-empty list of nuclei with positive charges.
    pub fn new(atoms: Vec<Atom>) -> Result<Self> {
        if atoms.is_empty() {
            return Err(Error::InvalidBasisDefinition(
                "molecule needs at least one atom".to_string(),
            ));
        }

        if let Some(atom) = atoms.iter().find(|atom| atom.charge == 0) {
            return Err(Error::NumericDomain(format!(
                "nuclear charge must be positive (atom at {:?})",
                atom.position
            )));
        }

        Ok(Self { atoms })
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Electron count of the neutral molecule.
    pub fn n_electrons(&self) -> usize {
        self.atoms.iter().map(|atom| atom.charge as usize).sum()
    }

    /// Pairwise Z_a * Z_b / R_ab repulsion between the nuclei.
    pub fn nuclear_repulsion(&self) -> f64 {
        let n_atoms = self.atoms.len();

        let mut potential = 0.0;
        for atom_a in 0..n_atoms {
            for atom_b in atom_a + 1..n_atoms {
                potential += self.atoms[atom_a].nuclear_charge()
                    * self.atoms[atom_b].nuclear_charge()
                    / (self.atoms[atom_b].position - self.atoms[atom_a].position).norm()
            }
        }
        potential
    }
}
