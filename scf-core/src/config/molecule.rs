use nalgebra::Vector3;
use serde::Deserialize;

use crate::{
    atom::Atom,
    error::{Error, Result},
    molecule::Molecule,
};

/// Represents a full molecule in a config file.
/// A molecule is just a list of positioned nuclei.
#[derive(Deserialize)]
pub struct ConfigMolecule(Vec<ConfigAtom>);

#[derive(Deserialize)]
struct ConfigAtom {
    charge: u32,
    position: Vec<f64>,
}

impl TryFrom<ConfigMolecule> for Molecule {
    type Error = Error;

    fn try_from(value: ConfigMolecule) -> Result<Molecule> {
        let ConfigMolecule(config_atoms) = value;

        let mut atoms = Vec::with_capacity(config_atoms.len());

        for atom in config_atoms {
            let &[x, y, z] = atom.position.as_slice() else {
                return Err(Error::InvalidBasisDefinition(format!(
                    "atom position needs x, y, z coordinates (got {} values)",
                    atom.position.len()
                )));
            };

            atoms.push(Atom {
                charge: atom.charge,
                position: Vector3::new(x, y, z),
            });
        }

        Molecule::new(atoms)
    }
}
