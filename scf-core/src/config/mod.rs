mod basis_set;
mod molecule;

pub use basis_set::ConfigBasisSet;
pub use molecule::ConfigMolecule;
