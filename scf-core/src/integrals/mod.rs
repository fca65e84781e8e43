pub mod electron_tensor;
pub mod stype;

pub use electron_tensor::ElectronTensor;
pub use stype::SType;

use crate::atom::Atom;

pub type DefaultIntegrator = SType;

/// The seam between matrix assembly and a concrete integral scheme.
///
/// `Sync` so the electron tensor can evaluate integrals from worker threads.
pub trait Integrator: Sync {
    type Item;

    fn overlap(&self, functions: (&Self::Item, &Self::Item)) -> f64;

    fn kinetic(&self, functions: (&Self::Item, &Self::Item)) -> f64;

    fn nuclear(&self, functions: (&Self::Item, &Self::Item), nuclei: &[Atom]) -> f64;

    fn electron_repulsion(
        &self,
        functions: (&Self::Item, &Self::Item, &Self::Item, &Self::Item),
    ) -> f64;
}
