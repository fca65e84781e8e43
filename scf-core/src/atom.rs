use nalgebra::Vector3;

/// Represents a nucleus in a molecule: a charge number and a position in bohr.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Atom {
    pub charge: u32,
    pub position: Vector3<f64>,
}

impl Atom {
    /// Returns the charge of this nucleus
    pub fn nuclear_charge(&self) -> f64 {
        self.charge as f64
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }
}
