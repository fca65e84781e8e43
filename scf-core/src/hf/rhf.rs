use nalgebra::DMatrix;

use crate::{
    atom::Atom,
    basis::BasisFunction,
    diis::Diis,
    error::{Error, Result},
    integrals::{DefaultIntegrator, ElectronTensor, Integrator},
};

use super::{utils, HartreeFockInput, InitialGuess};

/// Overlap eigenvalues below this mean the basis is linearly dependent.
const DEGENERACY_THRESHOLD: f64 = 1e-8;

/// Fraction of the density step applied each iteration.
const DENSITY_MIXING: f64 = 0.5;

/// The output of a restricted hartree fock calculation
#[derive(Debug)]
#[non_exhaustive]
pub struct RestrictedHartreeFockOutput {
    /// the orbital energies that were found in this hartree fock calculation, sorted in
    /// ascending order
    pub orbital_energies: Vec<f64>,
    /// the molecular orbital expansion coefficients, one column per orbital,
    /// in the same order as `orbital_energies`
    pub coefficients: DMatrix<f64>,
    /// the converged density matrix
    pub density: DMatrix<f64>,
    /// The electronic energy of the system
    pub electronic_energy: f64,
    /// The nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// After how many iterations did the system converge
    pub iterations: usize,
}

impl RestrictedHartreeFockOutput {
    pub fn total_energy(&self) -> f64 {
        self.electronic_energy + self.nuclear_repulsion
    }
}

pub fn restricted_hartree_fock(input: &HartreeFockInput) -> Result<RestrictedHartreeFockOutput> {
    // exchangable integrator
    let integrator = DefaultIntegrator::default();

    let basis = input.basis()?;
    let n_basis = basis.len();

    let n_electrons = input.n_electrons();
    if n_electrons % 2 != 0 {
        return Err(Error::NumericDomain(format!(
            "closed-shell RHF needs an even electron count (got {n_electrons})"
        )));
    }

    let nuclear_repulsion = input.molecule.nuclear_repulsion();
    log::debug!("nuclear repulsion energy: {nuclear_repulsion}");

    let overlap = compute_overlap_matrix(&basis, &integrator);
    log::debug!("overlap matrix: {overlap:0.4}");
    let kinetic = compute_kinetic_matrix(&basis, &integrator);
    log::debug!("kinetic matrix: {kinetic:0.4}");
    let nuclear = compute_nuclear_matrix(&basis, input.molecule.atoms(), &integrator);
    log::debug!("nuclear matrix: {nuclear:0.4}");
    let electron = ElectronTensor::from_basis(&basis, &integrator);

    let core_hamiltonian = kinetic + nuclear;
    let transform = compute_transformation_matrix(&overlap)?;

    let mut density = match &input.initial_guess {
        InitialGuess::CoreHamiltonian => {
            compute_core_density(&core_hamiltonian, &transform, n_basis, n_electrons)
        }
        InitialGuess::Density(density) => {
            if density.shape() != (n_basis, n_basis) {
                return Err(Error::NumericDomain(format!(
                    "initial density must be {n_basis}x{n_basis} (got {:?})",
                    density.shape()
                )));
            }
            density.clone()
        }
    };

    // coulomb minus half exchange, reused unchanged by every iteration
    let mut electron_terms = vec![0.0; n_basis.pow(4)];
    for (j, i, x, y) in itertools::iproduct!(0..n_basis, 0..n_basis, 0..n_basis, 0..n_basis) {
        electron_terms[j * n_basis.pow(3) + i * n_basis.pow(2) + y * n_basis + x] =
            electron[(i, j, x, y)] - 0.5 * electron[(i, x, j, y)];
    }

    // start of scf iteration
    let mut diis = Diis::new();
    let mut density_rms = f64::INFINITY;

    for iteration in 0..input.max_iterations {
        let electronic_hamiltonian =
            compute_electronic_hamiltonian(&density, &electron_terms, n_basis);

        let fock = &core_hamiltonian + &electronic_hamiltonian;
        let error = &fock * &density * &overlap - &overlap * &density * &fock;
        let fock = diis.fock(error, fock);

        let transformed_fock = &transform.transpose() * (&fock * &transform);
        let (transformed_coefficients, orbital_energies) = utils::sorted_eigs(transformed_fock);
        let coefficients = &transform * &transformed_coefficients;

        let new_density = compute_updated_density(&coefficients, n_basis, n_electrons);
        let density_change = new_density - &density;
        density += &density_change * DENSITY_MIXING;

        density_rms =
            (density_change.norm_squared() / (n_basis * n_basis) as f64).sqrt();

        let electronic_energy =
            0.5 * (&density * (2.0 * &core_hamiltonian + &electronic_hamiltonian)).trace();

        log::info!(
            "iteration {iteration:<4} - electronic energy {electronic_energy:1.4}. density rms {density_rms:1.4e}",
        );

        if density_rms < input.epsilon {
            // the energy must be evaluated with the fock matrix of the
            // converged density, not the one this iteration started from
            let electronic_hamiltonian =
                compute_electronic_hamiltonian(&density, &electron_terms, n_basis);
            let fock = &core_hamiltonian + &electronic_hamiltonian;
            let electronic_energy = 0.5 * (&density * (&core_hamiltonian + &fock)).trace();

            return Ok(RestrictedHartreeFockOutput {
                orbital_energies: orbital_energies.as_slice().to_vec(),
                coefficients,
                density,
                electronic_energy,
                nuclear_repulsion,
                iterations: iteration,
            });
        }
    }

    Err(Error::ScfNotConverged {
        max_iterations: input.max_iterations,
        density_rms,
    })
}

/// Closed-form density of a symmetric two-function closed-shell dimer. The
/// doubly occupied bonding orbital is fixed by symmetry, so the density
/// follows from the overlap alone: every entry is 1 / (1 + S01).
pub fn symmetric_dimer_density(overlap: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    if overlap.shape() != (2, 2) {
        return Err(Error::NumericDomain(format!(
            "the closed-form density only exists for a two-function basis, got {}x{}",
            overlap.nrows(),
            overlap.ncols()
        )));
    }

    Ok(DMatrix::from_element(2, 2, (1.0 + overlap[(0, 1)]).recip()))
}

pub fn compute_overlap_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Item = BasisFunction>,
) -> DMatrix<f64> {
    utils::symmetric_matrix(basis.len(), |i, j| {
        let overlap_ij = integrator.overlap((&basis[i], &basis[j]));
        log::trace!("overlap ({i}{j}) = {overlap_ij}");
        overlap_ij
    })
}

pub fn compute_kinetic_matrix(
    basis: &[BasisFunction],
    integrator: &impl Integrator<Item = BasisFunction>,
) -> DMatrix<f64> {
    utils::symmetric_matrix(basis.len(), |i, j| {
        let kinetic_ij = integrator.kinetic((&basis[i], &basis[j]));
        log::trace!("kinetic ({i}{j}) = {kinetic_ij}");
        kinetic_ij
    })
}

pub fn compute_nuclear_matrix(
    basis: &[BasisFunction],
    nuclei: &[Atom],
    integrator: &impl Integrator<Item = BasisFunction>,
) -> DMatrix<f64> {
    utils::symmetric_matrix(basis.len(), |i, j| {
        let nuclear_ij = integrator.nuclear((&basis[i], &basis[j]), nuclei);
        log::trace!("nuclear ({i}{j}) = {nuclear_ij}");
        nuclear_ij
    })
}

/// Symmetric orthogonalization X = S^(-1/2). Fails with [`Error::DegenerateBasis`]
/// when the overlap has a near-zero eigenvalue.
fn compute_transformation_matrix(overlap: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let (u, _) = utils::eigs(overlap.clone());
    let diagonal_matrix = &u.transpose() * (overlap * &u);

    let smallest_eigenvalue = diagonal_matrix.diagonal().min();
    if smallest_eigenvalue < DEGENERACY_THRESHOLD {
        return Err(Error::DegenerateBasis {
            smallest_eigenvalue,
        });
    }

    let diagonal_inv_sqrt =
        DMatrix::from_diagonal(&diagonal_matrix.map_diagonal(|f| f.sqrt().recip()));
    Ok(&u * (diagonal_inv_sqrt * &u.transpose()))
}

/// Initial guess from the orbitals of the core hamiltonian alone.
fn compute_core_density(
    core_hamiltonian: &DMatrix<f64>,
    transform: &DMatrix<f64>,
    n_basis: usize,
    n_electrons: usize,
) -> DMatrix<f64> {
    let transformed = &transform.transpose() * (core_hamiltonian * transform);
    let (coeffs_prime, _orbital_energies) = utils::sorted_eigs(transformed);
    let coeffs = transform * coeffs_prime;

    compute_updated_density(&coeffs, n_basis, n_electrons)
}

fn compute_electronic_hamiltonian(
    density: &DMatrix<f64>,
    electron_terms: &[f64],
    n_basis: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for y in 0..n_basis {
            for x in 0..n_basis {
                sum += density[(x, y)]
                    * electron_terms[j * n_basis.pow(3) + i * n_basis.pow(2) + y * n_basis + x];
            }
        }
        sum
    })
}

fn compute_updated_density(
    coefficients: &DMatrix<f64>,
    n_basis: usize,
    n_electrons: usize,
) -> DMatrix<f64> {
    utils::symmetric_matrix(n_basis, |i, j| {
        let mut sum = 0.0;
        for k in 0..n_electrons / 2 {
            sum += coefficients[(i, k)] * coefficients[(j, k)]
        }
        2.0 * sum
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::{
        atom::Atom,
        basis::BasisSet,
        config::ConfigBasisSet,
        error::Error,
        hf::{restricted_hartree_fock, HartreeFockInput, InitialGuess},
        integrals::DefaultIntegrator,
        molecule::Molecule,
    };

    use super::{compute_overlap_matrix, symmetric_dimer_density};

    const STO_3G_HYDROGEN: &str = r#"{
        "elements": {
            "1": {
                "shells": [{
                    "exponents": [3.42525091, 0.62391373, 0.16885540],
                    "coefficients": [0.15432897, 0.53532814, 0.44463454]
                }]
            }
        }
    }"#;

    // the same contraction listed twice, which makes the overlap singular
    const STO_3G_HYDROGEN_DUPLICATED: &str = r#"{
        "elements": {
            "1": {
                "shells": [{
                    "exponents": [3.42525091, 0.62391373, 0.16885540],
                    "coefficients": [0.15432897, 0.53532814, 0.44463454]
                }, {
                    "exponents": [3.42525091, 0.62391373, 0.16885540],
                    "coefficients": [0.15432897, 0.53532814, 0.44463454]
                }]
            }
        }
    }"#;

    fn sto_3g(definition: &str) -> BasisSet {
        let config: ConfigBasisSet = serde_json::from_str(definition).unwrap();
        BasisSet::try_from(config).unwrap()
    }

    fn hydrogen_molecule(bond_length: f64) -> Molecule {
        Molecule::new(vec![
            Atom {
                charge: 1,
                position: Vector3::zeros(),
            },
            Atom {
                charge: 1,
                position: Vector3::new(0.0, 0.0, bond_length),
            },
        ])
        .unwrap()
    }

    #[test]
    fn hydrogen_sto_3g() {
        let molecule = hydrogen_molecule(1.4);
        let basis_set = sto_3g(STO_3G_HYDROGEN);

        let output = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 100,
            epsilon: 1e-6,
        })
        .unwrap();

        assert_relative_eq!(output.electronic_energy, -1.8310, epsilon = 1e-3);
        assert_relative_eq!(output.nuclear_repulsion, 1.0 / 1.4, epsilon = 1e-12);
        assert_relative_eq!(output.total_energy(), -1.1167, epsilon = 1e-3);
        assert!(output.orbital_energies[0] < 0.0);
        assert!(output.orbital_energies[0] < output.orbital_energies[1]);
    }

    #[test]
    fn density_traces_to_electron_count() {
        let molecule = hydrogen_molecule(1.4);
        let basis_set = sto_3g(STO_3G_HYDROGEN);
        let input = HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 100,
            epsilon: 1e-8,
        };

        let output = restricted_hartree_fock(&input).unwrap();
        let overlap = compute_overlap_matrix(&input.basis().unwrap(), &DefaultIntegrator::default());

        assert_relative_eq!((&output.density * &overlap).trace(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn converged_density_is_a_fixed_point() {
        let molecule = hydrogen_molecule(1.4);
        let basis_set = sto_3g(STO_3G_HYDROGEN);

        let first = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 100,
            epsilon: 1e-8,
        })
        .unwrap();

        let second = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::Density(first.density.clone()),
            max_iterations: 100,
            epsilon: 1e-6,
        })
        .unwrap();

        assert!(second.iterations <= 1);
        assert_relative_eq!(
            second.electronic_energy,
            first.electronic_energy,
            epsilon = 1e-8
        );
    }

    #[test]
    fn analytic_dimer_density_matches_the_iterative_path() {
        let molecule = hydrogen_molecule(1.4);
        let basis_set = sto_3g(STO_3G_HYDROGEN);
        let input = HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 100,
            epsilon: 1e-8,
        };

        let overlap = compute_overlap_matrix(&input.basis().unwrap(), &DefaultIntegrator::default());
        let analytic = symmetric_dimer_density(&overlap).unwrap();

        let converged = restricted_hartree_fock(&input).unwrap().density;
        for (i, j) in itertools::iproduct!(0..2, 0..2) {
            assert_relative_eq!(analytic[(i, j)], converged[(i, j)], epsilon = 1e-5);
        }

        // seeding with the analytic density converges immediately
        let seeded = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::Density(analytic),
            max_iterations: 100,
            epsilon: 1e-6,
        })
        .unwrap();
        assert!(seeded.iterations <= 1);
    }

    #[test]
    fn analytic_dimer_density_rejects_larger_bases() {
        let overlap = nalgebra::DMatrix::identity(3, 3);
        assert!(matches!(
            symmetric_dimer_density(&overlap),
            Err(Error::NumericDomain(_))
        ));
    }

    #[test]
    fn duplicated_basis_function_is_degenerate() {
        let molecule = hydrogen_molecule(1.4);
        let basis_set = sto_3g(STO_3G_HYDROGEN_DUPLICATED);

        let result = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 100,
            epsilon: 1e-6,
        });

        assert!(matches!(result, Err(Error::DegenerateBasis { .. })));
    }

    #[test]
    fn iteration_cap_is_reported() {
        let molecule = hydrogen_molecule(1.4);
        let basis_set = sto_3g(STO_3G_HYDROGEN);

        let result = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 3,
            // an epsilon the density rms can never drop below
            epsilon: 0.0,
        });

        assert!(matches!(
            result,
            Err(Error::ScfNotConverged {
                max_iterations: 3,
                ..
            })
        ));
    }

    #[test]
    fn odd_electron_count_is_rejected() {
        let molecule = Molecule::new(vec![Atom {
            charge: 1,
            position: Vector3::zeros(),
        }])
        .unwrap();
        let basis_set = sto_3g(STO_3G_HYDROGEN);

        let result = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 100,
            epsilon: 1e-6,
        });

        assert!(matches!(result, Err(Error::NumericDomain(_))));
    }

    #[test]
    fn missing_element_basis_is_rejected() {
        let molecule = Molecule::new(vec![
            Atom {
                charge: 2,
                position: Vector3::zeros(),
            },
            Atom {
                charge: 2,
                position: Vector3::new(0.0, 0.0, 2.0),
            },
        ])
        .unwrap();
        let basis_set = sto_3g(STO_3G_HYDROGEN);

        let result = restricted_hartree_fock(&HartreeFockInput {
            molecule: &molecule,
            basis_set: &basis_set,
            initial_guess: InitialGuess::CoreHamiltonian,
            max_iterations: 100,
            epsilon: 1e-6,
        });

        assert!(matches!(result, Err(Error::InvalidBasisDefinition(_))));
    }
}
