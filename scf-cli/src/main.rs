use std::{fs::File, path::PathBuf, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use scf_core::{
    basis::BasisSet,
    config::{ConfigBasisSet, ConfigMolecule},
    hf::{restricted_hartree_fock, HartreeFockInput, InitialGuess},
    molecule::Molecule,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: ScfCommand,
}

#[derive(Subcommand, Debug)]
enum ScfCommand {
    #[command(name = "rhf")]
    RestrictedHartreeFock {
        /// What basis set to use for the hartree fock calculation
        #[arg(long, short)]
        basis_set: PathBuf,
        /// A path to the molecule to perform the calculation on
        #[arg(long, short)]
        molecule: PathBuf,
        /// The maximum number of iterations the SCF loop should attempt before the
        /// system is considered to not converge
        #[arg(long, default_value_t = 100)]
        max_iterations: usize,
        /// if the rms of the density matrix drops below this, the system is considered
        /// converged
        #[arg(long, default_value_t = 1e-6)]
        epsilon: f64,
    },
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args: Args = Args::parse();

    match args.command {
        ScfCommand::RestrictedHartreeFock {
            basis_set,
            molecule,
            max_iterations,
            epsilon,
        } => {
            let basis_set: ConfigBasisSet = serde_json::from_reader(
                File::open(&basis_set)
                    .with_context(|| format!("opening basis set {}", basis_set.display()))?,
            )?;
            let basis_set = BasisSet::try_from(basis_set)?;

            let molecule: ConfigMolecule = serde_json::from_reader(
                File::open(&molecule)
                    .with_context(|| format!("opening molecule {}", molecule.display()))?,
            )?;
            let molecule = Molecule::try_from(molecule)?;

            let start = Instant::now();
            let output = restricted_hartree_fock(&HartreeFockInput {
                molecule: &molecule,
                basis_set: &basis_set,
                initial_guess: InitialGuess::CoreHamiltonian,
                max_iterations,
                epsilon,
            })?;

            log::debug!("converged density matrix: {:0.6}", output.density);

            println!(
                "hartree fock converged after {} iterations and {:0.2?}",
                output.iterations,
                start.elapsed()
            );
            println!("electronic energy: {:3.4}", output.electronic_energy);
            println!("nuclear repulsion energy: {:3.4}", output.nuclear_repulsion);
            println!("hartree fock energy: {:3.4}", output.total_energy());
            println!("orbital energies: {:3.4?}", output.orbital_energies);
        }
    }

    Ok(())
}
