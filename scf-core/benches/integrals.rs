use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use scf_core::{
    basis::{BasisFunction, ContractedGaussian},
    hf::rhf::{compute_kinetic_matrix, compute_overlap_matrix},
    integrals::{DefaultIntegrator, ElectronTensor},
};

const S_COEFFICIENTS: [f64; 3] = [0.15432897, 0.53532814, 0.44463454];
const HYDROGEN_EXPONENTS: [f64; 3] = [3.42525091, 0.62391373, 0.16885540];
const HELIUM_EXPONENTS: [f64; 3] = [6.36242139, 1.15892300, 0.31364979];

fn place(exponents: &[f64], position: Vector3<f64>) -> BasisFunction {
    BasisFunction {
        contracted_gaussian: ContractedGaussian::contracted(exponents, &S_COEFFICIENTS).unwrap(),
        position,
    }
}

fn hydrogen_basis() -> Vec<BasisFunction> {
    vec![
        place(&HYDROGEN_EXPONENTS, Vector3::zeros()),
        place(&HYDROGEN_EXPONENTS, Vector3::new(0.0, 0.0, 1.4)),
    ]
}

fn helium_hydride_basis() -> Vec<BasisFunction> {
    vec![
        place(&HELIUM_EXPONENTS, Vector3::zeros()),
        place(&HYDROGEN_EXPONENTS, Vector3::new(0.0, 0.0, 1.4632)),
    ]
}

fn bench_integrals(c: &mut Criterion) {
    let integrator = DefaultIntegrator::default();

    for (name, basis) in [("H2", hydrogen_basis()), ("HeH+", helium_hydride_basis())] {
        c.bench_function(&format!("Overlap {name}"), |b| {
            b.iter(|| compute_overlap_matrix(&basis, &integrator))
        });

        c.bench_function(&format!("Kinetic {name}"), |b| {
            b.iter(|| compute_kinetic_matrix(&basis, &integrator))
        });

        c.bench_function(&format!("Electron Repulsion {name}"), |b| {
            b.iter(|| ElectronTensor::from_basis(&basis, &integrator))
        });
    }
}

criterion_group!(benches, bench_integrals);
criterion_main!(benches);
