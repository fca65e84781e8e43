use nalgebra::{DMatrix, DVector};
use std::collections::VecDeque;

struct Sample {
    error: DMatrix<f64>,
    fock: DMatrix<f64>,
}

/// Pulay DIIS: extrapolates the Fock matrix from the commutator errors of
/// recent iterations to damp SCF oscillations.
pub(crate) struct Diis {
    previous_samples: VecDeque<Sample>,
}

impl Diis {
    const MAX_SAMPLES: usize = 12;
    const MIN_SAMPLES: usize = 5;
    /// Below this error norm the extrapolation system is numerically singular.
    const ERROR_FLOOR: f64 = 1e-10;

    pub fn new() -> Self {
        Self {
            previous_samples: VecDeque::new(),
        }
    }

    /// Returns the extrapolated Fock matrix. While too few samples are stored,
    /// or when the extrapolation system is singular, this falls back to the
    /// raw Fock matrix of the current iteration.
    pub fn fock(&mut self, error: DMatrix<f64>, fock: DMatrix<f64>) -> DMatrix<f64> {
        self.previous_samples.push_front(Sample { error, fock });
        self.previous_samples.truncate(Self::MAX_SAMPLES);

        let n = self.previous_samples.len();
        if n < Self::MIN_SAMPLES || self.previous_samples[0].error.norm() < Self::ERROR_FLOOR {
            return self.previous_samples[0].fock.clone();
        }

        let matrix = DMatrix::from_fn(n + 1, n + 1, |i, j| match (i, j) {
            (i, j) if i == n && j == n => 0.0,
            (i, j) if i == n || j == n => 1.0,
            _ => self.previous_samples[j]
                .error
                .dot(&self.previous_samples[i].error),
        });

        let b = DVector::from_fn(n + 1, |i, _| if i == n { 1.0 } else { 0.0 });

        match matrix.qr().solve(&b) {
            Some(solution) => solution
                .iter()
                .enumerate()
                .take(n)
                .map(|(i, &x)| x * &self.previous_samples[i].fock)
                .sum(),
            None => self.previous_samples[0].fock.clone(),
        }
    }
}
