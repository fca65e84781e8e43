use std::ops::Index;

use crate::basis::BasisFunction;

use super::Integrator;

/// Canonical index into the two-electron tensor.
///
/// Real s-type repulsion integrals obey the 8-fold permutational symmetry
/// (ij|kl) = (ji|kl) = (ij|lk) = (kl|ij). The canonical form orders each pair
/// and then the pair of pairs, so every equivalent quadruple maps to the same
/// storage slot and only one representative is ever evaluated.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct IntegralIndex(usize, usize, usize, usize);

impl IntegralIndex {
    /// Creates a new integral index with the given indices.
    pub(crate) const fn new((i, j, k, l): (usize, usize, usize, usize)) -> Self {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let (k, l) = if k < l { (k, l) } else { (l, k) };

        // with i <= j the triangular code j(j+1)/2 + i is injective, so
        // distinct ordered pairs never tie and `new` is idempotent
        let ij = j * (j + 1) / 2 + i;
        let kl = l * (l + 1) / 2 + k;

        if ij < kl {
            Self(i, j, k, l)
        } else {
            Self(k, l, i, j)
        }
    }

    fn linear(&self, size: usize) -> usize {
        let &Self(i, j, k, l) = self;
        l * size.pow(3) + k * size.pow(2) + j * size + i
    }
}

impl std::fmt::Display for IntegralIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let &Self(i, j, k, l) = self;
        write!(f, "({} {}|{} {})", i, j, k, l)
    }
}

/// Electron-electron repulsion integrals for every quadruple of basis
/// functions. Built once per geometry and read-only afterwards, so it can be
/// shared across SCF iterations (and across threads building G blocks).
pub struct ElectronTensor {
    data: Vec<f64>,
    /// side length
    size: usize,
}

impl ElectronTensor {
    /// Evaluates the repulsion integral for every canonical quadruple in the
    /// given basis. With the `rayon` feature enabled the unique integrals are
    /// computed in parallel; the resulting tensor is identical either way.
    pub fn from_basis(
        basis: &[BasisFunction],
        integrator: &impl Integrator<Item = BasisFunction>,
    ) -> Self {
        let n_basis = basis.len();
        let mut data = vec![0.0; n_basis.pow(4)];

        // every canonical quadruple is its own representative exactly once
        let mut to_compute = Vec::new();
        for (i, j, k, l) in
            itertools::iproduct!(0..n_basis, 0..n_basis, 0..n_basis, 0..n_basis)
        {
            let index = IntegralIndex::new((i, j, k, l));
            if index == IntegralIndex(i, j, k, l) {
                to_compute.push(index);
            }
        }

        to_compute.sort_unstable_by_key(|index| index.linear(n_basis));

        #[cfg(feature = "rayon")]
        {
            use rayon::iter::{ParallelBridge, ParallelIterator};

            to_compute
                .chunks(512)
                .par_bridge()
                .map(|indices| {
                    let mut output = Vec::with_capacity(indices.len());
                    for index @ &IntegralIndex(x, y, z, w) in indices {
                        let integral = integrator
                            .electron_repulsion((&basis[x], &basis[y], &basis[z], &basis[w]));

                        log::trace!("ERI {index} = {integral:<1.8}");
                        output.push((index.linear(n_basis), integral))
                    }
                    output
                })
                .collect::<Vec<_>>() // iterators are lazy - we collect to evaluate all elements
                .into_iter()
                .flatten()
                .for_each(|(linear, integral)| data[linear] = integral);
        }

        #[cfg(not(feature = "rayon"))]
        to_compute
            .into_iter()
            .for_each(|index @ IntegralIndex(x, y, z, w)| {
                let integral =
                    integrator.electron_repulsion((&basis[x], &basis[y], &basis[z], &basis[w]));

                log::trace!("ERI {index} = {integral:<1.8}");
                data[index.linear(n_basis)] = integral;
            });

        Self {
            data,
            size: n_basis,
        }
    }
}

impl Index<(usize, usize, usize, usize)> for ElectronTensor {
    type Output = f64;

    fn index(&self, index: (usize, usize, usize, usize)) -> &Self::Output {
        let linear = IntegralIndex::new(index).linear(self.size);
        &self.data[linear]
    }
}
