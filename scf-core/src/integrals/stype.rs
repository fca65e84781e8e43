//! Closed-form integrals over s-type gaussians.
//!
//! With only zero angular momentum every molecular integral reduces to an
//! elementary expression in the exponents and center separations; the Coulomb
//! kernel needs just the zeroth-order Boys function, which is an error
//! function away from closed form.
use nalgebra::Vector3;

use crate::{
    atom::Atom,
    basis::{BasisFunction, Gaussian},
};

use super::Integrator;

/// Below this the Boys function switches to its Taylor expansion, which is
/// what turns coinciding centers into the analytic limit instead of 0/0.
const BOYS_TAYLOR_THRESHOLD: f64 = 1e-12;

/// Zeroth-order Boys function `F0(t) = erf(sqrt(t)) / sqrt(t) * sqrt(pi) / 2`,
/// with `F0(0) = 1`.
fn boys_f0(t: f64) -> f64 {
    if t < BOYS_TAYLOR_THRESHOLD {
        1.0 - t / 3.0
    } else {
        0.5 * (std::f64::consts::PI / t).sqrt() * libm::erf(t.sqrt())
    }
}

#[derive(Default)]
pub struct SType;

impl Integrator for SType {
    type Item = BasisFunction;

    fn overlap(&self, functions: (&Self::Item, &Self::Item)) -> f64 {
        let (basis_a, basis_b) = functions;
        let diff = basis_b.position - basis_a.position;

        let mut output = 0.0;
        for (&primitive_a, &primitive_b) in
            itertools::iproduct!(basis_a.primitives(), basis_b.primitives())
        {
            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_overlap(primitive_a, primitive_b, diff);
        }
        output
    }

    fn kinetic(&self, functions: (&Self::Item, &Self::Item)) -> f64 {
        let (basis_a, basis_b) = functions;
        let diff = basis_b.position - basis_a.position;

        let mut output = 0.0;
        for (&primitive_a, &primitive_b) in
            itertools::iproduct!(basis_a.primitives(), basis_b.primitives())
        {
            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_kinetic(primitive_a, primitive_b, diff);
        }
        output
    }

    fn nuclear(&self, functions: (&Self::Item, &Self::Item), nuclei: &[Atom]) -> f64 {
        let (basis_a, basis_b) = functions;
        let diff = basis_b.position - basis_a.position;

        let mut output = 0.0;
        for (nucleus, &primitive_a, &primitive_b) in
            itertools::iproduct!(nuclei, basis_a.primitives(), basis_b.primitives())
        {
            let product_center = product_center(
                basis_a.position,
                primitive_a.exponent,
                basis_b.position,
                primitive_b.exponent,
            );

            output += primitive_a.coefficient
                * primitive_b.coefficient
                * primitive_nuclear(primitive_a, primitive_b, diff, product_center, nucleus)
        }
        output
    }

    fn electron_repulsion(
        &self,
        functions: (&Self::Item, &Self::Item, &Self::Item, &Self::Item),
    ) -> f64 {
        let (basis_a, basis_b, basis_c, basis_d) = functions;
        let diff_ab = basis_b.position - basis_a.position;
        let diff_cd = basis_d.position - basis_c.position;

        let mut output = 0.0;
        for &primitive_a in basis_a.primitives() {
            for &primitive_b in basis_b.primitives() {
                let product_center_ab = product_center(
                    basis_a.position,
                    primitive_a.exponent,
                    basis_b.position,
                    primitive_b.exponent,
                );

                for &primitive_c in basis_c.primitives() {
                    for &primitive_d in basis_d.primitives() {
                        let product_center_cd = product_center(
                            basis_c.position,
                            primitive_c.exponent,
                            basis_d.position,
                            primitive_d.exponent,
                        );

                        let diff_product = product_center_cd - product_center_ab;

                        output += primitive_a.coefficient
                            * primitive_b.coefficient
                            * primitive_c.coefficient
                            * primitive_d.coefficient
                            * primitive_electron(
                                primitive_a,
                                primitive_b,
                                primitive_c,
                                primitive_d,
                                diff_ab,
                                diff_cd,
                                diff_product,
                            )
                    }
                }
            }
        }
        output
    }
}

fn primitive_overlap(primitive_a: Gaussian, primitive_b: Gaussian, diff: Vector3<f64>) -> f64 {
    let p = primitive_a.exponent + primitive_b.exponent;
    let mu = primitive_a.exponent * primitive_b.exponent / p;

    (std::f64::consts::PI / p).powi(3).sqrt() * (-mu * diff.norm_squared()).exp()
}

fn primitive_kinetic(primitive_a: Gaussian, primitive_b: Gaussian, diff: Vector3<f64>) -> f64 {
    let p = primitive_a.exponent + primitive_b.exponent;
    let mu = primitive_a.exponent * primitive_b.exponent / p;
    let separation_squared = diff.norm_squared();

    mu * (3.0 - 2.0 * mu * separation_squared)
        * (std::f64::consts::PI / p).powi(3).sqrt()
        * (-mu * separation_squared).exp()
}

fn primitive_nuclear(
    primitive_a: Gaussian,
    primitive_b: Gaussian,
    // difference of the positions of the two basis functions: b - a
    diff: Vector3<f64>,
    // the product center of the two basis functions
    product_center: Vector3<f64>,
    nucleus: &Atom,
) -> f64 {
    let p = primitive_a.exponent + primitive_b.exponent;
    let mu = primitive_a.exponent * primitive_b.exponent / p;
    let diff_nucleus = nucleus.position - product_center;

    -nucleus.nuclear_charge() * (std::f64::consts::TAU / p)
        * (-mu * diff.norm_squared()).exp()
        * boys_f0(p * diff_nucleus.norm_squared())
}

fn primitive_electron(
    primitive_a: Gaussian,
    primitive_b: Gaussian,
    primitive_c: Gaussian,
    primitive_d: Gaussian,
    diff_ab: Vector3<f64>,
    diff_cd: Vector3<f64>,
    diff_product: Vector3<f64>,
) -> f64 {
    let p = primitive_a.exponent + primitive_b.exponent;
    let q = primitive_c.exponent + primitive_d.exponent;
    let mu_ab = primitive_a.exponent * primitive_b.exponent / p;
    let mu_cd = primitive_c.exponent * primitive_d.exponent / q;
    let alpha = p * q / (p + q);

    2.0 * std::f64::consts::PI.powi(5).sqrt()
        * (p * q * (p + q).sqrt()).recip()
        * (-mu_ab * diff_ab.norm_squared() - mu_cd * diff_cd.norm_squared()).exp()
        * boys_f0(alpha * diff_product.norm_squared())
}

#[inline(always)]
fn product_center(
    a_pos: Vector3<f64>,
    a_exp: f64,
    b_pos: Vector3<f64>,
    b_exp: f64,
) -> Vector3<f64> {
    (a_exp * a_pos + b_exp * b_pos) / (a_exp + b_exp)
}
