//! Closed-form quartic solution (Ferrari / resolvent cubic)
//!
//! Direct complex-arithmetic evaluation of the quartic formula. Exact for
//! well-separated roots but numerically fragile near degenerate
//! discriminants, so it serves as a reference and validation path rather
//! than the default strategy.

use num_complex::Complex64;

use super::{Quartic, RootSet};

/// A computed root counts as real when its imaginary part is this close to
/// zero. Looser than the iterative tolerances: the closed form accumulates
/// more rounding through the nested radicals.
const REAL_EPS: f64 = 1e-10;

pub(super) fn roots(quartic: &Quartic) -> RootSet {
    let [e, d, c, b, a] = quartic.0;

    let a2 = a * a;
    let p = Complex64::from((8.0 * a * c - 3.0 * b * b) / (8.0 * a2));
    let q = Complex64::from((b * b * b - 4.0 * a * b * c + 8.0 * a2 * d) / (8.0 * a2 * a));

    let d0 = Complex64::from(c * c - 3.0 * b * d + 12.0 * a * e);
    let d1 = Complex64::from(
        2.0 * c * c * c - 9.0 * b * c * d + 27.0 * b * b * e + 27.0 * a * d * d - 72.0 * a * c * e,
    );

    let big_q = ((d1 + (d1 * d1 - 4.0 * d0 * d0 * d0).sqrt()) / 2.0).powf(1.0 / 3.0);
    let s = 0.5 * (-2.0 / 3.0 * p + (big_q + d0 / big_q) / (3.0 * a)).sqrt();

    let base = Complex64::from(-b / (4.0 * a));
    let inner = -4.0 * s * s - 2.0 * p;

    let candidates = [
        base - s + 0.5 * (inner + q / s).sqrt(),
        base - s - 0.5 * (inner + q / s).sqrt(),
        base + s + 0.5 * (inner - q / s).sqrt(),
        base + s - 0.5 * (inner - q / s).sqrt(),
    ];

    let mut out = RootSet::default();
    for z in candidates {
        if z.im.abs() < REAL_EPS {
            out.push(z.re);
        }
    }
    out
}
