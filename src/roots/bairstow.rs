//! Bairstow's method: real quadratic-factor deflation
//!
//! Extracts factors `t^2 + u t + v` by Newton iteration on the pair (u, v),
//! pulling two roots out at a time: degree 4 -> 2 -> 0. Each converged factor
//! with a non-negative discriminant contributes a real root pair; a factor
//! whose discriminant stays negative is a complex-conjugate pair and
//! contributes nothing.

use super::{MAX_ITERATIONS, Quartic, RootSet, TOLERANCE};

pub(super) fn roots(quartic: &Quartic) -> RootSet {
    let mut out = RootSet::default();
    let mut poly = quartic.0;
    let mut deg = 4;
    while deg >= 2 {
        let (quotient, pair) = extract_pair(&poly, deg);
        poly = quotient;
        if let Some((r1, r2)) = pair {
            out.push(r1);
            out.push(r2);
        }
        deg -= 2;
    }
    out
}

/// Divide out one quadratic factor of `poly` (degree `deg`, ascending
/// coefficients). Returns the quotient polynomial of degree `deg - 2` and
/// the factor's real roots, if it has any.
///
/// Iteration stops when the relative change of (u, v) falls below
/// [`TOLERANCE`] or after [`MAX_ITERATIONS`] steps; a capped run still
/// classifies its best current (u, v) by the discriminant test.
fn extract_pair(poly: &[f64; 5], deg: usize) -> ([f64; 5], Option<(f64, f64)>) {
    let mut q = [0.0; 5];
    let mut r = [0.0; 5];

    let mut u = poly[deg - 1] / poly[deg];
    let mut v = poly[deg - 2] / poly[deg];

    let mut err = 10.0 * TOLERANCE;
    let mut steps = 0;
    while err > TOLERANCE && steps < MAX_ITERATIONS {
        // synthetic division of poly by t^2 + u t + v: quotient q, remainder (c, d)
        q[deg] = 0.0;
        q[deg - 1] = 0.0;
        for i in (0..=deg - 2).rev() {
            q[i] = poly[i + 2] - u * q[i + 1] - v * q[i + 2];
        }
        let c = poly[1] - u * q[0] - v * q[1];
        let d = poly[0] - v * q[0];

        // divide the quotient again to get the Jacobian terms (g, h)
        r[deg] = 0.0;
        r[deg - 1] = 0.0;
        for i in (0..=deg - 2).rev() {
            r[i] = q[i + 2] - u * r[i + 1] - v * r[i + 2];
        }
        let g = q[1] - u * r[0] - v * r[1];
        let h = q[0] - v * r[0];

        let det = 1.0 / (v * g * g + h * (h - u * g));
        let (uo, vo) = (u, v);
        u -= det * (g * d - c * h);
        v -= det * ((g * u - h) * d - g * v * c);

        // relative change in (u, v); guard the denominators so a factor
        // passing through zero (pure vertical drops) keeps iterating
        let su = if uo == 0.0 { 1.0 } else { uo * uo };
        let sv = if vo == 0.0 { 1.0 } else { vo * vo };
        err = ((u - uo).powi(2) / su + (v - vo).powi(2) / sv).sqrt();
        steps += 1;
    }

    // t^2 + u t + v = 0
    let disc = u * u - 4.0 * v;
    if disc < 0.0 {
        return (q, None);
    }
    let sq = 0.5 * disc.sqrt();
    let half = -0.5 * u;
    (q, Some((half + sq, half - sq)))
}
