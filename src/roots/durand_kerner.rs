//! Durand-Kerner: simultaneous iteration over all four complex roots
//!
//! Four estimates are seeded on a circle whose radius exceeds the largest
//! coefficient magnitude by one, then relaxed together until the mean
//! residual magnitude drops below tolerance. Roots whose imaginary part is
//! within twice the tolerance are classified as real.

use std::f64::consts::FRAC_PI_2;

use num_complex::Complex64;

use super::{MAX_ITERATIONS, Quartic, RootSet, TOLERANCE};

pub(super) fn roots(quartic: &Quartic) -> RootSet {
    let c = &quartic.0;
    let radius = 1.0 + c[1].abs().max(c[2].abs()).max(c[3].abs()).max(c[4].abs());

    // distinct starting points: quarter-turn angles, shrinking magnitudes
    let mut est = [
        Complex64::from_polar(radius, 0.0),
        Complex64::from_polar(radius, FRAC_PI_2) / 2.0,
        Complex64::from_polar(radius, 2.0 * FRAC_PI_2) / 3.0,
        Complex64::from_polar(radius, 3.0 * FRAC_PI_2) / 4.0,
    ];

    let mut err = f64::INFINITY;
    let mut steps = 0;
    while err > TOLERANCE && steps < MAX_ITERATIONS {
        steps += 1;

        let [p, r, s, t] = est;
        est = [
            p - quartic.eval_complex(p) / ((p - r) * (p - s) * (p - t)),
            r - quartic.eval_complex(r) / ((r - p) * (r - s) * (r - t)),
            s - quartic.eval_complex(s) / ((s - r) * (s - p) * (s - t)),
            t - quartic.eval_complex(t) / ((t - r) * (t - s) * (t - p)),
        ];

        err = est
            .iter()
            .map(|&z| quartic.eval_complex(z).norm())
            .sum::<f64>()
            / 4.0;
    }

    // a capped run still reports its best estimates under the same test
    let mut out = RootSet::default();
    for z in est {
        if z.im.abs() < 2.0 * TOLERANCE {
            out.push(z.re);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_distinct_real_roots() {
        // (t - 1)(t + 1)(t - 3)(t + 2) = t^4 - t^3 - 7t^2 + t + 6
        let quartic = Quartic::new([6.0, 1.0, -7.0, -1.0, 1.0]);
        let found = roots(&quartic).sorted();
        let expected = [-2.0, -1.0, 1.0, 3.0];
        assert_eq!(found.len(), 4);
        for (f, e) in found.iter().zip(expected) {
            assert!((f - e).abs() < 1e-8, "got {f}, expected {e}");
        }
    }

    #[test]
    fn rejects_conjugate_pairs() {
        // (t^2 + 2t + 5)(t - 1)(t - 2): complex pair at -1 +- 2i
        // expansion: t^4 - t^3 + t^2 - 11t + 10
        let quartic = Quartic::new([10.0, -11.0, 1.0, -1.0, 1.0]);
        let found = roots(&quartic).sorted();
        assert_eq!(found.len(), 2);
        let reals: Vec<f64> = found.iter().collect();
        assert!((reals[0] - 1.0).abs() < 1e-8);
        assert!((reals[1] - 2.0).abs() < 1e-8);
    }
}
