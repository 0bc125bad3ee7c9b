//! Quartic root extraction
//!
//! The time at which a parabolic flight path intersects a circular peg is a
//! root of a degree-4 polynomial, so the whole simulation hangs off finding
//! the smallest strictly positive real root of a quartic. Three strategies
//! are provided behind [`Solver`]; they agree within numerical tolerance on
//! well-conditioned inputs but degrade differently near grazing contacts,
//! which is why the choice is a runtime parameter rather than a constant.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

mod bairstow;
mod durand_kerner;
mod ferrari;

/// Convergence tolerance shared by the iterative strategies.
///
/// Bairstow measures the relative change of its quadratic-factor parameters
/// against this; Durand-Kerner measures its mean residual magnitude against
/// it and classifies a root as real when its imaginary part is within twice
/// this value. Part of the observable contract: near ill-conditioned inputs
/// two strategies may disagree by amounts on this order.
pub const TOLERANCE: f64 = 1e-14;

/// Iteration cap for the iterative strategies. A capped, unconverged run
/// still reports its best current estimates under the same tolerance test.
pub const MAX_ITERATIONS: u32 = 1 << 10;

/// A degree-4 polynomial `a4 t^4 + a3 t^3 + a2 t^2 + a1 t + a0`, stored as
/// coefficients `[a0, a1, a2, a3, a4]` in ascending degree.
///
/// A degenerate leading coefficient (`a4 == 0`) is not handled; collision
/// quartics always carry `a4 = 1/4` from the gravity term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartic(pub [f64; 5]);

impl Quartic {
    pub fn new(coeffs: [f64; 5]) -> Self {
        Self(coeffs)
    }

    /// Evaluate at `x` by Horner's rule.
    pub fn eval(&self, x: f64) -> f64 {
        self.0.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluate at a complex `x` by Horner's rule.
    pub fn eval_complex(&self, x: Complex64) -> Complex64 {
        self.0
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * x + c)
    }
}

/// Real roots recovered from one quartic: at most four, unordered.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootSet {
    roots: [f64; 4],
    len: usize,
}

impl RootSet {
    /// Record a root. Non-finite values are discarded so that downstream
    /// selection never has to reason about NaN ordering.
    pub fn push(&mut self, root: f64) {
        if root.is_finite() && self.len < self.roots.len() {
            self.roots[self.len] = root;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.roots[..self.len].iter().copied()
    }

    /// The same roots in ascending order.
    pub fn sorted(mut self) -> Self {
        self.roots[..self.len].sort_by(f64::total_cmp);
        self
    }

    /// The minimum strictly positive root, or `None` when no candidate
    /// collision time exists.
    pub fn smallest_positive(&self) -> Option<f64> {
        self.iter()
            .filter(|&r| r > 0.0)
            .min_by(f64::total_cmp)
    }
}

/// Root-finding strategy, selectable at runtime for comparative testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Solver {
    /// Quadratic-factor deflation via Newton iteration. The default.
    #[default]
    Bairstow,
    /// Simultaneous fixed-point iteration over four complex estimates.
    DurandKerner,
    /// Closed-form resolvent. Exact for well-separated roots, fragile near
    /// degenerate discriminants; a reference path, not the default.
    Ferrari,
}

impl Solver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Solver::Bairstow => "bairstow",
            Solver::DurandKerner => "durand-kerner",
            Solver::Ferrari => "ferrari",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bairstow" => Some(Solver::Bairstow),
            "durand-kerner" | "durand_kerner" | "dk" => Some(Solver::DurandKerner),
            "ferrari" | "exact" => Some(Solver::Ferrari),
            _ => None,
        }
    }

    /// All real roots of `quartic`, or an empty set when none exist.
    pub fn roots(&self, quartic: &Quartic) -> RootSet {
        match self {
            Solver::Bairstow => bairstow::roots(quartic),
            Solver::DurandKerner => durand_kerner::roots(quartic),
            Solver::Ferrari => ferrari::roots(quartic),
        }
    }

    /// The smallest strictly positive real root, or `None` when the
    /// polynomial never crosses zero at a positive time.
    pub fn smallest_positive_root(&self, quartic: &Quartic) -> Option<f64> {
        self.roots(quartic).smallest_positive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Expand `(t - r0)(t - r1)(t - r2)(t - r3)` into ascending coefficients.
    fn from_roots(r: [f64; 4]) -> Quartic {
        let mut coeffs = [0.0; 5];
        coeffs[0] = 1.0;
        let mut deg = 0;
        for root in r {
            // multiply the running polynomial by (t - root)
            let mut next = [0.0; 5];
            for i in 0..=deg {
                next[i + 1] += coeffs[i];
                next[i] -= root * coeffs[i];
            }
            coeffs = next;
            deg += 1;
        }
        Quartic::new(coeffs)
    }

    const ALL_SOLVERS: [Solver; 3] = [Solver::Bairstow, Solver::DurandKerner, Solver::Ferrari];

    fn assert_recovers(solver: Solver, expected: [f64; 4]) {
        let quartic = from_roots(expected);
        let found = solver.roots(&quartic).sorted();
        assert_eq!(found.len(), 4, "{solver:?} found {found:?}");
        let mut expected = expected;
        expected.sort_by(f64::total_cmp);
        for (f, e) in found.iter().zip(expected) {
            let scale = e.abs().max(1.0);
            assert!(
                (f - e).abs() / scale < 1e-6,
                "{solver:?}: got {f}, expected {e}"
            );
        }
    }

    #[test]
    fn well_separated_real_roots_recovered() {
        for solver in ALL_SOLVERS {
            assert_recovers(solver, [-3.0, -1.0, 2.0, 5.0]);
            assert_recovers(solver, [0.5, 1.5, 4.0, 10.0]);
            assert_recovers(solver, [-7.25, -2.5, 3.75, 6.125]);
        }
    }

    #[test]
    fn purely_complex_roots_report_empty() {
        // (t^2 + 1)(t^2 + 4) = t^4 + 5t^2 + 4
        let quartic = Quartic::new([4.0, 0.0, 5.0, 0.0, 1.0]);
        for solver in ALL_SOLVERS {
            assert!(
                solver.roots(&quartic).smallest_positive().is_none(),
                "{solver:?} invented a real positive root"
            );
        }
    }

    #[test]
    fn smallest_positive_skips_negatives_and_nan() {
        let mut set = RootSet::default();
        set.push(-3.0);
        set.push(2.0);
        set.push(5.0);
        set.push(f64::NAN);
        assert_eq!(set.smallest_positive(), Some(2.0));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn empty_set_has_no_selection() {
        assert_eq!(RootSet::default().smallest_positive(), None);
    }

    #[test]
    fn eval_matches_expansion() {
        let quartic = from_roots([-1.0, 2.0, 3.0, 4.0]);
        assert!(quartic.eval(2.0).abs() < 1e-12);
        // constant term is the product of the roots
        assert!((quartic.eval(0.0) - (-24.0)).abs() < 1e-12);
    }

    #[test]
    fn solver_names_round_trip() {
        for solver in ALL_SOLVERS {
            assert_eq!(Solver::from_str(solver.as_str()), Some(solver));
        }
        assert_eq!(Solver::from_str("newton"), None);
    }

    proptest! {
        #[test]
        fn strategies_agree_on_separated_roots(
            a in -20.0..-10.0f64,
            b in -5.0..-1.0f64,
            c in 1.0..5.0f64,
            d in 10.0..20.0f64,
        ) {
            let quartic = from_roots([a, b, c, d]);
            let bair = Solver::Bairstow.smallest_positive_root(&quartic).unwrap();
            let dk = Solver::DurandKerner.smallest_positive_root(&quartic).unwrap();
            let ferrari = Solver::Ferrari.smallest_positive_root(&quartic).unwrap();
            prop_assert!((bair - c).abs() / c < 1e-6);
            prop_assert!((dk - c).abs() / c < 1e-6);
            prop_assert!((ferrari - c).abs() / c < 1e-6);
        }

        #[test]
        fn accepted_roots_are_residual_small(
            a in -8.0..-4.0f64,
            b in -2.0..-0.5f64,
            c in 0.5..2.0f64,
            d in 4.0..8.0f64,
        ) {
            let quartic = from_roots([a, b, c, d]);
            for root in Solver::Bairstow.roots(&quartic).iter() {
                prop_assert!(quartic.eval(root).abs() < 1e-6);
            }
        }
    }
}
