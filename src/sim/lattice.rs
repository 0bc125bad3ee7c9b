//! Peg lattice generators
//!
//! Builders for the fixed peg arrays a simulation consumes. The lattice
//! constant is the unit, so a hex lattice with the classic radius of 3/8
//! gives pegs 3/4 of the spacing wide.

use glam::DVec2;

/// Hexagonal lattice built from the rectangular two-atom unit cell:
/// corner atoms at `(j, i sqrt(3))` and centered atoms at
/// `(j + 1/2, (i + 1/2) sqrt(3))`. The bottom row of corner atoms is
/// dropped so no peg sits on the exit line. Stops early at `max_pegs`.
pub fn hex_grid(rows: u32, cols: u32, max_pegs: usize) -> Vec<DVec2> {
    let mut pegs = Vec::new();
    let rt3 = 3.0f64.sqrt();
    for i in 0..rows {
        for j in 0..cols {
            if pegs.len() + 2 > max_pegs {
                return pegs;
            }
            let y = f64::from(i) * rt3;
            if y >= 1e-10 {
                pegs.push(DVec2::new(f64::from(j), y));
            }
            if j != cols - 1 {
                pegs.push(DVec2::new(
                    f64::from(j) + 0.5,
                    (f64::from(i) + 0.5) * rt3,
                ));
            }
        }
    }
    pegs
}

/// The nine pegs of a period-2 square lattice surrounding `pos`: the lattice
/// point nearest `pos` (even coordinates) plus its eight neighbors. A
/// neighbor list for boards too large to scan in full.
pub fn square_neighbors(pos: DVec2) -> Vec<DVec2> {
    let anchor = DVec2::new(
        pos.x - (wrap(pos.x + 1.0, 2.0) - 1.0),
        pos.y - (wrap(pos.y + 1.0, 2.0) - 1.0),
    );
    let mut pegs = Vec::with_capacity(9);
    for i in -1..=1 {
        for j in -1..=1 {
            pegs.push(anchor + 2.0 * DVec2::new(f64::from(i), f64::from(j)));
        }
    }
    pegs
}

/// Truncating modulo shifted into `[0, b)` for negative inputs.
fn wrap(a: f64, b: f64) -> f64 {
    a - b * (a / b).trunc() + if a < 0.0 { b } else { 0.0 }
}
