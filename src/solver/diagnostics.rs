use crate::state::idx_inner;

/// Sum of every cell, walls included.
pub fn total_mass(field: &[f64]) -> f64 {
    field.iter().sum()
}

/// Largest value in the field (`-inf` for an empty slice).
pub fn max_value(field: &[f64]) -> f64 {
    field.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Sum of |central-difference divergence| over interior cells, in cell units.
pub fn divergence_l1(vx: &[f64], vy: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for j in 1..(n - 1) {
        for i in 1..(n - 1) {
            let d = 0.5
                * (vx[idx_inner(i + 1, j, n)] - vx[idx_inner(i - 1, j, n)]
                    + vy[idx_inner(i, j + 1, n)]
                    - vy[idx_inner(i, j - 1, n)]);
            sum += d.abs();
        }
    }
    sum
}

/// Interior-averaged kinetic energy: KE = 0.5 * <vx² + vy²>.
pub fn kinetic_energy(vx: &[f64], vy: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for j in 1..(n - 1) {
        for i in 1..(n - 1) {
            let ii = idx_inner(i, j, n);
            sum += vx[ii] * vx[ii] + vy[ii] * vy[ii];
            count += 1;
        }
    }
    if count > 0 { 0.5 * sum / count as f64 } else { 0.0 }
}
