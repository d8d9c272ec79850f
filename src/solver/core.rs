use crate::state::{idx, idx_inner, MIN_SIZE};
use super::boundary::{set_bnd, FieldType};

/// Gauss-Seidel iterative linear solver.
/// Solves: x[i,j] = (x0[i,j] + a * (neighbors)) / c
///
/// Sweeps run in place, rows ascending and cells ascending within a row, so
/// each update reads neighbors already refreshed earlier in the same sweep.
/// The sweep count is the only convergence control. Walls are rewritten once
/// after the last sweep.
pub fn lin_solve(field_type: FieldType, x: &mut [f64], x0: &[f64], a: f64, c: f64, iter: usize, n: usize) {
    assert!(n >= MIN_SIZE, "grid size must be at least {MIN_SIZE}, got {n}");
    assert!(c != 0.0, "relaxation divisor must be non-zero");
    debug_assert_eq!(x.len(), n * n);
    debug_assert_eq!(x0.len(), n * n);
    let c_inv = 1.0 / c;
    for _ in 0..iter {
        for j in 1..(n - 1) {
            for i in 1..(n - 1) {
                let neighbors = x[idx_inner(i + 1, j, n)]
                    + x[idx_inner(i - 1, j, n)]
                    + x[idx_inner(i, j + 1, n)]
                    + x[idx_inner(i, j - 1, n)];
                x[idx_inner(i, j, n)] = (x0[idx_inner(i, j, n)] + a * neighbors) * c_inv;
            }
        }
    }
    set_bnd(field_type, x, n);
}

/// Diffusion step: spreads the field over time.
/// a = dt * diff * (N-2)^2, c = 1 + 6a
///
/// `x` is relaxed from whatever it currently holds; it is not reset from `x0`.
pub fn diffuse(field_type: FieldType, x: &mut [f64], x0: &[f64], diff: f64, dt: f64, iter: usize, n: usize) {
    assert!(n >= MIN_SIZE, "grid size must be at least {MIN_SIZE}, got {n}");
    let a = dt * diff * ((n - 2) as f64) * ((n - 2) as f64);
    lin_solve(field_type, x, x0, a, 1.0 + 6.0 * a, iter, n);
}

/// Semi-Lagrangian advection: traces each cell backwards through the velocity
/// field and bilinearly samples `d0` at the departure point.
///
/// Departure coordinates clamp to `[0.5, N + 0.5]` per axis. Samples that land
/// past the last column or row resolve through the saturating [`idx`].
pub fn advect(field_type: FieldType, d: &mut [f64], d0: &[f64], vx: &[f64], vy: &[f64], dt: f64, n: usize) {
    assert!(n >= MIN_SIZE, "grid size must be at least {MIN_SIZE}, got {n}");
    let dt0 = dt * (n - 2) as f64;
    let n_f = n as f64;

    for j in 1..(n - 1) {
        for i in 1..(n - 1) {
            let ii = idx_inner(i, j, n);
            // Trace backwards
            let x = (i as f64 - dt0 * vx[ii]).clamp(0.5, n_f + 0.5);
            let y = (j as f64 - dt0 * vy[ii]).clamp(0.5, n_f + 0.5);

            let i0 = x.floor();
            let j0 = y.floor();
            let s1 = x - i0;
            let s0 = 1.0 - s1;
            let t1 = y - j0;
            let t0 = 1.0 - t1;

            let i0 = i0 as i32;
            let j0 = j0 as i32;
            let i1 = i0 + 1;
            let j1 = j0 + 1;

            d[ii] = s0 * (t0 * d0[idx(i0, j0, n)] + t1 * d0[idx(i0, j1, n)])
                + s1 * (t0 * d0[idx(i1, j0, n)] + t1 * d0[idx(i1, j1, n)]);
        }
    }
    set_bnd(field_type, d, n);
}

/// Pressure projection: pushes the velocity field towards zero divergence.
///
/// `p` and `div` are scratch; both are fully overwritten on the interior.
pub fn project(vx: &mut [f64], vy: &mut [f64], p: &mut [f64], div: &mut [f64], iter: usize, n: usize) {
    assert!(n >= MIN_SIZE, "grid size must be at least {MIN_SIZE}, got {n}");
    let n_f = n as f64;

    // Calculate divergence
    for j in 1..(n - 1) {
        for i in 1..(n - 1) {
            div[idx_inner(i, j, n)] = -0.5
                * (vx[idx_inner(i + 1, j, n)] - vx[idx_inner(i - 1, j, n)]
                    + vy[idx_inner(i, j + 1, n)]
                    - vy[idx_inner(i, j - 1, n)])
                / n_f;
            p[idx_inner(i, j, n)] = 0.0;
        }
    }
    set_bnd(FieldType::Scalar, div, n);
    set_bnd(FieldType::Scalar, p, n);

    // Solve for pressure
    lin_solve(FieldType::Scalar, p, div, 1.0, 6.0, iter, n);

    // Subtract pressure gradient from velocity
    for j in 1..(n - 1) {
        for i in 1..(n - 1) {
            vx[idx_inner(i, j, n)] -= 0.5 * (p[idx_inner(i + 1, j, n)] - p[idx_inner(i - 1, j, n)]) * n_f;
            vy[idx_inner(i, j, n)] -= 0.5 * (p[idx_inner(i, j + 1, n)] - p[idx_inner(i, j - 1, n)]) * n_f;
        }
    }
    set_bnd(FieldType::Vx, vx, n);
    set_bnd(FieldType::Vy, vy, n);
}
