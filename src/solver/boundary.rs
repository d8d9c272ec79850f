use crate::state::{idx_inner, MIN_SIZE};

/// Field type for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Scalar,
    Vx,
    Vy,
}

/// Closed-box wall conditions.
///   - `FieldType::Scalar`: Neumann (copy neighbor) on every wall
///   - `FieldType::Vx`: negate on the left/right walls, copy on top/bottom
///   - `FieldType::Vy`: negate on the top/bottom walls, copy on left/right
///
/// Corners take the mean of their two edge neighbors after the edges are set.
pub fn set_bnd(field_type: FieldType, x: &mut [f64], n: usize) {
    assert!(n >= MIN_SIZE, "grid size must be at least {MIN_SIZE}, got {n}");
    debug_assert_eq!(x.len(), n * n);
    let last = n - 1;

    // Pass 1: top/bottom walls
    let sy = if field_type == FieldType::Vy { -1.0 } else { 1.0 };
    for i in 1..last {
        x[idx_inner(i, 0, n)] = sy * x[idx_inner(i, 1, n)];
        x[idx_inner(i, last, n)] = sy * x[idx_inner(i, last - 1, n)];
    }

    // Pass 2: left/right walls
    let sx = if field_type == FieldType::Vx { -1.0 } else { 1.0 };
    for j in 1..last {
        x[idx_inner(0, j, n)] = sx * x[idx_inner(1, j, n)];
        x[idx_inner(last, j, n)] = sx * x[idx_inner(last - 1, j, n)];
    }

    x[idx_inner(0, 0, n)] = 0.5 * (x[idx_inner(1, 0, n)] + x[idx_inner(0, 1, n)]);
    x[idx_inner(0, last, n)] = 0.5 * (x[idx_inner(1, last, n)] + x[idx_inner(0, last - 1, n)]);
    x[idx_inner(last, 0, n)] = 0.5 * (x[idx_inner(last - 1, 0, n)] + x[idx_inner(last, 1, n)]);
    x[idx_inner(last, last, n)] =
        0.5 * (x[idx_inner(last - 1, last, n)] + x[idx_inner(last, last - 1, n)]);
}
