/// Smallest grid edge that still has interior cells.
pub const MIN_SIZE: usize = 3;

/// Convert 2D coordinates to a linear index.
/// The linear offset `x + y*n` saturates at the last cell when it overflows
/// and at the first cell when it is negative. Neither axis is clamped on its
/// own, so `x = n` on row `y` addresses the first cell of row `y + 1`.
pub fn idx(x: i32, y: i32, n: usize) -> usize {
    let last = (n * n - 1) as i64;
    let offset = x as i64 + y as i64 * n as i64;
    offset.clamp(0, last) as usize
}

/// Fast index for cells already known to be inside the grid.
#[inline(always)]
pub const fn idx_inner(x: usize, y: usize, n: usize) -> usize {
    y * n + x
}

/// Xorshift128 PRNG, deterministic from a seed.
pub struct Xor128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl Xor128 {
    pub fn new(seed: u32) -> Self {
        Self {
            x: seed,
            y: seed.wrapping_mul(1812433253).wrapping_add(1),
            z: seed.wrapping_mul(1812433253).wrapping_mul(2).wrapping_add(2),
            w: seed.wrapping_mul(1812433253).wrapping_mul(3).wrapping_add(3),
        }
    }

    pub fn next(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ (t ^ (t >> 8));
        self.w
    }

    /// Uniform integer in `[lo, hi]` (inclusive).
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi);
        let span = (hi as i64 - lo as i64 + 1) as u64;
        (lo as i64 + (self.next() as u64 % span) as i64) as i32
    }
}

/// Velocity and dye fields of one simulation, plus the fixed material rates.
///
/// The `*0` buffers are scratch storage reused by every tick as diffusion and
/// advection sources (and as pressure/divergence scratch during projection).
/// They carry no history a caller should rely on.
pub struct FluidState {
    pub(crate) n: usize,
    pub(crate) diff: f64,
    pub(crate) visc: f64,
    pub(crate) vx: Vec<f64>,
    pub(crate) vy: Vec<f64>,
    pub(crate) vx0: Vec<f64>,
    pub(crate) vy0: Vec<f64>,
    pub(crate) dye: Vec<f64>,
    pub(crate) dye0: Vec<f64>,
}

impl FluidState {
    /// Allocate an `n`×`n` simulation with every field zeroed.
    ///
    /// Panics when `n` leaves no interior cells or a rate is negative.
    pub fn new(n: usize, diffusion: f64, viscosity: f64) -> Self {
        assert!(n >= MIN_SIZE, "grid size must be at least {MIN_SIZE}, got {n}");
        assert!(
            diffusion.is_finite() && diffusion >= 0.0,
            "diffusion rate must be finite and non-negative, got {diffusion}"
        );
        assert!(
            viscosity.is_finite() && viscosity >= 0.0,
            "viscosity must be finite and non-negative, got {viscosity}"
        );
        let len = n * n;
        Self {
            n,
            diff: diffusion,
            visc: viscosity,
            vx: vec![0.0; len],
            vy: vec![0.0; len],
            vx0: vec![0.0; len],
            vy0: vec![0.0; len],
            dye: vec![0.0; len],
            dye0: vec![0.0; len],
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn diffusion(&self) -> f64 {
        self.diff
    }

    pub fn viscosity(&self) -> f64 {
        self.visc
    }

    /// Add `amount` of dye at cell (x, y). Coordinates saturate per [`idx`].
    pub fn add_dye(&mut self, x: i32, y: i32, amount: f64) {
        self.dye[idx(x, y, self.n)] += amount;
    }

    /// Add (`dx`, `dy`) to the velocity at cell (x, y).
    pub fn add_velocity(&mut self, x: i32, y: i32, dx: f64, dy: f64) {
        let i = idx(x, y, self.n);
        self.vx[i] += dx;
        self.vy[i] += dy;
    }

    pub fn dye(&self) -> &[f64] {
        &self.dye
    }

    pub fn vx(&self) -> &[f64] {
        &self.vx
    }

    pub fn vy(&self) -> &[f64] {
        &self.vy
    }

    /// Dye concentration at (x, y), addressed like [`FluidState::add_dye`].
    pub fn dye_at(&self, x: i32, y: i32) -> f64 {
        self.dye[idx(x, y, self.n)]
    }

    /// Copy the dye field into a pre-allocated snapshot, avoiding allocation.
    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        if dst.dye.len() != self.dye.len() {
            dst.dye.resize(self.dye.len(), 0.0);
        }
        dst.dye.copy_from_slice(&self.dye);
        dst.n = self.n;
    }
}

/// Dye field handed from the simulation thread to the renderer.
pub struct FrameSnapshot {
    pub n: usize,
    pub dye: Vec<f64>,
}

impl FrameSnapshot {
    /// Pre-allocate a snapshot buffer for an `n`×`n` grid.
    pub fn new_empty(n: usize) -> Self {
        FrameSnapshot { n, dye: vec![0.0; n * n] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 64;

    #[test]
    fn test_idx_row_major() {
        assert_eq!(idx(0, 0, N), 0);
        assert_eq!(idx(5, 0, N), 5);
        assert_eq!(idx(0, 1, N), N);
        assert_eq!(idx(3, 7, N), 3 + 7 * N);
        assert_eq!(idx((N - 1) as i32, (N - 1) as i32, N), N * N - 1);
    }

    #[test]
    fn test_idx_injective_in_range() {
        let mut seen = vec![false; N * N];
        for y in 0..N as i32 {
            for x in 0..N as i32 {
                let i = idx(x, y, N);
                assert!(i < N * N);
                assert!(!seen[i], "index {} produced twice", i);
                seen[i] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_idx_saturates_on_overflow() {
        let last = N * N - 1;
        assert_eq!(idx(0, N as i32, N), last);
        assert_eq!(idx(N as i32, (N - 1) as i32, N), last);
        assert_eq!(idx(1000, 1000, N), last);
        assert_eq!(idx((N + 1) as i32, (N + 1) as i32, N), last);
    }

    #[test]
    fn test_idx_column_overflow_spills_into_next_row() {
        // Only the linear offset saturates; x = N on row 3 is cell (0, 4).
        assert_eq!(idx(N as i32, 3, N), idx(0, 4, N));
    }

    #[test]
    fn test_idx_negative_offset_saturates_to_first_cell() {
        assert_eq!(idx(-1, 0, N), 0);
        assert_eq!(idx(-5, -5, N), 0);
        // Negative x with a positive row stays on the linear offset.
        assert_eq!(idx(-1, 2, N), 2 * N - 1);
    }

    #[test]
    fn test_new_zeroed() {
        let s = FluidState::new(16, 0.1, 0.2);
        assert_eq!(s.size(), 16);
        assert_eq!(s.dye().len(), 256);
        assert!(s.dye().iter().chain(s.vx()).chain(s.vy()).all(|&v| v == 0.0));
        assert!(s.vx0.iter().chain(&s.vy0).chain(&s.dye0).all(|&v| v == 0.0));
        assert_eq!(s.diffusion(), 0.1);
        assert_eq!(s.viscosity(), 0.2);
    }

    #[test]
    #[should_panic(expected = "grid size")]
    fn test_new_rejects_degenerate_grid() {
        FluidState::new(1, 0.0, 0.0);
    }

    #[test]
    #[should_panic(expected = "viscosity")]
    fn test_new_rejects_negative_viscosity() {
        FluidState::new(8, 0.0, -1.0);
    }

    #[test]
    fn test_injection_is_additive() {
        let mut s = FluidState::new(8, 0.0, 0.0);
        s.add_dye(3, 4, 10.0);
        s.add_dye(3, 4, -2.5);
        assert_eq!(s.dye_at(3, 4), 7.5);
        s.add_velocity(2, 2, 1.0, -1.0);
        s.add_velocity(2, 2, 0.5, 0.5);
        assert_eq!(s.vx()[idx(2, 2, 8)], 1.5);
        assert_eq!(s.vy()[idx(2, 2, 8)], -0.5);
    }

    #[test]
    fn test_injection_out_of_range_hits_last_cell() {
        let mut s = FluidState::new(8, 0.0, 0.0);
        s.add_dye(100, 100, 1.0);
        assert_eq!(s.dye()[63], 1.0);
    }

    #[test]
    fn test_snapshot_into_copies_dye() {
        let mut s = FluidState::new(8, 0.0, 0.0);
        s.add_dye(1, 1, 4.0);
        let mut snap = FrameSnapshot::new_empty(4);
        s.snapshot_into(&mut snap);
        assert_eq!(snap.n, 8);
        assert_eq!(snap.dye.len(), 64);
        assert_eq!(snap.dye[idx(1, 1, 8)], 4.0);
    }

    #[test]
    fn test_xor128_range_bounds() {
        let mut rng = Xor128::new(42);
        for _ in 0..1000 {
            let v = rng.range_i32(-50, 50);
            assert!((-50..=50).contains(&v));
        }
    }

    #[test]
    fn test_xor128_deterministic() {
        let mut a = Xor128::new(7);
        let mut b = Xor128::new(7);
        for _ in 0..10 {
            assert_eq!(a.next(), b.next());
        }
    }
}
