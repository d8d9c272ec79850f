use crate::state::{FluidState, Xor128};

/// One additive write into the simulation, queued from the UI thread and
/// applied on the simulation thread between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Injection {
    Dye { x: i32, y: i32, amount: f64 },
    Velocity { x: i32, y: i32, dx: f64, dy: f64 },
}

impl Injection {
    pub fn apply(&self, state: &mut FluidState) {
        match *self {
            Injection::Dye { x, y, amount } => state.add_dye(x, y, amount),
            Injection::Velocity { x, y, dx, dy } => state.add_velocity(x, y, dx, dy),
        }
    }
}

/// Map a window pixel position to the grid cell it falls in.
/// Truncates towards zero, so slightly negative positions map to cell 0.
pub fn pointer_to_cell(px: f32, py: f32, scale: usize) -> (i32, i32) {
    let s = scale as f32;
    ((px / s) as i32, (py / s) as i32)
}

/// Mouse drag painter: dye at the pointer, velocity from pointer motion.
pub struct PointerStroke {
    prev: (f32, f32),
    held: bool,
    dye: f64,
    gain: f64,
}

impl PointerStroke {
    pub fn new(dye: f64, gain: f64) -> Self {
        Self { prev: (0.0, 0.0), held: false, dye, gain }
    }

    /// Feed one pointer sample. On a press, and on every move while held,
    /// pushes a dye and a velocity injection; the velocity is the pixel delta
    /// from the previous held sample times the gain. A pointer held still
    /// deposits nothing after the press. Released samples only end the hold.
    pub fn sample(&mut self, pos: (f32, f32), pressed: bool, scale: usize, out: &mut Vec<Injection>) {
        if !pressed {
            self.held = false;
            return;
        }
        if self.held && pos == self.prev {
            return;
        }
        self.held = true;
        let (x, y) = pointer_to_cell(pos.0, pos.1, scale);
        let dx = (pos.0 - self.prev.0) as f64 * self.gain;
        let dy = (pos.1 - self.prev.1) as f64 * self.gain;
        out.push(Injection::Dye { x, y, amount: self.dye });
        out.push(Injection::Velocity { x, y, dx, dy });
        self.prev = pos;
    }
}

/// Steady spring of dye at the grid centre, kicked in a random direction
/// every frame.
pub struct SpringSource {
    x: i32,
    y: i32,
    amount: f64,
    jitter: i32,
    rng: Xor128,
}

impl SpringSource {
    pub fn new(n: usize, amount: f64, jitter: i32, seed: u32) -> Self {
        let c = (n / 2) as i32;
        Self { x: c, y: c, amount, jitter: jitter.max(0), rng: Xor128::new(seed) }
    }

    pub fn emit(&mut self, out: &mut Vec<Injection>) {
        let dx = self.rng.range_i32(-self.jitter, self.jitter) as f64;
        let dy = self.rng.range_i32(-self.jitter, self.jitter) as f64;
        out.push(Injection::Dye { x: self.x, y: self.y, amount: self.amount });
        out.push(Injection::Velocity { x: self.x, y: self.y, dx, dy });
    }
}
