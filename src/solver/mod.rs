mod boundary;
mod core;
pub mod diagnostics;
mod params;

// Re-export public API
pub use boundary::{set_bnd, FieldType};
pub use self::core::{advect, diffuse, lin_solve, project};
pub use params::SolverParams;

use crate::state::FluidState;

/// One simulated tick: diffuse, project, advect and re-project the velocity,
/// then diffuse and advect the dye through the new velocity.
///
/// Scratch reuse is load-bearing: the current velocity buffers hold pressure
/// and divergence during the first projection, and the previous-velocity
/// buffers hold them during the second.
pub fn fluid_step(state: &mut FluidState, params: &SolverParams) {
    params.validate();
    let dt = params.dt;
    let n = state.n;

    // Diffuse velocity
    diffuse(FieldType::Vx, &mut state.vx0, &state.vx, state.visc, dt, params.diffuse_iter, n);
    diffuse(FieldType::Vy, &mut state.vy0, &state.vy, state.visc, dt, params.diffuse_iter, n);

    // Project diffused velocity, vx/vy as pressure/divergence scratch
    project(&mut state.vx0, &mut state.vy0, &mut state.vx, &mut state.vy, params.project_iter, n);

    // Advect velocity through itself
    advect(FieldType::Vx, &mut state.vx, &state.vx0, &state.vx0, &state.vy0, dt, n);
    advect(FieldType::Vy, &mut state.vy, &state.vy0, &state.vx0, &state.vy0, dt, n);

    // Advection reintroduces divergence; vx0/vy0 are scratch now
    project(&mut state.vx, &mut state.vy, &mut state.vx0, &mut state.vy0, params.project_iter, n);

    // Diffuse + advect dye
    diffuse(FieldType::Scalar, &mut state.dye0, &state.dye, state.diff, dt, params.diffuse_iter, n);
    advect(FieldType::Scalar, &mut state.dye, &state.dye0, &state.vx, &state.vy, dt, n);
}
