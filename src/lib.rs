//! Stable-fluids dye tank.
//!
//! [`solver::fluid_step`] advances a [`state::FluidState`] by one fixed tick:
//! implicit diffusion by Gauss-Seidel relaxation, semi-Lagrangian advection and
//! pressure projection on an N×N grid with reflecting walls. The remaining
//! modules are host glue: YAML config, pointer/spring injection and dye
//! rendering.

pub mod config;
pub mod input;
pub mod renderer;
pub mod solver;
pub mod state;
