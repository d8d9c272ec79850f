/// Solver parameters for one simulation: the fixed tick length and the
/// Gauss-Seidel sweep counts. Material rates live on `FluidState`.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverParams {
    pub dt: f64,
    pub diffuse_iter: usize,
    pub project_iter: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            dt: 1.0 / 120.0,
            diffuse_iter: 4,
            project_iter: 4,
        }
    }
}

impl SolverParams {
    /// Panics unless `dt` is positive and finite and both sweep counts are non-zero.
    pub fn validate(&self) {
        assert!(self.dt.is_finite() && self.dt > 0.0, "dt must be positive, got {}", self.dt);
        assert!(self.diffuse_iter > 0, "diffuse_iter must be non-zero");
        assert!(self.project_iter > 0, "project_iter must be non-zero");
    }
}
