use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::solver::SolverParams;
use crate::state::MIN_SIZE;

pub const CONFIG_FILE: &str = "dyetank.yaml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub display: DisplayConfig,
    pub source: SourceConfig,
    pub pointer: PointerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub size: usize,
    pub diffusion: f64,
    pub viscosity: f64,
    pub dt: f64,
    pub diffuse_iter: usize,
    pub project_iter: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub scale: usize,
    pub target_fps: usize,
    pub steps_per_frame: usize,
}

/// Constant dye/velocity spring at the grid centre.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub enabled: bool,
    pub amount: f64,
    pub jitter: i32,
}

/// Mouse-drag injection.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub dye: f64,
    pub velocity_gain: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            display: DisplayConfig::default(),
            source: SourceConfig::default(),
            pointer: PointerConfig::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let solver = SolverParams::default();
        Self {
            size: 64,
            diffusion: 0.0,
            viscosity: 0.0,
            dt: solver.dt,
            diffuse_iter: solver.diffuse_iter,
            project_iter: solver.project_iter,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            scale: 10,
            target_fps: 120,
            steps_per_frame: 1,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            amount: 125.0,
            jitter: 50,
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            dye: 100.0,
            velocity_gain: 1.2,
        }
    }
}

impl PhysicsConfig {
    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            dt: self.dt,
            diffuse_iter: self.diffuse_iter,
            project_iter: self.project_iter,
        }
    }
}

impl Config {
    /// Reject values the solver would panic on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if p.size < MIN_SIZE {
            return Err(ConfigError::Invalid(format!("physics.size must be >= {MIN_SIZE}, got {}", p.size)));
        }
        if !(p.dt.is_finite() && p.dt > 0.0) {
            return Err(ConfigError::Invalid(format!("physics.dt must be positive, got {}", p.dt)));
        }
        if !(p.diffusion.is_finite() && p.diffusion >= 0.0) {
            return Err(ConfigError::Invalid(format!("physics.diffusion must be >= 0, got {}", p.diffusion)));
        }
        if !(p.viscosity.is_finite() && p.viscosity >= 0.0) {
            return Err(ConfigError::Invalid(format!("physics.viscosity must be >= 0, got {}", p.viscosity)));
        }
        if p.diffuse_iter == 0 || p.project_iter == 0 {
            return Err(ConfigError::Invalid("sweep counts must be non-zero".to_string()));
        }
        if self.display.scale == 0 {
            return Err(ConfigError::Invalid("display.scale must be non-zero".to_string()));
        }
        if self.display.steps_per_frame == 0 {
            return Err(ConfigError::Invalid("display.steps_per_frame must be non-zero".to_string()));
        }
        if self.source.jitter < 0 {
            return Err(ConfigError::Invalid(format!("source.jitter must be >= 0, got {}", self.source.jitter)));
        }
        Ok(())
    }
}

/// Parse and validate a config document.
pub fn parse(contents: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(contents)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse(&contents)
}

/// Load `dyetank.yaml` from the working directory, falling back to defaults.
pub fn load() -> Config {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        log::debug!("{CONFIG_FILE} not found; using defaults");
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => {
            log::info!("loaded {}", path.display());
            cfg
        }
        Err(e) => {
            log::warn!("{}: {e}; using defaults", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.physics.size, 64);
        assert_eq!(cfg.physics.diffusion, 0.0);
        assert_eq!(cfg.physics.viscosity, 0.0);
        assert_eq!(cfg.physics.dt, 1.0 / 120.0);
        assert_eq!(cfg.physics.diffuse_iter, 4);
        assert_eq!(cfg.physics.project_iter, 4);
        assert_eq!(cfg.display.scale, 10);
        assert_eq!(cfg.display.target_fps, 120);
        assert_eq!(cfg.display.steps_per_frame, 1);
        assert!(cfg.source.enabled);
        assert_eq!(cfg.source.amount, 125.0);
        assert_eq!(cfg.source.jitter, 50);
        assert_eq!(cfg.pointer.dye, 100.0);
        assert_eq!(cfg.pointer.velocity_gain, 1.2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "physics:\n  viscosity: 0.01\nsource:\n  enabled: false\n";
        let cfg = parse(yaml).unwrap();
        assert_eq!(cfg.physics.viscosity, 0.01);
        assert_eq!(cfg.physics.size, 64); // default
        assert!(!cfg.source.enabled);
        assert_eq!(cfg.source.amount, 125.0); // default
        assert_eq!(cfg.display.scale, 10); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
physics:
  size: 96
  diffusion: 0.0001
  viscosity: 0.00002
  dt: 0.01
  diffuse_iter: 8
  project_iter: 12
display:
  scale: 6
  target_fps: 60
  steps_per_frame: 2
source:
  enabled: true
  amount: 80.0
  jitter: 20
pointer:
  dye: 150.0
  velocity_gain: 2.0
"#;
        let cfg = parse(yaml).unwrap();
        assert_eq!(cfg.physics.size, 96);
        assert_eq!(cfg.physics.diffusion, 0.0001);
        assert_eq!(cfg.physics.viscosity, 0.00002);
        assert_eq!(cfg.physics.dt, 0.01);
        assert_eq!(cfg.physics.diffuse_iter, 8);
        assert_eq!(cfg.physics.project_iter, 12);
        assert_eq!(cfg.display.scale, 6);
        assert_eq!(cfg.display.target_fps, 60);
        assert_eq!(cfg.display.steps_per_frame, 2);
        assert_eq!(cfg.source.amount, 80.0);
        assert_eq!(cfg.source.jitter, 20);
        assert_eq!(cfg.pointer.dye, 150.0);
        assert_eq!(cfg.pointer.velocity_gain, 2.0);

        let params = cfg.physics.solver_params();
        assert_eq!(params.dt, 0.01);
        assert_eq!(params.diffuse_iter, 8);
        assert_eq!(params.project_iter, 12);
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        let err = parse("physics:\n  size: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_negative_viscosity() {
        let err = parse("physics:\n  viscosity: -0.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_zero_scale() {
        let err = parse("display:\n  scale: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn test_rejects_zero_steps_per_frame() {
        let err = parse("display:\n  steps_per_frame: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("steps_per_frame")), "got {err:?}");
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = parse("physics: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let err = load_from(Path::new("/nonexistent/dyetank.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)), "got {err:?}");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("dyetank-test-{}.yaml", std::process::id()));
        std::fs::write(&path, "physics:\n  size: 40\n").unwrap();
        let cfg = load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.physics.size, 40);
    }
}
