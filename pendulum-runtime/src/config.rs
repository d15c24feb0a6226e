use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::math::Gains;

pub trait Configurable: Clone {
    fn global(&self) -> &GlobalConfig;
}

/// Pendulum global configuration.
#[derive(Clone, Debug, Default)]
pub struct GlobalConfig {
    /// Name of the binary.
    pub bin_name: String,

    /// Whether the application runs as daemon.
    pub daemon: bool,
}

impl Configurable for GlobalConfig {
    fn global(&self) -> &GlobalConfig {
        self
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Record file.
    pub record_path: PathBuf,
    /// Controller gains.
    pub gains: Gains,
    /// Pole angle sensor device name.
    pub sensor_device: String,
    /// Cart force actuator device name.
    pub actuator_device: String,
    /// Show the elapsed time progress line.
    pub progress: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            record_path: PathBuf::from(crate::consts::DEFAULT_RECORD_PATH),
            gains: Gains::default(),
            sensor_device: crate::consts::DEVICE_POLE_SENSOR.to_string(),
            actuator_device: crate::consts::DEVICE_CART_MOTOR.to_string(),
            progress: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Basic time step in milliseconds.
    pub time_step_ms: u64,
    /// Cart mass in kilograms.
    pub cart_mass: f64,
    /// Pole mass in kilograms.
    pub pole_mass: f64,
    /// Distance from pivot to the pole center of mass in meters.
    pub pole_length: f64,
    /// Gravitational acceleration in m/s^2.
    pub gravity: f64,
    /// Maximum initial pole angle in radians.
    pub initial_angle: f64,
    /// Pole angle in radians at which the pendulum has fallen.
    pub failure_angle: f64,
    /// Cart travel in meters from the origin in either direction.
    pub track_limit: f64,
    /// Simulated time in seconds after which the simulation ends.
    pub max_duration: Option<f64>,
    /// Pace steps to wall clock time.
    pub realtime: bool,
    /// Introduce random disturbance forces.
    pub jitter: bool,
}

impl SimulationConfig {
    /// Retrieve the basic time step.
    pub fn time_step(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.time_step_ms.max(1))
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step_ms: crate::consts::DEFAULT_TIME_STEP_MS,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_length: 0.5,
            gravity: 9.81,
            initial_angle: 0.05,
            failure_angle: 0.8,
            track_limit: 50.0,
            max_duration: None,
            realtime: true,
            jitter: false,
        }
    }
}

/// Pendulum configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Controller configuration.
    pub controller: ControllerConfig,
    /// Simulation configuration.
    pub simulation: SimulationConfig,
    /// Global configuration.
    #[serde(skip)]
    pub global: GlobalConfig,
}

impl Configurable for Config {
    fn global(&self) -> &GlobalConfig {
        &self.global
    }
}

/// Read a configuration from a TOML file.
pub fn from_file<T: serde::de::DeserializeOwned>(
    path: impl AsRef<Path>,
) -> crate::runtime::Result<T> {
    use crate::runtime::Error;

    let content = std::fs::read_to_string(path).map_err(Error::ConfigIo)?;

    toml::from_str(&content).map_err(Error::ConfigParse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.controller.record_path, PathBuf::from("best_time.txt"));
        assert_eq!(config.controller.gains, Gains::new(35.0, 0.5, 8.0));
        assert_eq!(config.controller.sensor_device, "pole position sensor");
        assert_eq!(config.controller.actuator_device, "cart motor");
        assert_eq!(config.simulation.time_step(), std::time::Duration::from_millis(16));
    }

    #[test]
    fn test_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pendulum.toml");

        std::fs::write(
            &path,
            r#"
[controller]
record_path = "/tmp/record.txt"

[controller.gains]
kp = 40.0

[simulation]
time_step_ms = 8
max_duration = 30.0
jitter = true
"#,
        )
        .unwrap();

        let config: Config = from_file(&path).unwrap();

        assert_eq!(config.controller.record_path, PathBuf::from("/tmp/record.txt"));
        assert_eq!(config.controller.gains, Gains::new(40.0, 0.5, 8.0));
        assert_eq!(config.simulation.time_step_ms, 8);
        assert_eq!(config.simulation.max_duration, Some(30.0));
        assert!(config.simulation.jitter);
        assert!(config.simulation.realtime);
    }

    #[test]
    fn test_config_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();

        let result = from_file::<Config>(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(crate::Error::ConfigIo(_))));
    }

    #[test]
    fn test_config_from_file_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pendulum.toml");

        std::fs::write(&path, "[simulation]\ntime_step_ms = \"fast\"\n").unwrap();

        let result = from_file::<Config>(&path);
        assert!(matches!(result, Err(crate::Error::ConfigParse(_))));
    }
}
