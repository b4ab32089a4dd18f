use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

// --- Enums for Choices ---
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Both rabbits advanced and reported from one loop.
    #[default]
    Serial,
    /// One worker thread per rabbit.
    Threaded,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SerializerType {
    #[default]
    Text,
    Json,
}

// --- Configuration Sections ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RabbitSettings {
    /// Units per second, shared by both rabbits.
    pub speed: f64,
    /// Defaults to the plane centre.
    pub regular_start: Option<(f64, f64)>,
    /// Defaults to half the plane width.
    pub albino_start_x: Option<f64>,
}

impl Default for RabbitSettings {
    fn default() -> Self {
        Self {
            speed: 50.0,
            regular_start: None,
            albino_start_x: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunSettings {
    /// Simulated seconds to cover.
    pub simulation_time: f64,
    /// Seconds per tick.
    pub time_step: f64,
    pub mode: RunMode,
    /// Threaded workers sleep one `time_step` of wall-clock time per tick.
    pub pacing: bool,
    /// Seed for the regular rabbit's heading source. Random when absent.
    pub seed: Option<u64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            simulation_time: 20.0,
            time_step: 0.1,
            mode: RunMode::Serial,
            pacing: true,
            seed: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub format: SerializerType,
}

// --- Top-Level Config Struct ---

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub world_settings: WorldSettings,
    pub rabbits: RabbitSettings,
    pub run: RunSettings,
    pub output: OutputSettings,
}

// --- Helper Methods ---

impl Config {
    pub fn regular_start(&self) -> (f64, f64) {
        self.rabbits
            .regular_start
            .unwrap_or((self.world_settings.width / 2.0, self.world_settings.height / 2.0))
    }

    pub fn albino_start_x(&self) -> f64 {
        self.rabbits
            .albino_start_x
            .unwrap_or(self.world_settings.width / 2.0)
    }

    /// Distance a rabbit covers in one tick.
    pub fn step_length(&self) -> f64 {
        self.rabbits.speed * self.run.time_step
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world_settings;
        if !(world.width.is_finite() && world.width > 0.0)
            || !(world.height.is_finite() && world.height > 0.0)
        {
            return Err(ConfigError::Validation(
                "World dimensions must be positive".to_string(),
            ));
        }

        if !(self.run.time_step.is_finite() && self.run.time_step > 0.0) {
            return Err(ConfigError::Validation(
                "Time step must be greater than 0".to_string(),
            ));
        }

        if !(self.run.simulation_time.is_finite() && self.run.simulation_time >= 0.0) {
            return Err(ConfigError::Validation(
                "Simulation time cannot be negative".to_string(),
            ));
        }

        if !(self.rabbits.speed.is_finite() && self.rabbits.speed >= 0.0) {
            return Err(ConfigError::Validation(
                "Rabbit speed must be a non-negative number".to_string(),
            ));
        }

        // Wraparound corrects by at most one plane dimension per tick.
        if self.step_length() >= world.width.min(world.height) {
            return Err(ConfigError::Validation(format!(
                "A rabbit moves {} units per tick, which must stay below the smaller plane dimension {}",
                self.step_length(),
                world.width.min(world.height)
            )));
        }

        let (x, y) = self.regular_start();
        if !(0.0..world.width).contains(&x) || !(0.0..world.height).contains(&y) {
            return Err(ConfigError::Validation(format!(
                "Regular rabbit start ({}, {}) is outside the plane",
                x, y
            )));
        }

        let albino_x = self.albino_start_x();
        if !(0.0..world.width).contains(&albino_x) {
            return Err(ConfigError::Validation(format!(
                "Albino rabbit start x {} is outside the plane",
                albino_x
            )));
        }

        Ok(())
    }
}

// --- Loading Function ---

/// Reads and validates a JSON config. Missing sections and fields fall back
/// to their defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
