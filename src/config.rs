//! Game configuration.
//!
//! Physics values are expressed in reference units: a playfield
//! `reference_height` units tall. [`crate::game::Layout`] scales them to
//! whatever pixel size the terminal gives us.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    pub gravity: f64,
    /// Velocity set by a flap. Negative is up.
    pub lift: f64,
    pub obstacle_speed: f64,
    pub gap_size: f64,
    pub pipe_width: f64,
    /// Horizontal distance between consecutive pipes.
    pub pipe_spacing: f64,
    /// Gap tops are drawn from `[0, gap_band - gap_size)`.
    pub gap_band: f64,
    pub ground_height: f64,
    pub bird_x: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    pub reference_height: f64,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            lift: -7.0,
            obstacle_speed: 2.0,
            gap_size: 140.0,
            pipe_width: 50.0,
            pipe_spacing: 300.0,
            gap_band: 400.0,
            ground_height: 50.0,
            bird_x: 100.0,
            bird_width: 34.0,
            bird_height: 24.0,
            reference_height: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub initial_pipes: usize,
    /// When false the floor only clamps the bird, like the ceiling does.
    pub ground_is_fatal: bool,
    /// Ticks the game-over panel stays up before a flap restarts.
    pub restart_delay_ticks: u32,
    pub seed: Option<u64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            initial_pipes: 3,
            ground_is_fatal: false,
            restart_delay_ticks: 15,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tick_ms: u64,
    pub physics: Physics,
    pub rules: GameRules,
    pub audio: AudioConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            physics: Physics::default(),
            rules: GameRules::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise the platform config file if one
    /// exists, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.exists() => p,
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let all = [
            ("gravity", p.gravity),
            ("lift", p.lift),
            ("obstacle_speed", p.obstacle_speed),
            ("gap_size", p.gap_size),
            ("pipe_width", p.pipe_width),
            ("pipe_spacing", p.pipe_spacing),
            ("gap_band", p.gap_band),
            ("ground_height", p.ground_height),
            ("bird_x", p.bird_x),
            ("bird_width", p.bird_width),
            ("bird_height", p.bird_height),
            ("reference_height", p.reference_height),
        ];
        for (name, value) in all {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "physics.{name} must be a finite number, got {value}"
                )));
            }
        }
        if p.bird_x < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.bird_x must not be negative, got {}",
                p.bird_x
            )));
        }
        let positive = [
            ("gravity", p.gravity),
            ("obstacle_speed", p.obstacle_speed),
            ("gap_size", p.gap_size),
            ("pipe_width", p.pipe_width),
            ("pipe_spacing", p.pipe_spacing),
            ("bird_width", p.bird_width),
            ("bird_height", p.bird_height),
            ("reference_height", p.reference_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "physics.{name} must be positive, got {value}"
                )));
            }
        }
        if !(p.lift < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.lift must be negative (up), got {}",
                p.lift
            )));
        }
        if p.ground_height < 0.0 || p.ground_height >= p.reference_height {
            return Err(ConfigError::Invalid(format!(
                "physics.ground_height must be in [0, {}), got {}",
                p.reference_height, p.ground_height
            )));
        }
        if p.gap_size <= p.bird_height {
            return Err(ConfigError::Invalid(format!(
                "physics.gap_size ({}) must exceed bird_height ({})",
                p.gap_size, p.bird_height
            )));
        }
        if p.gap_band < p.gap_size {
            return Err(ConfigError::Invalid(format!(
                "physics.gap_band ({}) must be at least gap_size ({})",
                p.gap_band, p.gap_size
            )));
        }
        if let Some(seed) = self.rules.seed {
            // TOML integers are signed 64-bit.
            if seed > i64::MAX as u64 {
                return Err(ConfigError::Invalid(format!(
                    "rules.seed must be at most {}, got {seed}",
                    i64::MAX
                )));
            }
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(ConfigError::Invalid(format!(
                "audio.volume must be in [0, 1], got {}",
                self.audio.volume
            )));
        }
        Ok(())
    }
}

/// `<platform config dir>/config.toml`, e.g. `~/.config/flapper/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flapper").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            tick_ms = 33

            [physics]
            gravity = 0.4
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_ms, 33);
        assert_eq!(config.physics.gravity, 0.4);
        assert_eq!(config.physics.lift, -7.0);
        assert_eq!(config.rules.initial_pipes, 3);
    }

    #[test]
    fn rejects_upward_gravity() {
        let err = Config::from_toml_str("[physics]\ngravity = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_downward_lift() {
        let err = Config::from_toml_str("[physics]\nlift = 3.0\n").unwrap_err();
        assert!(err.to_string().contains("lift"));
    }

    #[test]
    fn rejects_gap_smaller_than_bird() {
        let err = Config::from_toml_str("[physics]\ngap_size = 10.0\n").unwrap_err();
        assert!(err.to_string().contains("gap_size"));
    }

    #[test]
    fn rejects_non_finite_physics() {
        for field in ["gap_band", "gravity", "ground_height", "bird_x", "lift"] {
            for value in ["nan", "inf", "-inf"] {
                let text = format!("[physics]\n{field} = {value}\n");
                let err = Config::from_toml_str(&text).unwrap_err();
                assert!(matches!(err, ConfigError::Invalid(_)), "{field} = {value}");
            }
        }
    }

    #[test]
    fn rejects_seed_toml_cannot_hold() {
        let mut config = Config::default();
        config.rules.seed = Some(u64::MAX);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.rules.seed = Some(i64::MAX as u64);
        config.validate().unwrap();
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap().rules.seed, Some(i64::MAX as u64));
    }

    #[test]
    fn rejects_zero_tick() {
        assert!(Config::from_toml_str("tick_ms = 0\n").is_err());
    }

    #[test]
    fn rejects_garbage() {
        let err = Config::from_toml_str("tick_ms = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_dump_parses_back() {
        let mut config = Config::default();
        config.rules.seed = Some(42);
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/flapper.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
