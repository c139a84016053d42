use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Width and height of an axis-aligned box, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// All gameplay tuning. Missing fields in a config file fall back to these defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play area width (logical px)
    pub play_width: f32,
    /// Play area height (logical px)
    pub play_height: f32,
    /// Distance between the floor line and the bottom of the play area
    pub floor_margin: f32,

    pub cannon: Size,
    pub projectile: Size,
    pub obstacle: Size,

    /// Projectile rise per tick
    pub projectile_speed: f32,
    /// Obstacle fall per tick at score 0
    pub obstacle_base_speed: f32,
    /// Extra fall per tick for every `speed_score_interval` points
    pub obstacle_speed_step: f32,
    pub speed_score_interval: u32,
    /// One obstacle every this many ticks
    pub spawn_rate: u32,
    pub hit_reward: u32,

    /// Fixed tick interval in milliseconds
    pub tick_interval_ms: u64,
    /// Upper bound on ticks run in a single frame
    pub max_ticks_per_frame: u32,

    /// Cannon pixels moved per unit of tilt
    pub tilt_sensitivity: f32,
    /// Sensor sample interval in milliseconds
    pub sensor_interval_ms: u64,
    /// Tilt reported while a steering key is held
    pub keyboard_tilt: f32,
    /// Without key-release events, a steering key counts as held this long after its last repeat
    pub key_hold_timeout_ms: u64,

    /// Blast sound volume (0.0 - 1.0)
    pub blast_volume: f32,
    /// Persistence key holding the high score
    pub high_score_key: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            play_width: 360.0,
            play_height: 640.0,
            floor_margin: 20.0,

            cannon: Size::new(60.0, 60.0),
            projectile: Size::new(8.0, 15.0),
            obstacle: Size::new(36.0, 36.0),

            projectile_speed: 8.0,
            obstacle_base_speed: 2.6,
            obstacle_speed_step: 0.5,
            speed_score_interval: 300,
            spawn_rate: 14,
            hit_reward: 10,

            tick_interval_ms: 16,
            max_ticks_per_frame: 8,

            tilt_sensitivity: 15.0,
            sensor_interval_ms: 16,
            keyboard_tilt: 0.4,
            key_hold_timeout_ms: 500,

            blast_volume: 0.6,
            high_score_key: "highScore".to_string(),
        }
    }
}

impl GameConfig {
    /// Load tuning from a JSON file, or use defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&raw)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reject tunings the loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("play_width", self.play_width),
            ("play_height", self.play_height),
            ("cannon.w", self.cannon.w),
            ("cannon.h", self.cannon.h),
            ("projectile.w", self.projectile.w),
            ("projectile.h", self.projectile.h),
            ("obstacle.w", self.obstacle.w),
            ("obstacle.h", self.obstacle.h),
            ("projectile_speed", self.projectile_speed),
            ("obstacle_base_speed", self.obstacle_base_speed),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }

        if self.obstacle_speed_step < 0.0 {
            return Err(ConfigError::Invalid {
                field: "obstacle_speed_step",
                reason: "must not be negative",
            });
        }
        if self.floor_margin < 0.0 || self.floor_margin >= self.play_height {
            return Err(ConfigError::Invalid {
                field: "floor_margin",
                reason: "must lie inside the play area",
            });
        }
        if self.spawn_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "spawn_rate",
                reason: "must be at least one tick",
            });
        }
        if self.speed_score_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "speed_score_interval",
                reason: "must be greater than zero",
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_interval_ms",
                reason: "must be greater than zero",
            });
        }
        if self.cannon.w > self.play_width {
            return Err(ConfigError::Invalid {
                field: "cannon.w",
                reason: "cannon is wider than the play area",
            });
        }
        if self.obstacle.w > self.play_width {
            return Err(ConfigError::Invalid {
                field: "obstacle.w",
                reason: "obstacle is wider than the play area",
            });
        }
        if !(0.0..=1.0).contains(&self.blast_volume) {
            return Err(ConfigError::Invalid {
                field: "blast_volume",
                reason: "must be between 0.0 and 1.0",
            });
        }
        Ok(())
    }

    /// Y coordinate of the floor line
    pub fn floor_y(&self) -> f32 {
        self.play_height - self.floor_margin
    }

    /// Rightmost valid cannon x
    pub fn cannon_max_x(&self) -> f32 {
        self.play_width - self.cannon.w
    }

    /// Horizontal position that centers the cannon
    pub fn cannon_start_x(&self) -> f32 {
        self.cannon_max_x() / 2.0
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn sensor_interval(&self) -> Duration {
        Duration::from_millis(self.sensor_interval_ms)
    }

    pub fn key_hold_timeout(&self) -> Duration {
        Duration::from_millis(self.key_hold_timeout_ms)
    }

    /// Obstacle fall speed for the given score
    pub fn obstacle_speed(&self, score: u32) -> f32 {
        let level = score / self.speed_score_interval;
        self.obstacle_base_speed + level as f32 * self.obstacle_speed_step
    }
}

/// File locations, read from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Optional tuning file
    pub config_path: Option<PathBuf>,
    /// High score store
    pub save_path: PathBuf,
    /// Log output (the terminal belongs to the game screen)
    pub log_path: PathBuf,
    /// Blast sound played on every hit
    pub sound_path: PathBuf,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self {
            config_path: env::var_os("TILT_CANNON_CONFIG").map(PathBuf::from),
            save_path: env::var_os("TILT_CANNON_SAVE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tilt_cannon_save.json")),
            log_path: env::var_os("TILT_CANNON_LOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tilt_cannon.log")),
            sound_path: env::var_os("TILT_CANNON_SOUND")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets/sounds/blast.wav")),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.floor_y(), 620.0);
        assert_eq!(config.cannon_start_x(), 150.0);
        assert_eq!(config.key_hold_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "spawn_rate": 20, "cannon": { "w": 40, "h": 30 } }"#)
            .unwrap();
        assert_eq!(config.spawn_rate, 20);
        assert_eq!(config.cannon, Size::new(40.0, 30.0));
        assert_eq!(config.hit_reward, 10);
        assert_eq!(config.high_score_key, "highScore");
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            GameConfig::from_json("{ spawn_rate: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_zero_spawn_rate_is_invalid() {
        let config = GameConfig {
            spawn_rate: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "spawn_rate",
                ..
            })
        ));
    }

    #[test]
    fn test_cannon_wider_than_play_area_is_invalid() {
        let config = GameConfig {
            cannon: Size::new(400.0, 60.0),
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = GameConfig::load(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_obstacle_speed_steps_with_score() {
        let config = GameConfig::default();
        assert!((config.obstacle_speed(0) - 2.6).abs() < 1e-5);
        assert!((config.obstacle_speed(299) - 2.6).abs() < 1e-5);
        assert!((config.obstacle_speed(300) - 3.1).abs() < 1e-5);
        assert!((config.obstacle_speed(650) - 3.6).abs() < 1e-5);
    }
}
