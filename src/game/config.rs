use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    pub fov_degrees: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 800,
            height: 600,
            target_fps: 60,
            fov_degrees: 45.0,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Tuning {
    // The car stays within `[-car_limit, car_limit]` laterally.
    pub car_limit: f32,
    pub car_depth: f32,
    pub car_half_width: f32,
    pub steer_step: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub initial_speed: f32,
    pub speed_step: f32,

    pub scroll_wrap: f32,

    // An obstacle spawns once the timer exceeds `spawn_base / speed` frames.
    pub spawn_base: f32,
    pub spawn_depth: f32,
    pub obstacle_spread: f32,
    pub obstacle_min_size: f32,
    pub obstacle_max_size: f32,
    pub pass_depth: f32,
    pub collision_near: f32,
    pub collision_far: f32,

    pub tree_count: usize,
    pub tree_spacing: f32,
    pub tree_first_depth: f32,
    pub tree_min_offset: f32,
    pub tree_offset_range: f32,
    pub tree_wrap_depth: f32,
    pub tree_loop_length: f32,

    pub pedestrian_start_x: f32,
    pub pedestrian_speed_factor: f32,
    pub pedestrian_wrap_depth: f32,
    pub pedestrian_respawn_depth: f32,
    pub pedestrian_spread: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            car_limit: 4.0,
            car_depth: 5.0,
            car_half_width: 0.75,
            steer_step: 0.1,
            min_speed: 0.2,
            max_speed: 0.8,
            initial_speed: 0.5,
            speed_step: 0.005,
            scroll_wrap: 100.0,
            spawn_base: 100.0,
            spawn_depth: -100.0,
            obstacle_spread: 4.0,
            obstacle_min_size: 0.5,
            obstacle_max_size: 1.0,
            pass_depth: 20.0,
            collision_near: 3.5,
            collision_far: 6.5,
            tree_count: 30,
            tree_spacing: 30.0,
            tree_first_depth: 20.0,
            tree_min_offset: 10.0,
            tree_offset_range: 5.0,
            tree_wrap_depth: 30.0,
            tree_loop_length: 600.0,
            pedestrian_start_x: 3.0,
            pedestrian_speed_factor: 0.2,
            pedestrian_wrap_depth: 20.0,
            pedestrian_respawn_depth: -40.0,
            pedestrian_spread: 4.0,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_speed <= 0.0 {
            return Err(ConfigError::Invalid("min_speed must be positive"));
        }
        if self.min_speed > self.max_speed {
            return Err(ConfigError::Invalid("min_speed exceeds max_speed"));
        }
        if !(self.min_speed..=self.max_speed).contains(&self.initial_speed) {
            return Err(ConfigError::Invalid("initial_speed outside speed bounds"));
        }
        if self.car_limit < 0.0 {
            return Err(ConfigError::Invalid("car_limit must not be negative"));
        }
        if self.collision_near >= self.collision_far {
            return Err(ConfigError::Invalid("collision window is empty"));
        }
        if self.obstacle_min_size >= self.obstacle_max_size {
            return Err(ConfigError::Invalid("obstacle size range is empty"));
        }
        if self.obstacle_spread <= 0.0 || self.pedestrian_spread <= 0.0 || self.tree_offset_range <= 0.0 {
            return Err(ConfigError::Invalid("placement ranges must be positive"));
        }
        if self.tree_loop_length <= 0.0 {
            return Err(ConfigError::Invalid("tree_loop_length must be positive"));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub display: DisplayConfig,
    pub tuning: Tuning,
    // Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
    pub log_level: LevelFilter,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            display: DisplayConfig::default(),
            tuning: Tuning::default(),
            seed: None,
            log_level: LevelFilter::Info,
        }
    }
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid("display size must be non-zero"));
        }
        if self.display.target_fps == 0 {
            return Err(ConfigError::Invalid("target_fps must be non-zero"));
        }
        if !(1.0..180.0).contains(&self.display.fov_degrees) {
            return Err(ConfigError::Invalid("fov_degrees out of range"));
        }
        self.tuning.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "seed": 7, "tuning": { "max_speed": 1.2 } }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.tuning.max_speed, 1.2);
        assert_eq!(config.tuning.min_speed, 0.2);
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn test_log_level_parses() {
        let config = GameConfig::from_json(r#"{ "log_level": "debug" }"#).unwrap();
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_inverted_speed_bounds_rejected() {
        let result = GameConfig::from_json(r#"{ "tuning": { "min_speed": 0.9 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_zero_fps_rejected() {
        let result = GameConfig::from_json(r#"{ "display": { "target_fps": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
