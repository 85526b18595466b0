use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for one dungeon run. Pixel units for the canvas and cells,
/// grid-cell units for rooms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub cell_size: i32,
    pub room_count: usize,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub enemy_count: usize,
    pub steps_per_cell: i32,
    pub counter_delay_ms: u64,
    pub max_health: i32,
    pub potion_heal: i32,
    pub potion_drop_percent: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200,
            canvas_height: 800,
            cell_size: 60,
            room_count: 5,
            room_min_size: 3,
            room_max_size: 5,
            enemy_count: 5,
            steps_per_cell: 5,
            counter_delay_ms: 500,
            max_health: 100,
            potion_heal: 20,
            potion_drop_percent: 20,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::Invalid("cell_size must be positive".into()));
        }
        if self.steps_per_cell <= 0 || self.cell_size % self.steps_per_cell != 0 {
            return Err(ConfigError::Invalid(format!(
                "steps_per_cell ({}) must evenly divide cell_size ({})",
                self.steps_per_cell, self.cell_size
            )));
        }
        if self.room_count < 2 {
            return Err(ConfigError::Invalid(
                "room_count must be at least 2 so start and exit rooms differ".into(),
            ));
        }
        if self.room_min_size < 1 || self.room_max_size < self.room_min_size {
            return Err(ConfigError::Invalid(format!(
                "room size range {}..={} is empty",
                self.room_min_size, self.room_max_size
            )));
        }
        if self.grid_width().checked_mul(self.grid_height()).is_none() {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} is too large",
                self.grid_width(),
                self.grid_height()
            )));
        }
        let room_limit = self.grid_width().min(self.grid_height()).saturating_sub(2);
        if self.room_max_size > room_limit {
            return Err(ConfigError::Invalid(format!(
                "grid {}x{} cannot hold a {}-cell room inside a 1-cell border",
                self.grid_width(),
                self.grid_height(),
                self.room_max_size
            )));
        }
        if !(0..=100).contains(&self.potion_drop_percent) {
            return Err(ConfigError::Invalid(
                "potion_drop_percent must be within 0..=100".into(),
            ));
        }
        if self.max_health <= 0 {
            return Err(ConfigError::Invalid("max_health must be positive".into()));
        }
        if self.potion_heal <= 0 {
            return Err(ConfigError::Invalid("potion_heal must be positive".into()));
        }
        Ok(())
    }

    pub fn grid_width(&self) -> i32 {
        self.canvas_width / self.cell_size
    }

    pub fn grid_height(&self) -> i32 {
        self.canvas_height / self.cell_size
    }

    /// Pixel distance covered by a single movement intent.
    pub fn step(&self) -> i32 {
        self.cell_size / self.steps_per_cell
    }

    pub fn counter_delay(&self) -> Duration {
        Duration::from_millis(self.counter_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_canvas_layout() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_width(), 20);
        assert_eq!(config.grid_height(), 13);
        assert_eq!(config.step(), 12);
        assert_eq!(config.counter_delay(), Duration::from_millis(500));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = GameConfig::from_json_str(r#"{ "room_count": 7, "enemy_count": 2 }"#)
            .expect("valid partial config");
        assert_eq!(config.room_count, 7);
        assert_eq!(config.enemy_count, 2);
        assert_eq!(config.cell_size, 60);
    }

    #[test]
    fn single_room_is_rejected() {
        let err = GameConfig::from_json_str(r#"{ "room_count": 1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn uneven_step_is_rejected() {
        let err = GameConfig::from_json_str(r#"{ "steps_per_cell": 7 }"#).unwrap_err();
        assert!(err.to_string().contains("steps_per_cell"));
    }

    #[test]
    fn tiny_canvas_is_rejected() {
        let err = GameConfig::from_json_str(r#"{ "canvas_width": 300 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn non_positive_heal_is_rejected() {
        let err = GameConfig::from_json_str(r#"{ "potion_heal": -500 }"#).unwrap_err();
        assert!(err.to_string().contains("potion_heal"));
        assert!(GameConfig::from_json_str(r#"{ "potion_heal": 0 }"#).is_err());
    }

    #[test]
    fn oversized_room_is_rejected_without_overflow() {
        let err = GameConfig::from_json_str(r#"{ "room_max_size": 2147483647 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn huge_grid_is_rejected() {
        let err = GameConfig::from_json_str(
            r#"{ "canvas_width": 2147483647, "canvas_height": 2147483647, "cell_size": 1, "steps_per_cell": 1 }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn garbage_reports_parse_error() {
        let err = GameConfig::from_json_str("{ room_count: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
