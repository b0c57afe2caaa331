//! Game configuration
//!
//! Loaded from JSON. Every field has a default, so a config file only needs
//! the values it overrides:
//!
//! ```json
//! { "timing": { "fall_interval": 0.5 }, "collapsing_field": { "gravity": 80.0 } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::anim::{
    BlueprintSlotsConfig, CollapsingFieldConfig, FadeConfig, FallingPieceScaleConfig,
    PreviewPiecesConfig, SlidingMenuConfig, UfoConfig,
};
use crate::core::{builtin_levels, AnalyzerWeights, LevelConfig, LevelError, LogicTiming};
use crate::types::MAX_FRAME_DT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("max_frame_dt must be positive, got {0}")]
    InvalidFrameDt(f32),

    #[error("timing.{name} must be a positive number of seconds, got {value}")]
    InvalidTiming { name: &'static str, value: f32 },

    #[error("level {index}: {source}")]
    Level {
        index: u32,
        #[source]
        source: LevelError,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timing: LogicTiming,
    /// Upper bound of the frame step fed to the logic and animations (seconds)
    pub max_frame_dt: f32,
    pub analyzer: AnalyzerWeights,
    pub collapsing_field: CollapsingFieldConfig,
    pub blueprint_slots: BlueprintSlotsConfig,
    pub falling_piece_scale: FallingPieceScaleConfig,
    pub preview_pieces: PreviewPiecesConfig,
    pub ufo: UfoConfig,
    pub fade: FadeConfig,
    pub sliding_menu: SlidingMenuConfig,
    /// Replaces the built-in levels when non-empty
    pub levels: Vec<LevelConfig>,
    pub show_tutorial: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timing: LogicTiming::default(),
            max_frame_dt: MAX_FRAME_DT,
            analyzer: AnalyzerWeights::default(),
            collapsing_field: CollapsingFieldConfig::default(),
            blueprint_slots: BlueprintSlotsConfig::default(),
            falling_piece_scale: FallingPieceScaleConfig::default(),
            preview_pieces: PreviewPiecesConfig::default(),
            ufo: UfoConfig::default(),
            fade: FadeConfig::default(),
            sliding_menu: SlidingMenuConfig::default(),
            levels: Vec::new(),
            show_tutorial: false,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_frame_dt > 0.0) {
            return Err(ConfigError::InvalidFrameDt(self.max_frame_dt));
        }
        let timing = &self.timing;
        for (name, value) in [
            ("spawn_delay", timing.spawn_delay),
            ("fall_interval", timing.fall_interval),
            ("soft_drop_multiplier", timing.soft_drop_multiplier),
            ("landing_delay", timing.landing_delay),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidTiming { name, value });
            }
        }
        for level in &self.levels {
            level.validate().map_err(|source| ConfigError::Level {
                index: level.index,
                source,
            })?;
        }
        Ok(())
    }

    /// The configured levels, or the built-in set
    pub fn levels(&self) -> Vec<LevelConfig> {
        if self.levels.is_empty() {
            builtin_levels()
        } else {
            self.levels.clone()
        }
    }

    pub fn find_level(&self, index: u32) -> Option<LevelConfig> {
        self.levels().into_iter().find(|l| l.index == index)
    }
}
