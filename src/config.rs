//! Editor configuration
//!
//! Every field has a default from `constants`, so a config file only needs
//! the values it changes.

use std::path::{Path, PathBuf};

use egui::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::ConfigError;
use crate::nodes::LayoutMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub layout: LayoutMetrics,
    /// Offset applied to duplicated blocks, as `[x, y]`
    pub duplicate_offset: [f32; 2],
    pub grid_size: f32,
    pub port_pick_radius: f32,
    pub port_drop_radius: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            layout: LayoutMetrics::default(),
            duplicate_offset: constants::editor::DUPLICATE_OFFSET,
            grid_size: constants::editor::GRID_SIZE,
            port_pick_radius: constants::editor::PORT_PICK_RADIUS,
            port_drop_radius: constants::editor::PORT_DROP_RADIUS,
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Platform config location, e.g. `~/.config/blockgraph/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(constants::config::APP_DIR).join(constants::config::FILE_NAME))
    }

    /// Loads the file at `default_path` when it exists, defaults otherwise
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn duplicate_offset(&self) -> Vec2 {
        Vec2::new(self.duplicate_offset[0], self.duplicate_offset[1])
    }

    /// Rounds a world coordinate to the nearest grid point
    pub fn snap_to_grid(&self, value: f32) -> f32 {
        if self.grid_size <= 0.0 {
            return value;
        }
        (value / self.grid_size).round() * self.grid_size
    }
}
