use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::{GameError, Result};

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 10;
/// Largest width or height accepted from a config or a save file.
pub const MAX_FIELD_SIZE: usize = 10;
pub const MIN_SHIP_LEN: usize = 1;
pub const MAX_SHIP_LEN: usize = 4;
/// One 4, two 3s, three 2s, four 1s.
pub const DEFAULT_SHIP_SIZES: [usize; 10] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];
pub const DEFAULT_MAX_ROUNDS: u32 = 3;
pub const DEFAULT_SAVE_DIR: &str = ".";

/// Board dimensions and fleet composition shared by both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub ship_sizes: Vec<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            ship_sizes: DEFAULT_SHIP_SIZES.to_vec(),
        }
    }
}

impl GameConfig {
    pub fn new(width: usize, height: usize, ship_sizes: Vec<usize>) -> Self {
        Self {
            width,
            height,
            ship_sizes,
        }
    }

    /// Reject boards the engine cannot play on.
    pub fn validate(&self) -> Result<()> {
        let dims = 1..=MAX_FIELD_SIZE;
        if !dims.contains(&self.width) || !dims.contains(&self.height) {
            return Err(GameError::Configuration(format!(
                "field size {}x{} is outside 1..={}",
                self.width, self.height, MAX_FIELD_SIZE
            )));
        }
        if self.ship_sizes.is_empty() {
            return Err(GameError::Configuration("no ships configured".into()));
        }
        if let Some(bad) = self
            .ship_sizes
            .iter()
            .find(|&&s| !(MIN_SHIP_LEN..=MAX_SHIP_LEN).contains(&s))
        {
            return Err(GameError::Configuration(format!(
                "ship size {} is outside {}..={}",
                bad, MIN_SHIP_LEN, MAX_SHIP_LEN
            )));
        }
        Ok(())
    }
}

/// Session settings, optionally read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub board: GameConfig,
    pub max_rounds: u32,
    pub save_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: GameConfig::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| GameError::Configuration(e.to_string()))?;
        settings.board.validate()?;
        if settings.max_rounds == 0 {
            return Err(GameError::Configuration(
                "max_rounds must be at least 1".into(),
            ));
        }
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
