//! Runtime configuration loaded from `twinfire.toml`.
//!
//! Every section has compiled-in defaults matching the classic game, so a
//! missing file or a partial file is fine: absent keys keep their defaults.

use std::path::Path;
use std::time::Duration;

use color_eyre::eyre::WrapErr;
use serde::Deserialize;
use tracing::info;

use crate::entities::Tier;
use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "twinfire.toml";

/// Margin kept free on each side of the field by the marching formation.
const FORMATION_SIDE_MARGIN: i32 = 20;
const FORMATION_SEPARATION: i32 = 40;
const ENEMY_WIDTH: i32 = 24;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenConfig,
    pub timing: TimingConfig,
    pub difficulty: Tier,
    pub starting_lives: u8,
    pub levels: Vec<LevelSettings>,
}

/// Logical play-field geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
    /// Y of the line separating the score strip from the field.
    pub separation_line: i32,
}

/// Timings in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub input_delay_ms: u64,
    pub screen_change_ms: u64,
    pub bonus_ship_interval_ms: u64,
    pub bonus_ship_variance_ms: u64,
    pub bonus_ship_explosion_ms: u64,
}

/// One entry of the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LevelSettings {
    /// Columns in the formation.
    pub formation_width: u32,
    /// Rows in the formation.
    pub formation_height: u32,
    /// Frames between formation steps at full strength, before the minimum.
    pub base_speed: u32,
    pub shooting_frequency_ms: u64,
}

impl LevelSettings {
    pub const fn new(
        formation_width: u32,
        formation_height: u32,
        base_speed: u32,
        shooting_frequency_ms: u64,
    ) -> Self {
        Self {
            formation_width,
            formation_height,
            base_speed,
            shooting_frequency_ms,
        }
    }
}

pub const DEFAULT_LEVELS: [LevelSettings; 7] = [
    LevelSettings::new(5, 4, 60, 2000),
    LevelSettings::new(5, 5, 50, 2500),
    LevelSettings::new(6, 5, 40, 1500),
    LevelSettings::new(6, 6, 30, 1500),
    LevelSettings::new(7, 6, 20, 1000),
    LevelSettings::new(7, 7, 10, 1000),
    LevelSettings::new(8, 7, 2, 500),
];

impl Default for Config {
    fn default() -> Self {
        Self {
            screen: ScreenConfig::default(),
            timing: TimingConfig::default(),
            difficulty: Tier::Plain,
            starting_lives: 3,
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 448,
            height: 520,
            separation_line: 40,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            input_delay_ms: 6000,
            screen_change_ms: 1500,
            bonus_ship_interval_ms: 20000,
            bonus_ship_variance_ms: 10000,
            bonus_ship_explosion_ms: 500,
        }
    }
}

impl TimingConfig {
    pub fn input_delay(&self) -> Duration {
        Duration::from_millis(self.input_delay_ms)
    }

    pub fn screen_change(&self) -> Duration {
        Duration::from_millis(self.screen_change_ms)
    }

    pub fn bonus_ship_interval(&self) -> Duration {
        Duration::from_millis(self.bonus_ship_interval_ms)
    }

    pub fn bonus_ship_variance(&self) -> Duration {
        Duration::from_millis(self.bonus_ship_variance_ms)
    }

    pub fn bonus_ship_explosion(&self) -> Duration {
        Duration::from_millis(self.bonus_ship_explosion_ms)
    }
}

impl Config {
    /// Parses and validates a TOML document.
    pub fn from_toml(contents: &str) -> color_eyre::Result<Self> {
        let config: Config = toml::from_str(contents).wrap_err("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load(path: impl AsRef<Path>) -> color_eyre::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .wrap_err_with(|| format!("invalid config in {}", path.display()))?;
        info!(path = %path.display(), levels = config.levels.len(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let screen = &self.screen;
        if screen.width <= 0
            || screen.height <= 0
            || screen.separation_line < 0
            || screen.separation_line >= screen.height
        {
            return Err(ConfigError::InvalidScreen {
                width: screen.width,
                height: screen.height,
                separation_line: screen.separation_line,
            });
        }
        if !(1..=3).contains(&self.starting_lives) {
            return Err(ConfigError::StartingLives {
                got: self.starting_lives,
            });
        }
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        for (i, level) in self.levels.iter().enumerate() {
            let number = i + 1;
            if level.formation_width == 0 || level.formation_height == 0 {
                return Err(ConfigError::EmptyFormation { level: number });
            }
            let span = (level.formation_width as i32 - 1) * FORMATION_SEPARATION + ENEMY_WIDTH;
            if span > screen.width - 2 * FORMATION_SIDE_MARGIN {
                return Err(ConfigError::FormationTooWide {
                    level: number,
                    formation_width: level.formation_width,
                    screen_width: screen.width,
                });
            }
            if level.shooting_frequency_ms == 0 {
                return Err(ConfigError::ZeroShootingFrequency { level: number });
            }
        }
        Ok(())
    }
}
