//! Configuration error types.
//!
//! The simulation itself cannot fail; only a bad `twinfire.toml` can. Those
//! problems are reported through [`ConfigError`] and surfaced by the binary
//! with `color_eyre`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The level table has no entries.
    NoLevels,

    /// A screen dimension is zero or too small to hold the play field.
    InvalidScreen {
        width: i32,
        height: i32,
        separation_line: i32,
    },

    /// A level's formation has no columns or no rows.
    EmptyFormation {
        /// 1-based level number.
        level: usize,
    },

    /// A level's formation does not fit between the side margins.
    FormationTooWide {
        level: usize,
        formation_width: u32,
        screen_width: i32,
    },

    /// A level shoots with a zero frequency.
    ZeroShootingFrequency { level: usize },

    /// Starting lives outside `1..=3`.
    StartingLives { got: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoLevels => write!(f, "level table is empty"),
            ConfigError::InvalidScreen {
                width,
                height,
                separation_line,
            } => write!(
                f,
                "invalid screen {}x{} with separation line at {}",
                width, height, separation_line
            ),
            ConfigError::EmptyFormation { level } => {
                write!(f, "level {} has an empty formation", level)
            }
            ConfigError::FormationTooWide {
                level,
                formation_width,
                screen_width,
            } => write!(
                f,
                "level {}: {} columns do not fit a screen {} wide",
                level, formation_width, screen_width
            ),
            ConfigError::ZeroShootingFrequency { level } => {
                write!(f, "level {} has a zero shooting frequency", level)
            }
            ConfigError::StartingLives { got } => {
                write!(f, "starting lives must be between 1 and 3, got {}", got)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
