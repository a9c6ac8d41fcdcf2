use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Board dimensions and progression rules.
///
/// The defaults are the standard rules: a 10×20 board, gravity starting at
/// 1000ms and shortening by 100ms per level down to 100ms, one level per
/// 10 cleared lines.
///
/// Missing fields fall back to their defaults when deserializing:
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "board_height": 24 }"#).unwrap();
/// assert_eq!(config.board_width, 10);
/// assert_eq!(config.board_height, 24);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub initial_gravity_ms: u64,
    pub gravity_step_ms: u64,
    pub min_gravity_ms: u64,
    pub lines_per_level: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            initial_gravity_ms: 1000,
            gravity_step_ms: 100,
            min_gravity_ms: 100,
            lines_per_level: 10,
        }
    }
}

impl GameConfig {
    /// Narrowest board on which every piece fits at the spawn column.
    pub const MIN_BOARD_WIDTH: usize = 6;
    pub const MAX_BOARD_WIDTH: usize = 64;
    /// Shortest board that can hold a vertical I.
    pub const MIN_BOARD_HEIGHT: usize = 4;
    pub const MAX_BOARD_HEIGHT: usize = 64;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_BOARD_WIDTH..=Self::MAX_BOARD_WIDTH).contains(&self.board_width) {
            return Err(ConfigError::BoardWidth {
                width: self.board_width,
                min: Self::MIN_BOARD_WIDTH,
                max: Self::MAX_BOARD_WIDTH,
            });
        }
        if !(Self::MIN_BOARD_HEIGHT..=Self::MAX_BOARD_HEIGHT).contains(&self.board_height) {
            return Err(ConfigError::BoardHeight {
                height: self.board_height,
                min: Self::MIN_BOARD_HEIGHT,
                max: Self::MAX_BOARD_HEIGHT,
            });
        }
        if self.min_gravity_ms == 0 {
            return Err(ConfigError::ZeroMinGravity);
        }
        if self.min_gravity_ms > self.initial_gravity_ms {
            return Err(ConfigError::GravityRange {
                min_ms: self.min_gravity_ms,
                initial_ms: self.initial_gravity_ms,
            });
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        Ok(())
    }

    /// Level reached after `total_cleared_lines`, starting at 1.
    #[must_use]
    pub fn level_for(&self, total_cleared_lines: usize) -> usize {
        total_cleared_lines / self.lines_per_level.max(1) + 1
    }

    /// Gravity interval at `level`: `max(min, initial - (level - 1) * step)`.
    #[must_use]
    pub fn gravity_interval(&self, level: usize) -> Duration {
        let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
        let millis = self
            .initial_gravity_ms
            .saturating_sub(steps.saturating_mul(self.gravity_step_ms))
            .max(self.min_gravity_ms);
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let narrow = GameConfig {
            board_width: 5,
            ..GameConfig::default()
        };
        assert_eq!(
            narrow.validate(),
            Err(ConfigError::BoardWidth {
                width: 5,
                min: 6,
                max: 64
            })
        );

        let flat = GameConfig {
            board_height: 3,
            ..GameConfig::default()
        };
        assert!(matches!(
            flat.validate(),
            Err(ConfigError::BoardHeight { height: 3, .. })
        ));

        let zero_min = GameConfig {
            min_gravity_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(zero_min.validate(), Err(ConfigError::ZeroMinGravity));

        let inverted = GameConfig {
            initial_gravity_ms: 50,
            ..GameConfig::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(ConfigError::GravityRange {
                min_ms: 100,
                initial_ms: 50
            })
        );

        let no_levels = GameConfig {
            lines_per_level: 0,
            ..GameConfig::default()
        };
        assert_eq!(no_levels.validate(), Err(ConfigError::ZeroLinesPerLevel));
    }

    #[test]
    fn test_level_for_lines() {
        let config = GameConfig::default();
        assert_eq!(config.level_for(0), 1);
        assert_eq!(config.level_for(9), 1);
        assert_eq!(config.level_for(10), 2);
        assert_eq!(config.level_for(99), 10);
        assert_eq!(config.level_for(100), 11);
    }

    #[test]
    fn test_gravity_interval_curve() {
        let config = GameConfig::default();
        assert_eq!(config.gravity_interval(1), Duration::from_secs(1));
        assert_eq!(config.gravity_interval(2), Duration::from_millis(900));
        assert_eq!(config.gravity_interval(10), Duration::from_millis(100));
        assert_eq!(config.gravity_interval(11), Duration::from_millis(100));
        assert_eq!(config.gravity_interval(1000), Duration::from_millis(100));
    }

    #[test]
    fn test_deserialize_rejects_unknown_fields() {
        let result = serde_json::from_str::<GameConfig>(r#"{ "board_depth": 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_roundtrip_keeps_values() {
        let config = GameConfig {
            board_width: 12,
            lines_per_level: 5,
            ..GameConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
