use thiserror::Error;

pub const DEFAULT_WIDTH: usize = 10;
pub const DEFAULT_HEIGHT: usize = 20;
pub const INITIAL_DROP_MS: u64 = 1000;
pub const MIN_DROP_MS: u64 = 100;
pub const DROP_STEP_MS: u64 = 50;
pub const LINES_PER_LEVEL: u32 = 10;

const MIN_DIMENSION: usize = 4;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board width {0} is too small (minimum {min})", min = MIN_DIMENSION)]
    WidthTooSmall(usize),

    #[error("board height {0} is too small (minimum {min})", min = MIN_DIMENSION)]
    HeightTooSmall(usize),

    #[error("board dimension {0} does not fit in a grid coordinate")]
    DimensionTooLarge(usize),

    #[error("lines per level must be positive")]
    ZeroLinesPerLevel,

    #[error("minimum drop interval {min}ms exceeds initial interval {initial}ms")]
    DropIntervalInverted { min: u64, initial: u64 },
}

/// Tunables for a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub initial_drop_ms: u64,
    pub min_drop_ms: u64,
    /// Interval reduction for every `lines_per_level` lines cleared.
    pub drop_step_ms: u64,
    pub lines_per_level: u32,
    /// Seeds the random piece provider; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            initial_drop_ms: INITIAL_DROP_MS,
            min_drop_ms: MIN_DROP_MS,
            drop_step_ms: DROP_STEP_MS,
            lines_per_level: LINES_PER_LEVEL,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_DIMENSION {
            return Err(ConfigError::WidthTooSmall(self.width));
        }
        if self.height < MIN_DIMENSION {
            return Err(ConfigError::HeightTooSmall(self.height));
        }
        for dim in [self.width, self.height] {
            if dim > i16::MAX as usize / 2 {
                return Err(ConfigError::DimensionTooLarge(dim));
            }
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if self.min_drop_ms > self.initial_drop_ms {
            return Err(ConfigError::DropIntervalInverted {
                min: self.min_drop_ms,
                initial: self.initial_drop_ms,
            });
        }
        Ok(())
    }

    /// Drop interval once `lines` lines have been cleared in total.
    pub fn drop_interval_ms(&self, lines: u32) -> u64 {
        let steps = (lines / self.lines_per_level) as u64;
        self.initial_drop_ms
            .saturating_sub(self.drop_step_ms.saturating_mul(steps))
            .max(self.min_drop_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_narrow_board() {
        let config = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WidthTooSmall(3)));
    }

    #[test]
    fn rejects_zero_lines_per_level() {
        let config = GameConfig {
            lines_per_level: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroLinesPerLevel));
    }

    #[test]
    fn rejects_oversized_board() {
        let width = i16::MAX as usize;
        let config = GameConfig {
            width,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DimensionTooLarge(width)));
    }

    #[test]
    fn rejects_inverted_intervals() {
        let config = GameConfig {
            min_drop_ms: 2000,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DropIntervalInverted { .. })
        ));
    }

    #[test]
    fn drop_interval_speeds_up_and_floors() {
        let config = GameConfig::default();
        assert_eq!(config.drop_interval_ms(0), 1000);
        assert_eq!(config.drop_interval_ms(11), 950);
        assert_eq!(config.drop_interval_ms(100), 500);
        assert_eq!(config.drop_interval_ms(10_000), 100);
    }
}
