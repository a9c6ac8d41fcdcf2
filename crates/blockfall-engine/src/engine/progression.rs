use std::time::Duration;

use serde::Serialize;

use super::config::GameConfig;

/// Points per cleared line, multiplied by the current level.
const LINE_CLEAR_POINTS: usize = 100;
/// Flat points awarded for every lock, whether or not lines were cleared.
const LOCK_POINTS: usize = 10;

/// Score, cleared lines, level and gravity speed of a game in progress.
///
/// # Scoring
///
/// Each lock awards `cleared_lines * 100 * level + 10`, using the level in
/// effect before the lock. The flat 10 points are not scaled by level.
///
/// # Leveling
///
/// The level is `floor(total_cleared_lines / lines_per_level) + 1` and the
/// gravity interval shortens with it down to the configured floor.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameConfig, Progression};
///
/// let mut progression = Progression::new(&GameConfig::default());
/// let summary = progression.record_lock(2);
///
/// assert_eq!(summary.points, 210);
/// assert_eq!(progression.score(), 210);
/// assert_eq!(progression.level(), 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Progression {
    score: usize,
    total_cleared_lines: usize,
    level: usize,
    gravity_interval_ms: u64,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
    #[serde(skip)]
    rules: GameConfig,
}

/// What a single lock did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockSummary {
    /// Rows removed by this lock.
    pub cleared_lines: usize,
    /// Score gained by this lock.
    pub points: usize,
    /// Level after the lock.
    pub level: usize,
    /// Whether the gravity interval changed.
    pub speed_changed: bool,
    /// Whether the next piece could not spawn, ending the game.
    pub topped_out: bool,
}

impl Progression {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let rules = config.clone();
        Self {
            score: 0,
            total_cleared_lines: 0,
            level: 1,
            gravity_interval_ms: duration_millis(rules.gravity_interval(1)),
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
            rules,
        }
    }

    /// Returns every counter to its initial value.
    pub fn reset(&mut self) {
        *self = Self::new(&self.rules);
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Current period between gravity ticks.
    #[must_use]
    pub const fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.gravity_interval_ms)
    }

    /// Number of pieces locked into the board.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Lock events by cleared line count: `[0]` locks without a clear,
    /// `[1]` singles, up to `[4]` for four lines at once.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates score, lines, level and speed after a lock that cleared
    /// `cleared_lines` rows.
    pub fn record_lock(&mut self, cleared_lines: usize) -> LockSummary {
        let points = cleared_lines * LINE_CLEAR_POINTS * self.level + LOCK_POINTS;
        self.score += points;
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }

        let previous_interval = self.gravity_interval_ms;
        self.level = self.rules.level_for(self.total_cleared_lines);
        self.gravity_interval_ms = duration_millis(self.rules.gravity_interval(self.level));

        LockSummary {
            cleared_lines,
            points,
            level: self.level,
            speed_changed: self.gravity_interval_ms != previous_interval,
            topped_out: false,
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progression() -> Progression {
        Progression::new(&GameConfig::default())
    }

    #[test]
    fn test_initial_values() {
        let progression = progression();
        assert_eq!(progression.score(), 0);
        assert_eq!(progression.total_cleared_lines(), 0);
        assert_eq!(progression.level(), 1);
        assert_eq!(progression.gravity_interval(), Duration::from_secs(1));
        assert_eq!(progression.completed_pieces(), 0);
    }

    #[test]
    fn test_lock_without_clear_awards_flat_points() {
        let mut progression = progression();
        let summary = progression.record_lock(0);
        assert_eq!(summary.points, 10);
        assert_eq!(progression.score(), 10);
        assert_eq!(progression.line_cleared_counter()[0], 1);
        assert!(!summary.speed_changed);
    }

    #[test]
    fn test_double_at_level_one() {
        let mut progression = progression();
        let summary = progression.record_lock(2);
        assert_eq!(summary.points, 210);
        assert_eq!(progression.total_cleared_lines(), 2);
        assert_eq!(progression.line_cleared_counter()[2], 1);
    }

    #[test]
    fn test_points_use_level_before_lock() {
        let mut progression = progression();
        progression.record_lock(4);
        progression.record_lock(4);
        // 8 lines, still level 1; these 2 lines reach level 2 but score at 1
        let summary = progression.record_lock(2);
        assert_eq!(summary.points, 210);
        assert_eq!(summary.level, 2);

        let summary = progression.record_lock(1);
        assert_eq!(summary.points, 210);
    }

    #[test]
    fn test_level_two_after_ten_lines() {
        let mut progression = progression();
        progression.record_lock(4);
        progression.record_lock(4);
        let summary = progression.record_lock(2);

        assert_eq!(progression.total_cleared_lines(), 10);
        assert_eq!(progression.level(), 2);
        assert_eq!(progression.gravity_interval(), Duration::from_millis(900));
        assert!(summary.speed_changed);
    }

    #[test]
    fn test_gravity_clamped_after_hundred_lines() {
        let mut progression = progression();
        for _ in 0..25 {
            progression.record_lock(4);
        }
        assert_eq!(progression.total_cleared_lines(), 100);
        assert_eq!(progression.level(), 11);
        assert_eq!(progression.gravity_interval(), Duration::from_millis(100));

        for _ in 0..50 {
            let summary = progression.record_lock(4);
            assert!(!summary.speed_changed);
        }
        assert_eq!(progression.level(), 31);
        assert_eq!(progression.gravity_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut progression = progression();
        for _ in 0..5 {
            progression.record_lock(3);
        }
        progression.reset();
        assert_eq!(progression.score(), 0);
        assert_eq!(progression.level(), 1);
        assert_eq!(progression.line_cleared_counter(), &[0; 5]);
        assert_eq!(progression.gravity_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_custom_rules() {
        let config = GameConfig {
            lines_per_level: 2,
            gravity_step_ms: 300,
            min_gravity_ms: 200,
            ..GameConfig::default()
        };
        let mut progression = Progression::new(&config);
        progression.record_lock(2);
        assert_eq!(progression.level(), 2);
        assert_eq!(progression.gravity_interval(), Duration::from_millis(700));
        progression.record_lock(4);
        assert_eq!(progression.level(), 4);
        assert_eq!(progression.gravity_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_serializes_counters() {
        let mut progression = progression();
        progression.record_lock(1);
        let json = serde_json::to_value(&progression).unwrap();
        assert_eq!(json["score"], 110);
        assert_eq!(json["total_cleared_lines"], 1);
        assert_eq!(json["gravity_interval_ms"], 1000);
        assert!(json.get("rules").is_none());
    }
}
