//! Play/pause state of the tree age, as driven by the page controls

use serde::{Deserialize, Serialize};
use crate::config::ConfigError;

/// Bounds of the years control
pub const MIN_YEARS: u32 = 1;
pub const MAX_YEARS: u32 = 99;

/// Playback settings, nested under `playback:` in the config document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Age at which playback stops
    pub max_years: u32,
    /// Tree years per real second
    pub years_per_second: f32,
    /// Seconds between growth ticks
    pub growth_interval: f32,
    /// Seconds between fall frames
    pub fall_interval: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_years: 8,
            years_per_second: 1.0,
            growth_interval: 0.05,
            fall_interval: 1.0 / 60.0,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_YEARS..=MAX_YEARS).contains(&self.max_years) {
            return Err(ConfigError::invalid("max_years", "must lie in 1..=99"));
        }
        if !self.years_per_second.is_finite() || self.years_per_second < 0.0 {
            return Err(ConfigError::invalid("years_per_second", "must be a finite, non-negative number"));
        }
        if !self.growth_interval.is_finite() || self.growth_interval <= 0.0 {
            return Err(ConfigError::invalid("growth_interval", "must be positive"));
        }
        if !self.fall_interval.is_finite() || self.fall_interval <= 0.0 {
            return Err(ConfigError::invalid("fall_interval", "must be positive"));
        }
        Ok(())
    }
}

/// Tree age under play/pause control
#[derive(Debug, Clone)]
pub struct Playback {
    /// Current tree age in years
    pub age: f32,
    /// Playback pauses once the age reaches this
    pub max_years: u32,
    /// Tree years per real second
    pub years_per_second: f32,
    /// Whether growth ticks advance the age
    pub playing: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

impl Playback {
    /// Paused at age zero
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            age: 0.0,
            max_years: config.max_years.clamp(MIN_YEARS, MAX_YEARS),
            years_per_second: config.years_per_second.max(0.0),
            playing: false,
        }
    }

    /// Advance by one growth tick of `interval` seconds.
    /// Returns whether the age changed.
    pub fn step(&mut self, interval: f32) -> bool {
        if !self.playing {
            return false;
        }
        let limit = self.max_years as f32;
        let next = (self.age + self.years_per_second * interval.max(0.0)).min(limit);
        let changed = next != self.age;
        self.age = next;
        if self.age >= limit {
            self.playing = false;
        }
        changed
    }

    /// Play/pause button
    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Start playing. A finished playback stays paused.
    pub fn play(&mut self) {
        self.playing = !self.is_finished();
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Years control. Lowering it below the current age pulls the age back.
    pub fn set_max_years(&mut self, years: u32) {
        self.max_years = years.clamp(MIN_YEARS, MAX_YEARS);
        self.age = self.age.min(self.max_years as f32);
    }

    pub fn set_speed(&mut self, years_per_second: f32) {
        if years_per_second.is_finite() {
            self.years_per_second = years_per_second.max(0.0);
        }
    }

    /// Back to age zero, paused
    pub fn reset(&mut self) {
        self.age = 0.0;
        self.playing = false;
    }

    pub fn is_finished(&self) -> bool {
        self.age >= self.max_years as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_playback_holds_age() {
        let mut playback = Playback::default();
        assert!(!playback.step(0.05));
        assert_eq!(playback.age, 0.0);
    }

    #[test]
    fn test_step_advances_by_speed() {
        let mut playback = Playback::default();
        playback.set_speed(2.0);
        playback.play();
        assert!(playback.step(0.25));
        assert_eq!(playback.age, 0.5);
    }

    #[test]
    fn test_stops_at_max_years() {
        let mut playback = Playback::new(&PlaybackConfig {
            max_years: 2,
            ..Default::default()
        });
        playback.play();
        for _ in 0..100 {
            playback.step(0.05);
        }
        assert_eq!(playback.age, 2.0);
        assert!(!playback.playing);
        assert!(playback.is_finished());

        playback.toggle();
        assert!(!playback.playing);
    }

    #[test]
    fn test_lowering_max_years_pulls_age_back() {
        let mut playback = Playback::default();
        playback.age = 6.5;
        playback.set_max_years(3);
        assert_eq!(playback.age, 3.0);
        playback.set_max_years(500);
        assert_eq!(playback.max_years, MAX_YEARS);
        playback.set_max_years(0);
        assert_eq!(playback.max_years, MIN_YEARS);
    }

    #[test]
    fn test_toggle_and_reset() {
        let mut playback = Playback::default();
        playback.toggle();
        assert!(playback.playing);
        playback.step(1.0);
        playback.toggle();
        assert!(!playback.playing);

        playback.reset();
        assert_eq!(playback.age, 0.0);
        assert!(!playback.playing);
    }

    #[test]
    fn test_config_validation() {
        assert!(PlaybackConfig::default().validate().is_ok());
        let bad = PlaybackConfig {
            growth_interval: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::Invalid { field: "growth_interval", .. })
        ));
    }
}
