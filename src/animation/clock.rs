//! Two-cadence tick source: slow growth ticks and fast fall frames,
//! both derived from the frame delta the host hands us

use super::playback::PlaybackConfig;

/// Backlog cap per call; anything beyond is dropped, e.g. after the page
/// was hidden for a while
pub const MAX_TICKS_PER_ADVANCE: u32 = 120;

/// Ticks due since the last [`Clock::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ticks {
    pub growth: u32,
    pub fall: u32,
}

#[derive(Debug, Clone)]
pub struct Clock {
    growth_interval: f32,
    fall_interval: f32,
    growth_elapsed: f32,
    fall_elapsed: f32,
}

impl Clock {
    pub fn new(growth_interval: f32, fall_interval: f32) -> Self {
        Self {
            growth_interval,
            fall_interval,
            growth_elapsed: 0.0,
            fall_elapsed: 0.0,
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.growth_interval, config.fall_interval)
    }

    pub fn growth_interval(&self) -> f32 {
        self.growth_interval
    }

    /// Accumulate `dt` seconds and report the ticks that fell due
    pub fn advance(&mut self, dt: f32) -> Ticks {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        Ticks {
            growth: drain(&mut self.growth_elapsed, self.growth_interval, dt),
            fall: drain(&mut self.fall_elapsed, self.fall_interval, dt),
        }
    }

    pub fn reset(&mut self) {
        self.growth_elapsed = 0.0;
        self.fall_elapsed = 0.0;
    }
}

fn drain(elapsed: &mut f32, interval: f32, dt: f32) -> u32 {
    if interval <= 0.0 {
        return 0;
    }
    *elapsed += dt;
    let due = (*elapsed / interval).floor();
    if due >= MAX_TICKS_PER_ADVANCE as f32 {
        *elapsed = 0.0;
        return MAX_TICKS_PER_ADVANCE;
    }
    *elapsed -= due * interval;
    due as u32
}
