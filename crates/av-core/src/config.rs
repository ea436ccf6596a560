//! Speed-to-delay mapping shared by the playback engine and live animators

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default speed control value (mid-range, one step per second).
pub const DEFAULT_SPEED: u32 = 50;

/// Maps a speed control value to the delay between steps.
///
/// Speed is an abstract control value; higher speed means a shorter delay.
/// The delay is floored so playback never becomes imperceptible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedConfig {
    /// Delay at speed zero, in milliseconds.
    pub base_delay_ms: u64,

    /// Milliseconds removed from the delay per unit of speed.
    pub ms_per_speed_unit: u64,

    /// Minimum delay between steps, in milliseconds.
    pub min_delay_ms: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        // Speed 5 maps to 2000ms, speed 100 to the 50ms floor.
        Self {
            base_delay_ms: 2000,
            ms_per_speed_unit: 20,
            min_delay_ms: 50,
        }
    }
}

impl SpeedConfig {
    /// Delay before the next automatic advance at the given speed.
    pub fn delay_for(&self, speed: u32) -> Duration {
        let reduction = self.ms_per_speed_unit.saturating_mul(speed as u64);
        let ms = self
            .base_delay_ms
            .saturating_sub(reduction)
            .max(self.min_delay_ms);
        Duration::from_millis(ms)
    }
}
