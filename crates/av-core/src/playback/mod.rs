use serde::{Deserialize, Serialize};

mod driver;
mod engine;
mod subscriber;

pub use engine::PlaybackEngine;
pub use subscriber::PlaybackSubscriber;

/// Snapshot of playback state passed to subscribers on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackContext {
    /// Current step index, clamped to `[0, total_steps - 1]` (0 when empty).
    pub current_step: usize,
    /// Number of steps in the loaded trace.
    pub total_steps: usize,
    /// Whether the engine is auto-advancing on a timer.
    pub playing: bool,
    /// Current speed control value.
    pub speed: u32,
}

impl PlaybackContext {
    /// Fraction of the trace already played back, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_steps > 1 {
            self.current_step as f64 / (self.total_steps - 1) as f64
        } else {
            0.0
        }
    }

    /// True when the current step is the last one (or the trace is empty).
    pub fn at_end(&self) -> bool {
        self.total_steps == 0 || self.current_step + 1 >= self.total_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_zero_for_short_traces() {
        let context = PlaybackContext { current_step: 0, total_steps: 0, playing: false, speed: 50 };
        assert_eq!(context.progress(), 0.0);
        assert!(context.at_end());

        let single = PlaybackContext { current_step: 0, total_steps: 1, playing: false, speed: 50 };
        assert_eq!(single.progress(), 0.0);
        assert!(single.at_end());
    }

    #[test]
    fn progress_reaches_one_at_the_last_step() {
        let context = PlaybackContext { current_step: 3, total_steps: 4, playing: false, speed: 50 };
        assert_eq!(context.progress(), 1.0);
        assert!(context.at_end());

        let midway = PlaybackContext { current_step: 2, total_steps: 5, playing: true, speed: 50 };
        assert_eq!(midway.progress(), 0.5);
        assert!(!midway.at_end());
    }

    #[test]
    fn context_round_trips_as_json() {
        let context = PlaybackContext { current_step: 2, total_steps: 9, playing: true, speed: 80 };
        let json = serde_json::to_string(&context).unwrap();
        let back: PlaybackContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, context);
    }
}
