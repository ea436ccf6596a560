//! Core playback functionality for the algorithm visualization platform
//!
//! This crate provides the fundamental abstractions for stepping through
//! precomputed algorithm traces (the playback engine) and for controlling
//! live-animated runs (pause/cancel signals with cooperative checkpoints).

pub mod config;
pub mod control;
pub mod playback;

// Re-export commonly used types
pub use config::SpeedConfig;
pub use control::{Cancelled, RunControl, RunId};
pub use playback::{PlaybackContext, PlaybackEngine, PlaybackSubscriber};
