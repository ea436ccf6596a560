//! Playback subscriber trait

use super::PlaybackContext;

/// Trait for components that need to respond to playback changes.
///
/// Renderers subscribe and re-read the current step from the engine when
/// notified; the context itself carries only indices and flags.
pub trait PlaybackSubscriber: Send + Sync {
    /// Called after every playback state change.
    fn on_playback_change(&self, context: &PlaybackContext);
}
