//! Tick driver for timed playback
//!
//! A single long-lived task per engine. While the engine is playing it arms
//! a one-shot timer per step; a control change (pause, seek, speed) bumps
//! the engine's epoch channel, which cancels the outstanding timer and
//! re-reads the flags before any step is taken. This guarantees a speed
//! change reschedules with the new delay without skipping or duplicating a
//! step, and that a pause drops the pending advance.

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::debug;

use super::engine::{notify_subscribers, Shared};

pub(super) async fn run<T: Send + Sync + 'static>(
    shared: Shared<T>,
    mut epoch: watch::Receiver<u64>,
) {
    loop {
        let (playing, at_end, delay) = {
            let state = shared.state.read();
            let at_end = state.steps.is_empty() || state.current_step + 1 >= state.steps.len();
            (state.playing, at_end, shared.config.delay_for(state.speed))
        };

        if playing && at_end {
            // A single-step trace enters playback already at the last index.
            shared.state.write().playing = false;
            debug!("playback reached the last step; auto-stopping");
            notify_subscribers(&shared);
            continue;
        }

        if !playing {
            // Parked until the next control change; exits when the engine
            // is dropped and the epoch channel closes.
            if epoch.changed().await.is_err() {
                return;
            }
            continue;
        }

        tokio::select! {
            _ = sleep(delay) => {
                let advanced = {
                    let mut state = shared.state.write();
                    if state.playing {
                        state.current_step += 1;
                        if state.current_step + 1 >= state.steps.len() {
                            // Auto-stop at the last index; never wrap.
                            state.playing = false;
                        }
                        true
                    } else {
                        // A pause raced the timer; the advance is dropped.
                        false
                    }
                };
                if advanced {
                    notify_subscribers(&shared);
                }
            }
            changed = epoch.changed() => {
                if changed.is_err() {
                    return;
                }
                // Control changed mid-wait: cancel the pending advance and
                // re-arm with freshly read flags and delay.
            }
        }
    }
}
