//! Playback engine implementation

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::debug;

use super::{driver, PlaybackContext, PlaybackSubscriber};
use crate::config::{SpeedConfig, DEFAULT_SPEED};

/// Playback state stored internally.
pub(super) struct PlaybackState<T> {
    pub(super) steps: Arc<[T]>,
    pub(super) current_step: usize,
    pub(super) playing: bool,
    pub(super) speed: u32,
}

/// State shared between the engine facade and its tick driver.
pub(super) struct Shared<T> {
    pub(super) state: Arc<RwLock<PlaybackState<T>>>,
    pub(super) subscribers: Arc<RwLock<Vec<Weak<dyn PlaybackSubscriber>>>>,
    pub(super) config: SpeedConfig,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            subscribers: self.subscribers.clone(),
            config: self.config,
        }
    }
}

/// Deterministic, controllable traversal of a precomputed step sequence.
///
/// All transport operations are total over the current state: out-of-range
/// seeks clamp, operations on an empty trace are no-ops. Auto-advance runs
/// on a tokio timer task, so [`PlaybackEngine::play`] must be called from
/// within a tokio runtime.
pub struct PlaybackEngine<T> {
    shared: Shared<T>,
    /// Bumped on every control change; wakes the driver out of a pending
    /// timer so it re-reads flags and delay before advancing.
    epoch: watch::Sender<u64>,
    driver: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> PlaybackEngine<T> {
    /// Create an engine with no loaded trace.
    pub fn new() -> Self {
        Self::with_config(SpeedConfig::default())
    }

    /// Create an engine with a custom speed-to-delay mapping.
    pub fn with_config(config: SpeedConfig) -> Self {
        let state = PlaybackState {
            steps: Vec::new().into(),
            current_step: 0,
            playing: false,
            speed: DEFAULT_SPEED,
        };
        let (epoch, _) = watch::channel(0);

        Self {
            shared: Shared {
                state: Arc::new(RwLock::new(state)),
                subscribers: Arc::new(RwLock::new(Vec::new())),
                config,
            },
            epoch,
            driver: Mutex::new(None),
        }
    }

    /// Install a freshly computed step sequence.
    ///
    /// Resets the index to 0 and stops playback; the previous trace is
    /// discarded. The sequence is treated as opaque and never mutated.
    pub fn load_trace(&self, steps: Vec<T>) {
        {
            let mut state = self.shared.state.write();
            state.steps = steps.into();
            state.current_step = 0;
            state.playing = false;
        }
        self.bump_epoch();
        self.notify();
    }

    /// Start (or restart) timed playback.
    ///
    /// No-op on an empty trace. When the current step is already the last
    /// one, rewinds to 0 before resuming.
    pub fn play(&self) {
        {
            let mut state = self.shared.state.write();
            if state.steps.is_empty() {
                return;
            }
            if state.current_step + 1 >= state.steps.len() {
                state.current_step = 0;
            }
            state.playing = true;
        }
        self.bump_epoch();
        self.notify();
        self.ensure_driver();
    }

    /// Stop auto-advance, dropping any pending scheduled step. Idempotent.
    pub fn pause(&self) {
        self.shared.state.write().playing = false;
        self.bump_epoch();
        self.notify();
    }

    /// Pause and rewind to the first step.
    pub fn reset(&self) {
        {
            let mut state = self.shared.state.write();
            state.playing = false;
            state.current_step = 0;
        }
        self.bump_epoch();
        self.notify();
    }

    /// Pause, then advance one step (clamped to the last index).
    pub fn step_forward(&self) {
        {
            let mut state = self.shared.state.write();
            state.playing = false;
            let last = state.steps.len().saturating_sub(1);
            state.current_step = (state.current_step + 1).min(last);
        }
        self.bump_epoch();
        self.notify();
    }

    /// Pause, then move back one step (clamped to 0).
    pub fn step_backward(&self) {
        {
            let mut state = self.shared.state.write();
            state.playing = false;
            state.current_step = state.current_step.saturating_sub(1);
        }
        self.bump_epoch();
        self.notify();
    }

    /// Pause, then seek to the given step, clamped to the valid range.
    pub fn go_to_step(&self, step: usize) {
        {
            let mut state = self.shared.state.write();
            state.playing = false;
            state.current_step = step.min(state.steps.len().saturating_sub(1));
        }
        self.bump_epoch();
        self.notify();
    }

    /// Change the speed control value.
    ///
    /// Takes effect on the next scheduled tick: an outstanding timer is
    /// cancelled and re-armed with the new delay, without a pause/resume
    /// cycle and without skipping or duplicating a step.
    pub fn set_speed(&self, speed: u32) {
        self.shared.state.write().speed = speed;
        self.bump_epoch();
        self.notify();
    }

    /// Get the current playback context.
    pub fn context(&self) -> PlaybackContext {
        let state = self.shared.state.read();
        PlaybackContext {
            current_step: state.current_step,
            total_steps: state.steps.len(),
            playing: state.playing,
            speed: state.speed,
        }
    }

    /// The step the playhead currently rests on.
    pub fn current_step(&self) -> Option<T>
    where
        T: Clone,
    {
        let state = self.shared.state.read();
        state.steps.get(state.current_step).cloned()
    }

    /// Add a subscriber; held weakly, dead entries are pruned on notify.
    pub fn subscribe(&self, subscriber: Arc<dyn PlaybackSubscriber>) {
        self.shared
            .subscribers
            .write()
            .push(Arc::downgrade(&subscriber));
    }

    /// Cancel the driver task so no state is mutated after disposal.
    pub fn shutdown(&self) {
        if let Some(handle) = self.driver.lock().take() {
            handle.abort();
            debug!("playback driver shut down");
        }
    }

    fn bump_epoch(&self) {
        self.epoch.send_modify(|epoch| *epoch += 1);
    }

    fn notify(&self) {
        notify_subscribers(&self.shared);
    }

    /// Spawn the tick driver if it is not already running.
    fn ensure_driver(&self) {
        let mut driver = self.driver.lock();
        let running = driver.as_ref().is_some_and(|handle| !handle.is_finished());
        if !running {
            let shared = self.shared.clone();
            let epoch = self.epoch.subscribe();
            *driver = Some(tokio::spawn(driver::run(shared, epoch)));
        }
    }
}

impl<T: Send + Sync + 'static> Default for PlaybackEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for PlaybackEngine<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.driver.lock().take() {
            handle.abort();
        }
    }
}

/// Notify all live subscribers of the current playback context.
pub(super) fn notify_subscribers<T>(shared: &Shared<T>) {
    let context = {
        let state = shared.state.read();
        PlaybackContext {
            current_step: state.current_step,
            total_steps: state.steps.len(),
            playing: state.playing,
            speed: state.speed,
        }
    };
    let mut subscribers = shared.subscribers.write();

    // Remove any dead weak references
    subscribers.retain(|weak| weak.strong_count() > 0);

    for weak in subscribers.iter() {
        if let Some(subscriber) = weak.upgrade() {
            subscriber.on_playback_change(&context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(steps: usize) -> PlaybackEngine<u32> {
        let engine = PlaybackEngine::new();
        engine.load_trace((0..steps as u32).collect());
        engine
    }

    #[test]
    fn empty_engine_is_stopped_at_zero() {
        let engine: PlaybackEngine<u32> = PlaybackEngine::new();
        let context = engine.context();
        assert_eq!(context.current_step, 0);
        assert_eq!(context.total_steps, 0);
        assert!(!context.playing);
    }

    #[test]
    fn transport_stays_in_bounds() {
        let engine = engine_with(5);

        engine.step_backward();
        assert_eq!(engine.context().current_step, 0);

        engine.go_to_step(999);
        assert_eq!(engine.context().current_step, 4);

        engine.step_forward();
        assert_eq!(engine.context().current_step, 4);

        engine.go_to_step(2);
        assert_eq!(engine.context().current_step, 2);

        engine.step_forward();
        assert_eq!(engine.context().current_step, 3);
    }

    #[test]
    fn seek_pauses_playback() {
        let engine = engine_with(5);
        {
            engine.shared.state.write().playing = true;
        }
        engine.go_to_step(1);
        assert!(!engine.context().playing);
    }

    #[test]
    fn load_trace_resets_state() {
        let engine = engine_with(5);
        engine.go_to_step(4);

        engine.load_trace(vec![1, 2, 3]);
        let context = engine.context();
        assert_eq!(context.current_step, 0);
        assert_eq!(context.total_steps, 3);
        assert!(!context.playing);
    }

    #[test]
    fn current_step_follows_the_playhead() {
        let engine = engine_with(3);
        assert_eq!(engine.current_step(), Some(0));
        engine.step_forward();
        assert_eq!(engine.current_step(), Some(1));

        let empty: PlaybackEngine<u32> = PlaybackEngine::new();
        assert_eq!(empty.current_step(), None);
    }

    #[test]
    fn progress_spans_zero_to_one() {
        let engine = engine_with(5);
        assert_eq!(engine.context().progress(), 0.0);
        engine.go_to_step(4);
        assert_eq!(engine.context().progress(), 1.0);

        let single = engine_with(1);
        assert_eq!(single.context().progress(), 0.0);
    }

    #[tokio::test]
    async fn play_on_empty_trace_is_a_no_op() {
        let engine: PlaybackEngine<u32> = PlaybackEngine::new();
        engine.play();
        assert!(!engine.context().playing);
    }

    #[tokio::test]
    async fn play_at_end_rewinds_first() {
        let engine = engine_with(4);
        engine.go_to_step(3);
        engine.play();
        let context = engine.context();
        assert_eq!(context.current_step, 0);
        assert!(context.playing);
        engine.shutdown();
    }
}
