//! Timed playback behavior: auto-advance, auto-stop, reschedule on control
//! changes, teardown.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep, timeout, Instant};

use av_core::{PlaybackContext, PlaybackEngine, PlaybackSubscriber, SpeedConfig};

/// Subscriber that records every context it is handed.
#[derive(Default)]
struct Recorder {
    contexts: Mutex<Vec<PlaybackContext>>,
}

impl PlaybackSubscriber for Recorder {
    fn on_playback_change(&self, context: &PlaybackContext) {
        self.contexts.lock().push(context.clone());
    }
}

impl Recorder {
    fn indices(&self) -> Vec<usize> {
        self.contexts.lock().iter().map(|c| c.current_step).collect()
    }
}

/// Fast test curve: speed 100 maps to a 20ms tick, speed 1 to 2s.
fn test_config() -> SpeedConfig {
    SpeedConfig {
        base_delay_ms: 2000,
        ms_per_speed_unit: 20,
        min_delay_ms: 20,
    }
}

async fn wait_for(engine: &PlaybackEngine<u32>, predicate: impl Fn(&PlaybackContext) -> bool) {
    timeout(Duration::from_secs(10), async {
        loop {
            if predicate(&engine.context()) {
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("engine did not reach the expected state in time");
}

#[tokio::test]
async fn playback_advances_and_auto_stops_at_the_last_step() {
    let engine = PlaybackEngine::with_config(test_config());
    engine.load_trace(vec![10, 20, 30, 40]);
    engine.set_speed(100);

    engine.play();
    wait_for(&engine, |c| !c.playing).await;

    let context = engine.context();
    assert_eq!(context.current_step, 3, "must stop exactly on the last index");
    assert!(!context.playing, "reaching the end clears the playing flag");
    engine.shutdown();
}

#[tokio::test]
async fn every_tick_advances_by_exactly_one() {
    let engine = PlaybackEngine::with_config(test_config());
    engine.load_trace(vec![0, 1, 2, 3, 4]);
    engine.set_speed(100);

    let recorder = Arc::new(Recorder::default());
    engine.subscribe(recorder.clone());

    engine.play();
    wait_for(&engine, |c| !c.playing).await;

    // Filter to the driver's advances: strictly increasing by one, no skips
    // and no duplicates.
    let mut last = 0;
    for index in recorder.indices() {
        assert!(
            index == last || index == last + 1,
            "index jumped from {last} to {index}"
        );
        last = index;
    }
    assert_eq!(last, 4);
    engine.shutdown();
}

#[tokio::test]
async fn speed_change_mid_playback_reschedules_the_next_tick() {
    let engine = PlaybackEngine::with_config(test_config());
    engine.load_trace(vec![0, 1, 2, 3, 4, 5]);

    // Crawl: one tick every 1980ms.
    engine.set_speed(1);
    engine.play();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(engine.context().current_step, 0);

    // Speeding up must cancel the outstanding slow timer and re-arm with
    // the short delay, not wait out the remainder of the old one.
    let start = Instant::now();
    engine.set_speed(100);
    wait_for(&engine, |c| !c.playing).await;
    assert!(
        start.elapsed() < Duration::from_millis(1500),
        "playback still waited out the old delay after a speed change"
    );
    assert_eq!(engine.context().current_step, 5);
    engine.shutdown();
}

#[tokio::test]
async fn pause_drops_the_pending_advance() {
    let engine = PlaybackEngine::with_config(test_config());
    engine.load_trace(vec![0, 1, 2]);
    engine.set_speed(1);

    engine.play();
    sleep(Duration::from_millis(100)).await;
    engine.pause();

    // Far longer than the armed 1980ms timer: a cancelled advance must not
    // fire late.
    sleep(Duration::from_millis(2500)).await;
    let context = engine.context();
    assert_eq!(context.current_step, 0);
    assert!(!context.playing);
    engine.shutdown();
}

#[tokio::test]
async fn replay_after_completion_starts_from_the_beginning() {
    let engine = PlaybackEngine::with_config(test_config());
    engine.load_trace(vec![7, 8, 9]);
    engine.set_speed(100);

    engine.play();
    wait_for(&engine, |c| !c.playing).await;
    assert_eq!(engine.context().current_step, 2);

    engine.play();
    wait_for(&engine, |c| !c.playing).await;
    assert_eq!(engine.context().current_step, 2);
    engine.shutdown();
}

#[tokio::test]
async fn shutdown_stops_the_driver() {
    let engine = PlaybackEngine::with_config(test_config());
    engine.load_trace(vec![0, 1, 2, 3, 4, 5, 6, 7]);
    engine.set_speed(100);

    engine.play();
    sleep(Duration::from_millis(50)).await;
    engine.shutdown();

    let frozen = engine.context().current_step;
    sleep(Duration::from_millis(300)).await;
    assert_eq!(
        engine.context().current_step,
        frozen,
        "no state may be mutated after teardown"
    );
}

#[tokio::test]
async fn single_step_trace_auto_stops_immediately() {
    let engine = PlaybackEngine::with_config(test_config());
    engine.load_trace(vec![42]);
    engine.set_speed(100);

    engine.play();
    wait_for(&engine, |c| !c.playing).await;
    assert_eq!(engine.context().current_step, 0);
    engine.shutdown();
}
