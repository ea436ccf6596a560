//! The producer boundary feeding the playback engine end to end.

use std::time::Duration;

use tokio::time::{sleep, timeout};

use av_core::{PlaybackEngine, SpeedConfig};
use av_trace::{ComputeRequest, LocalProducer, SortingStep, StepProducer, Trace, TraceError};

fn request(algorithm: &str, array: &[i64], target: Option<i64>) -> ComputeRequest {
    ComputeRequest {
        algorithm: algorithm.to_owned(),
        array: array.to_vec(),
        target,
    }
}

fn fast_engine() -> PlaybackEngine<SortingStep> {
    let engine = PlaybackEngine::with_config(SpeedConfig {
        base_delay_ms: 2000,
        ms_per_speed_unit: 20,
        min_delay_ms: 5,
    });
    engine.set_speed(100);
    engine
}

#[tokio::test]
async fn computed_traces_drive_playback_to_completion() -> anyhow::Result<()> {
    let trace = LocalProducer
        .compute(request("bubble", &[4, 2, 1], None))
        .await?;
    let Trace::Sorting(sorting) = trace else {
        panic!("bubble must produce a sorting trace");
    };
    let total = sorting.steps.len();

    let engine = fast_engine();
    engine.load_trace(sorting.steps);
    engine.play();

    timeout(Duration::from_secs(10), async {
        while engine.context().playing {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await?;

    let context = engine.context();
    assert_eq!(context.current_step, total - 1);
    let last = engine.current_step().expect("trace is non-empty");
    assert_eq!(last.array, vec![1, 2, 4]);
    engine.shutdown();
    Ok(())
}

#[tokio::test]
async fn scrubbing_a_trace_inspects_individual_steps() -> anyhow::Result<()> {
    let trace = LocalProducer
        .compute(request("binary", &[7, 3, 5], Some(5)))
        .await?;
    let Trace::Searching(searching) = trace else {
        panic!("binary must produce a searching trace");
    };

    let engine = PlaybackEngine::new();
    engine.load_trace(searching.steps);
    engine.go_to_step(usize::MAX);
    let last = engine.current_step().expect("trace is non-empty");
    assert_eq!(last.found, Some(true));

    engine.reset();
    assert_eq!(engine.context().current_step, 0);
    Ok(())
}

/// Producer whose backend is unreachable.
struct OfflineProducer;

#[async_trait::async_trait]
impl StepProducer for OfflineProducer {
    async fn compute(&self, _request: ComputeRequest) -> Result<Trace, TraceError> {
        Err(TraceError::ProducerUnavailable("connection refused".to_owned()))
    }

    fn producer_name(&self) -> &str {
        "offline"
    }
}

#[tokio::test]
async fn unavailable_producers_are_reported_as_retryable() {
    let err = OfflineProducer
        .compute(request("bubble", &[1, 2], None))
        .await
        .unwrap_err();
    assert!(matches!(err, TraceError::ProducerUnavailable(_)));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn producer_failure_leaves_the_session_empty_and_stopped() {
    let engine = fast_engine();

    let err = LocalProducer
        .compute(request("bogo", &[1, 2], None))
        .await
        .unwrap_err();
    assert!(matches!(err, TraceError::UnknownAlgorithm { .. }));

    // The error is handled at the call site; nothing was loaded, and play
    // on an empty session stays a no-op.
    let context = engine.context();
    assert_eq!(context.total_steps, 0);
    assert!(!context.playing);
    engine.play();
    assert!(!engine.context().playing);
}
