//! Step-producer boundary
//!
//! The playback side asks a producer for a complete trace and treats the
//! result as opaque. The boundary is async because a producer may be a
//! remote service; [`LocalProducer`] computes in-process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{available_algorithms, SearchAlgorithm, SortAlgorithm};
use crate::step::{SearchingTrace, SortingTrace};
use crate::TraceError;

/// A request for a step trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeRequest {
    pub algorithm: String,
    pub array: Vec<i64>,
    /// Target value; required by searching algorithms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
}

/// A computed trace, tagged by algorithm family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum Trace {
    Sorting(SortingTrace),
    Searching(SearchingTrace),
}

impl Trace {
    pub fn algorithm(&self) -> &str {
        match self {
            Trace::Sorting(trace) => &trace.algorithm,
            Trace::Searching(trace) => &trace.algorithm,
        }
    }

    /// Number of steps in the trace.
    pub fn len(&self) -> usize {
        match self {
            Trace::Sorting(trace) => trace.steps.len(),
            Trace::Searching(trace) => trace.steps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Boundary to whatever computes step traces.
///
/// Implementations must return a finite, ordered, already-complete sequence;
/// consumers never mutate it. On error the caller leaves its playback state
/// empty and stopped.
#[async_trait]
pub trait StepProducer: Send + Sync {
    async fn compute(&self, request: ComputeRequest) -> Result<Trace, TraceError>;

    /// Producer name for diagnostics.
    fn producer_name(&self) -> &str;
}

/// In-process producer backed by the pure step functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProducer;

#[async_trait]
impl StepProducer for LocalProducer {
    async fn compute(&self, request: ComputeRequest) -> Result<Trace, TraceError> {
        if let Ok(algorithm) = request.algorithm.parse::<SortAlgorithm>() {
            info!(%algorithm, len = request.array.len(), "computing sorting trace");
            return Ok(Trace::Sorting(algorithm.run(&request.array)));
        }

        if let Ok(algorithm) = request.algorithm.parse::<SearchAlgorithm>() {
            let target = request.target.ok_or_else(|| {
                TraceError::InvalidInput("searching requires a target value".to_owned())
            })?;
            info!(%algorithm, len = request.array.len(), target, "computing searching trace");
            return Ok(Trace::Searching(algorithm.run(&request.array, target)));
        }

        Err(TraceError::UnknownAlgorithm {
            name: request.algorithm,
            available: available_algorithms(),
        })
    }

    fn producer_name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(algorithm: &str, array: &[i64], target: Option<i64>) -> ComputeRequest {
        ComputeRequest {
            algorithm: algorithm.to_owned(),
            array: array.to_vec(),
            target,
        }
    }

    #[tokio::test]
    async fn computes_sorting_traces() {
        let trace = LocalProducer
            .compute(request("quick", &[3, 1, 2], None))
            .await
            .unwrap();
        assert_eq!(trace.algorithm(), "quick");
        assert!(!trace.is_empty());
        match trace {
            Trace::Sorting(sorting) => {
                assert_eq!(sorting.steps.last().unwrap().array, vec![1, 2, 3]);
            }
            Trace::Searching(_) => panic!("expected a sorting trace"),
        }
    }

    #[tokio::test]
    async fn computes_searching_traces() {
        let trace = LocalProducer
            .compute(request("binary", &[3, 1, 2], Some(2)))
            .await
            .unwrap();
        match trace {
            Trace::Searching(searching) => {
                assert!(searching.found);
                assert_eq!(searching.found_at, Some(1));
            }
            Trace::Sorting(_) => panic!("expected a searching trace"),
        }
    }

    #[tokio::test]
    async fn searching_without_a_target_is_invalid_input() {
        let err = LocalProducer
            .compute(request("linear", &[1, 2], None))
            .await
            .unwrap_err();
        assert!(matches!(err, TraceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_algorithms_are_rejected_with_the_available_list() {
        let err = LocalProducer
            .compute(request("bogo", &[1], None))
            .await
            .unwrap_err();
        match err {
            TraceError::UnknownAlgorithm { name, available } => {
                assert_eq!(name, "bogo");
                assert!(available.contains("bubble"));
                assert!(available.contains("linear"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn requests_round_trip_as_json() {
        let original = request("merge", &[5, 4], None);
        let json = serde_json::to_string(&original).unwrap();
        assert!(!json.contains("target"));
        let back: ComputeRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, original);
    }
}
