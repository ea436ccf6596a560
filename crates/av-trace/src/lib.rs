//! Step traces and producers for the visualization platform
//!
//! A trace is a finite, ordered sequence of immutable steps describing the
//! state of an algorithm at each instant of its execution, plus per-run
//! summary statistics. Traces are computed once per run request and consumed
//! read-only by the playback engine.

pub mod catalog;
pub mod producer;
pub mod searching;
pub mod sorting;
pub mod step;

use thiserror::Error;

// Re-exports
pub use catalog::{AlgorithmInfo, SearchAlgorithm, SortAlgorithm, CATALOG};
pub use producer::{ComputeRequest, LocalProducer, StepProducer, Trace};
pub use step::{SearchingStep, SearchingTrace, SortingStep, SortingTrace};

/// Errors that can occur at the step-producer boundary.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Malformed request; reported inline, playback never starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown algorithm '{name}' (available: {available})")]
    UnknownAlgorithm { name: String, available: String },

    /// Step computation failed at the boundary; retryable. The playback
    /// session stays empty and stopped.
    #[error("step producer unavailable: {0}")]
    ProducerUnavailable(String),
}
