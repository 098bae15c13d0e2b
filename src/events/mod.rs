//! # Pipeline Events
//!
//! Every pipeline component reports what it did through an injected
//! [`PipelineObserver`] instead of writing to a process-wide logger directly.
//! [`TracingObserver`] forwards events to `tracing`; [`RecordingObserver`]
//! keeps them in memory so callers and tests can inspect a run.

pub mod observer;

pub use observer::{
    PipelineEvent, PipelineObserver, RecordingObserver, SkipReason, TracingObserver,
};
