//! Metric transformation module
//!
//! Groups ungrouped tagged metric points into Prometheus metric families,
//! resolves the job/instance identity, and serializes the text exposition
//! payload.

pub mod engine;
pub mod formatter;

pub use engine::{TransformOutput, Transformer, INSTANCE_TAG, JOB_TAG, TYPE_TAG};
