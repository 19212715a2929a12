//! Monitoring event decoding
//!
//! The handler is invoked once per monitoring event with the event JSON on
//! standard input. Only the metrics section is modeled; everything else the
//! daemon puts in the event (entity, check, annotations) is ignored.

use serde::Deserialize;
use thiserror::Error;

/// Event decode errors
#[derive(Error, Debug)]
pub enum EventError {
    /// Error reading the event from the input stream
    #[error("Failed to read event: {0}")]
    ReadError(#[from] std::io::Error),

    /// Error decoding the event JSON
    #[error("Failed to decode event JSON: {0}")]
    DecodeError(#[from] serde_json::Error),
}

/// One monitoring event
///
/// Events without a metrics section are legal and carry zero points.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    /// Metric points collected for this event
    #[serde(default)]
    pub metrics: Option<EventMetrics>,
}

/// The metrics section of an event
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventMetrics {
    /// Individual observations, in collection order
    #[serde(default)]
    pub points: Vec<MetricPoint>,
}

/// One observation: a named numeric value with an ordered tag set
#[derive(Debug, Clone, Deserialize)]
pub struct MetricPoint {
    /// Dot- or slash-delimited hierarchical identifier
    pub name: String,
    /// Observed value
    pub value: f64,
    /// Collection timestamp, carried but never emitted (the Pushgateway
    /// rejects pushed client timestamps)
    #[serde(default)]
    pub timestamp: i64,
    /// Tags in source order; order is preserved through to label output
    #[serde(default)]
    pub tags: Vec<MetricTag>,
}

/// A single tag name/value pair
#[derive(Debug, Clone, Deserialize)]
pub struct MetricTag {
    pub name: String,
    pub value: String,
}

impl Event {
    /// The event's metric points, empty when no metrics section is present
    pub fn points(&self) -> &[MetricPoint] {
        self.metrics.as_ref().map_or(&[], |m| m.points.as_slice())
    }
}

/// Decode one event from its JSON representation
pub fn parse_event(json: &str) -> Result<Event, EventError> {
    let event: Event = serde_json::from_str(json)?;
    Ok(event)
}

/// Read and decode one event from an input stream
pub fn read_event<R: std::io::Read>(mut reader: R) -> Result<Event, EventError> {
    let mut raw = String::new();
    reader.read_to_string(&mut raw)?;
    parse_event(&raw)
}
