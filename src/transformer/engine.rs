//! Metric point to Prometheus family conversion
//!
//! This module provides the core transformation that groups ungrouped
//! tagged metric points into Prometheus metric families, resolves the
//! job/instance identity, and serializes the exposition text.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::HandlerConfig;
use crate::event::MetricPoint;

use super::formatter;

/// Tag name selecting the Prometheus job for the whole batch
pub const JOB_TAG: &str = "prom_job";
/// Tag name selecting the Prometheus instance for the whole batch
pub const INSTANCE_TAG: &str = "prom_instance";
/// Tag name declaring the metric type for one point
pub const TYPE_TAG: &str = "prom_type";

static METRIC_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_:][a-zA-Z0-9_:]*$").expect("invalid metric name regex"));

/// Metric transformer
///
/// Holds the identity and typing defaults for one invocation and converts
/// an ordered sequence of metric points into the Prometheus text exposition
/// format.
///
/// # Example
///
/// ```ignore
/// use pushgateway_handler::config::HandlerConfig;
/// use pushgateway_handler::transformer::Transformer;
///
/// let transformer = Transformer::new(&HandlerConfig::default());
/// let output = transformer.transform(event.points());
/// ```
#[derive(Debug, Clone)]
pub struct Transformer {
    default_job: String,
    default_instance: String,
    default_type: String,
    forced_job: String,
    forced_instance: String,
}

/// Result of one transform call
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Resolved Pushgateway job name
    pub job: String,
    /// Resolved Pushgateway instance name
    pub instance: String,
    /// Serialized Prometheus text exposition payload
    pub body: String,
    /// Base names whose later points declared a type differing from the
    /// family's established type, with the conflicting declaration
    pub type_conflicts: HashMap<String, String>,
}

/// One metric family being assembled
///
/// The type is fixed by the first point seen for the base name; sample
/// lines accumulate in point order.
struct MetricFamily {
    metric_type: String,
    samples: Vec<String>,
}

/// Fold state threaded through the point loop
///
/// Job and instance are first-seen-wins across the whole batch; family
/// serialization order is first-seen order.
#[derive(Default)]
struct Accumulator {
    job: Option<String>,
    instance: Option<String>,
    order: Vec<String>,
    families: HashMap<String, MetricFamily>,
    type_conflicts: HashMap<String, String>,
}

impl Transformer {
    /// Create a transformer from the resolved handler configuration
    pub fn new(config: &HandlerConfig) -> Self {
        Self {
            default_job: config.default_job.clone(),
            default_instance: config.default_instance.clone(),
            default_type: config.default_type.clone(),
            forced_job: config.job.clone(),
            forced_instance: config.instance.clone(),
        }
    }

    /// Transform metric points into the Prometheus text exposition format
    ///
    /// Returns the resolved job and instance, the serialized payload, and
    /// the type-conflict diagnostic map. An empty point slice yields an
    /// empty payload with the configured identity.
    pub fn transform(&self, points: &[MetricPoint]) -> TransformOutput {
        let mut acc = Accumulator::default();

        for point in points {
            self.fold_point(&mut acc, point);
        }

        let job = resolve_identity(&self.forced_job, acc.job, &self.default_job);
        let instance = resolve_identity(&self.forced_instance, acc.instance, &self.default_instance);

        let mut body = String::new();
        for base in &acc.order {
            let family = &acc.families[base];
            body.push_str(&formatter::type_line(base, &family.metric_type));
            for sample in &family.samples {
                body.push_str(sample);
            }
        }

        TransformOutput {
            job,
            instance,
            body,
            type_conflicts: acc.type_conflicts,
        }
    }

    /// Process one point: consume control tags, then file the sample line
    /// under its family
    fn fold_point(&self, acc: &mut Accumulator, point: &MetricPoint) {
        let mut effective_type = self.default_type.clone();
        let mut labels: Vec<String> = Vec::new();

        for tag in &point.tags {
            match tag.name.as_str() {
                JOB_TAG => {
                    // Forced configuration wins; otherwise the first
                    // prom_job tag in the batch wins.
                    if self.forced_job.is_empty() && acc.job.is_none() {
                        acc.job = Some(tag.value.clone());
                    }
                }
                INSTANCE_TAG => {
                    if self.forced_instance.is_empty() && acc.instance.is_none() {
                        acc.instance = Some(tag.value.clone());
                    }
                }
                TYPE_TAG => {
                    // Point-local; families keep the type of their first point.
                    effective_type = tag.value.clone();
                }
                _ => labels.push(formatter::label_pair(&tag.name, &tag.value)),
            }
        }

        let sanitized = sanitize_metric_name(&point.name);
        if !METRIC_NAME_RE.is_match(&sanitized) {
            tracing::warn!(
                metric = %sanitized,
                "Metric name does not match the Prometheus identifier grammar"
            );
        }

        let base = family_base_name(&sanitized).to_string();
        let sample = formatter::sample_line(&sanitized, &labels.join(","), point.value);

        match acc.families.get_mut(&base) {
            None => {
                acc.order.push(base.clone());
                acc.families.insert(
                    base,
                    MetricFamily {
                        metric_type: effective_type,
                        samples: vec![sample],
                    },
                );
            }
            Some(family) => {
                if family.metric_type != effective_type {
                    tracing::warn!(
                        family = %base,
                        established = %family.metric_type,
                        declared = %effective_type,
                        "Metric type conflict, keeping established type"
                    );
                    acc.type_conflicts.insert(base, effective_type);
                }
                family.samples.push(sample);
            }
        }
    }
}

/// Resolve job or instance: forced value, then first tag value seen, then
/// the configured default
fn resolve_identity(forced: &str, from_metric: Option<String>, default: &str) -> String {
    if !forced.is_empty() {
        forced.to_string()
    } else {
        from_metric.unwrap_or_else(|| default.to_string())
    }
}

/// Sanitize a metric name for Prometheus
///
/// Dot notation pathed metric names (e.g. from statsd sources) are not
/// valid Prometheus identifiers; every `.` becomes `_`. Idempotent on
/// already-sanitized names.
pub fn sanitize_metric_name(name: &str) -> String {
    name.replace('.', "_")
}

/// Compute the family base name
///
/// Prometheus histograms and summaries use special metric name suffixes
/// which must be stripped before lines can be grouped. At most one trailing
/// suffix is removed, checked in the fixed order `_sum`, `_count`,
/// `_bucket`.
pub fn family_base_name(name: &str) -> &str {
    for suffix in ["_sum", "_count", "_bucket"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return stripped;
        }
    }
    name
}
