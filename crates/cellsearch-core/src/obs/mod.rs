//! Observability: in-process counters and the sink abstraction.
//!
//! Mapping and compilation code never touches `metrics` directly; every
//! event goes through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EventOps, EventReport, EventState, FieldCounters, FieldSummary};
pub use sink::{
    DecodeKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
