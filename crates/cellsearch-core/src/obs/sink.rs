//! Metrics sink boundary.
//!
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.
//! This module is the only bridge between mapping/compilation logic and the
//! thread-local metrics state.

use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// DecodeKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DecodeKind {
    Condition,
    Mapper,
    Schema,
    Search,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    SchemaBuilt {
        fields: u64,
    },
    FieldsMaterialized {
        field: &'a str,
        fields: u64,
    },
    CoercionRejected {
        field: &'a str,
    },
    QueryCompiled {
        nodes: u64,
    },
    CompileRejected,
    JsonDecoded {
        kind: DecodeKind,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local metrics state.
/// Used whenever no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::SchemaBuilt { fields } => {
                metrics::with_state_mut(|m| {
                    m.ops.schemas_built = m.ops.schemas_built.saturating_add(1);
                    m.ops.mappers_built = m.ops.mappers_built.saturating_add(fields);
                });
            }

            MetricsEvent::FieldsMaterialized { field, fields } => {
                metrics::with_state_mut(|m| {
                    m.ops.fields_materialized = m.ops.fields_materialized.saturating_add(fields);
                    let entry = m.fields.entry(field.to_string()).or_default();
                    entry.rows_mapped = entry.rows_mapped.saturating_add(1);
                    entry.fields_materialized = entry.fields_materialized.saturating_add(fields);
                });
            }

            MetricsEvent::CoercionRejected { field } => {
                metrics::with_state_mut(|m| {
                    m.ops.coercions_rejected = m.ops.coercions_rejected.saturating_add(1);
                    let entry = m.fields.entry(field.to_string()).or_default();
                    entry.coercions_rejected = entry.coercions_rejected.saturating_add(1);
                });
            }

            MetricsEvent::QueryCompiled { nodes } => {
                metrics::with_state_mut(|m| {
                    m.ops.queries_compiled = m.ops.queries_compiled.saturating_add(1);
                    m.ops.nodes_compiled = m.ops.nodes_compiled.saturating_add(nodes);
                });
            }

            MetricsEvent::CompileRejected => {
                metrics::with_state_mut(|m| {
                    m.ops.compiles_rejected = m.ops.compiles_rejected.saturating_add(1);
                });
            }

            MetricsEvent::JsonDecoded { kind } => {
                metrics::with_state_mut(|m| match kind {
                    DecodeKind::Condition => {
                        m.ops.conditions_decoded = m.ops.conditions_decoded.saturating_add(1);
                    }
                    DecodeKind::Mapper => {
                        m.ops.mappers_decoded = m.ops.mappers_decoded.saturating_add(1);
                    }
                    DecodeKind::Schema => {
                        m.ops.schemas_decoded = m.ops.schemas_decoded.saturating_add(1);
                    }
                    DecodeKind::Search => {
                        m.ops.searches_decoded = m.ops.searches_decoded.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let installed = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match installed {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}
