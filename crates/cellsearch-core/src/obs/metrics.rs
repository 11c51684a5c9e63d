use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for mapping and compilation work.
/// Thread-local, so concurrent compilation never shares a write.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub fields: BTreeMap<String, FieldCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Schema
    pub schemas_built: u64,
    pub mappers_built: u64,

    // Write path
    pub fields_materialized: u64,
    pub coercions_rejected: u64,

    // Read path
    pub queries_compiled: u64,
    pub nodes_compiled: u64,
    pub compiles_rejected: u64,

    // JSON decoding
    pub conditions_decoded: u64,
    pub mappers_decoded: u64,
    pub schemas_decoded: u64,
    pub searches_decoded: u64,
}

///
/// FieldCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FieldCounters {
    pub rows_mapped: u64,
    pub fields_materialized: u64,
    pub coercions_rejected: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub counters: EventState,
    /// Per-field counters with derived averages, ordered by field name.
    pub field_counters: Vec<FieldSummary>,
}

///
/// FieldSummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub rows_mapped: u64,
    pub fields_materialized: u64,
    pub coercions_rejected: u64,
    pub avg_fields_per_row: f64,
}

/// Build a report from the in-memory counters.
#[must_use]
#[expect(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let field_counters = snap
        .fields
        .iter()
        .map(|(field, c)| FieldSummary {
            field: field.clone(),
            rows_mapped: c.rows_mapped,
            fields_materialized: c.fields_materialized,
            coercions_rejected: c.coercions_rejected,
            avg_fields_per_row: if c.rows_mapped > 0 {
                c.fields_materialized as f64 / c.rows_mapped as f64
            } else {
                0.0
            },
        })
        .collect();

    EventReport {
        counters: snap,
        field_counters,
    }
}
