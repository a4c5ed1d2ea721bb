//! Per-field priority tracking and overwrite history.
//!
//! Rules run from highest to lowest priority, so the first rule to claim a
//! record's field wins it. A later write is accepted only when its priority
//! is strictly greater than the recorded one, which in descending order
//! means every later rule is rejected.

use indexmap::IndexMap;
use insight_core::FieldValue;

/// Priority and history state for one output field.
#[derive(Debug, Clone, PartialEq)]
struct FieldState {
    /// `None` means no rule has written this record yet.
    best: Vec<Option<i64>>,
    history: Vec<Vec<String>>,
}

impl FieldState {
    fn new(rows: usize) -> Self {
        Self {
            best: vec![None; rows],
            history: vec![Vec::new(); rows],
        }
    }
}

/// Priority overwrite tracker for every output field of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct OverwriteTracker {
    rows: usize,
    fields: IndexMap<String, FieldState>,
}

impl OverwriteTracker {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            fields: IndexMap::new(),
        }
    }

    /// Start tracking a field. Tracking the same field twice is a no-op.
    pub fn track(&mut self, field: &str) {
        if !self.fields.contains_key(field) {
            self.fields
                .insert(field.to_string(), FieldState::new(self.rows));
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Whether a write at `priority` would currently be accepted.
    pub fn would_accept(&self, row: usize, field: &str, priority: i64) -> bool {
        self.fields
            .get(field)
            .and_then(|state| state.best.get(row))
            .is_some_and(|best| best.map_or(true, |b| priority > b))
    }

    /// Offer a write. On acceptance the priority is recorded and an entry
    /// `"<field> P<priority>: <value>"` is appended to the record's history.
    pub fn offer(&mut self, row: usize, field: &str, priority: i64, value: &FieldValue) -> bool {
        if !self.would_accept(row, field, priority) {
            return false;
        }
        let Some(state) = self.fields.get_mut(field) else {
            return false;
        };
        state.best[row] = Some(priority);
        state.history[row].push(format!("{} P{}: {}", field, priority, value.render()));
        true
    }

    /// Priority of the rule currently holding the field.
    pub fn best(&self, row: usize, field: &str) -> Option<i64> {
        self.fields
            .get(field)
            .and_then(|state| state.best.get(row).copied().flatten())
    }

    pub fn history(&self, row: usize, field: &str) -> &[String] {
        self.fields
            .get(field)
            .and_then(|state| state.history.get(row))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// One cell per record: the history joined with `separator`, or an
    /// empty string when the record was never written.
    pub fn chain_column(&self, field: &str, separator: &str) -> Vec<FieldValue> {
        (0..self.rows)
            .map(|row| FieldValue::Text(self.history(row, field).join(separator)))
            .collect()
    }
}
