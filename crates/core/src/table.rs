use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{InsightError, Result};
use crate::value::FieldValue;

/// One row as an ordered column → value map.
pub type Record = IndexMap<String, FieldValue>;

/// In-memory, column-indexed table.
///
/// Columns keep insertion order and can be added mid-run with
/// [`Table::ensure_column`]. Row indices are stable for the lifetime of a
/// processing run; nothing in the engine reorders rows.
///
/// Serializes as a JSON array of row objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct Table {
    columns: IndexMap<String, Vec<FieldValue>>,
    rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from row records. The column set is the union of all
    /// record keys in first-seen order; missing cells become Null.
    pub fn from_records(records: Vec<Record>) -> Self {
        let names: IndexSet<String> = records
            .iter()
            .flat_map(|r| r.keys().cloned())
            .collect();

        let rows = records.len();
        let mut columns: IndexMap<String, Vec<FieldValue>> = names
            .into_iter()
            .map(|name| (name, Vec::with_capacity(rows)))
            .collect();

        for mut record in records {
            for (name, cells) in columns.iter_mut() {
                cells.push(record.swap_remove(name).unwrap_or_default());
            }
        }

        Self { columns, rows }
    }

    /// Build a table from `(column, values)` pairs. Shorter columns are
    /// padded with Null to the longest column.
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<FieldValue>)>,
        S: Into<String>,
    {
        let mut columns: IndexMap<String, Vec<FieldValue>> = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .collect();
        let rows = columns.values().map(Vec::len).max().unwrap_or(0);
        for cells in columns.values_mut() {
            cells.resize(rows, FieldValue::Null);
        }
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Option<&[FieldValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Add the column filled with `default` if it does not exist yet.
    /// Returns true when the column was created.
    pub fn ensure_column(&mut self, name: &str, default: FieldValue) -> bool {
        if self.columns.contains_key(name) {
            return false;
        }
        self.columns
            .insert(name.to_string(), vec![default; self.rows]);
        true
    }

    /// Insert or replace a whole column. Values are padded or truncated to
    /// the table's row count.
    pub fn put_column(&mut self, name: &str, mut values: Vec<FieldValue>) {
        values.resize(self.rows, FieldValue::Null);
        self.columns.insert(name.to_string(), values);
    }

    /// Like [`Table::column`] but reports a missing column as an error.
    pub fn require_column(&self, name: &str) -> Result<&[FieldValue]> {
        self.column(name)
            .ok_or_else(|| InsightError::ColumnNotFound(name.to_string()))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&FieldValue> {
        self.columns.get(column).and_then(|cells| cells.get(row))
    }

    /// Write a single cell. Returns false when the column or row is absent.
    pub fn set(&mut self, row: usize, column: &str, value: FieldValue) -> bool {
        match self.columns.get_mut(column).and_then(|cells| cells.get_mut(row)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Materialize one row as a record.
    pub fn record(&self, row: usize) -> Option<Record> {
        if row >= self.rows {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|(name, cells)| (name.clone(), cells[row].clone()))
                .collect(),
        )
    }

    pub fn to_records(&self) -> Vec<Record> {
        (0..self.rows).filter_map(|row| self.record(row)).collect()
    }

    /// Drop rows whose rendered `column` value was already seen, keeping the
    /// first occurrence. Returns the number of rows removed; a missing column
    /// removes nothing.
    pub fn dedupe_by(&mut self, column: &str) -> usize {
        let Some(cells) = self.columns.get(column) else {
            return 0;
        };

        let mut seen = IndexSet::new();
        let keep: Vec<bool> = cells.iter().map(|v| seen.insert(v.render())).collect();
        let kept = keep.iter().filter(|k| **k).count();
        let removed = self.rows - kept;
        if removed == 0 {
            return 0;
        }

        for cells in self.columns.values_mut() {
            let mut flags = keep.iter();
            cells.retain(|_| *flags.next().unwrap_or(&false));
        }
        self.rows = kept;
        removed
    }

    /// Read a JSON array of row objects.
    pub fn read_json(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let records: Vec<Record> = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_records(records))
    }

    /// Write the table as a pretty-printed JSON array of row objects.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.to_records())?;
        Ok(())
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Table::from_records(records)
    }
}

impl From<Table> for Vec<Record> {
    fn from(table: Table) -> Self {
        table.to_records()
    }
}
