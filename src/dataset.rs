// src/dataset.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row-sequencing orchestrator
//!
//! A [`Dataset`] drives its columns in declaration order, once per row,
//! threading the partially built row into each column so later columns can
//! depend on earlier ones. Rows are materialized lazily and never cached:
//! every pass re-invokes every generator.

use std::collections::HashMap;

use serde_json::Value;

use crate::column::Column;
use crate::error::Error;

/// One complete row: values keyed by column name.
///
/// Iteration order over the map is unspecified; column declaration order is
/// held by the [`Dataset`] and applied in the bulk table view.
pub type Row = HashMap<String, Value>;

/// A table-like dataset: an ordered column list and a target row count.
///
/// Column order is significant. During materialization each column may read
/// the values of any column declared before it, never one declared after.
///
/// # Example
/// ```rust
/// use mockset::{Dataset, FnColumn};
/// use serde_json::json;
///
/// let columns: Vec<Box<dyn mockset::Column>> = vec![
///     Box::new(FnColumn::new("id", |_total, row, _prev| Ok(json!(row)))),
/// ];
/// let dataset = Dataset::new(columns, 3).unwrap();
/// assert_eq!(dataset.rows().count(), 3);
/// ```
pub struct Dataset {
    columns: Vec<Box<dyn Column>>,
    row_count: usize,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("columns", &self.columns.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("row_count", &self.row_count)
            .finish()
    }
}

impl Dataset {
    /// Build a dataset from a finalized column list.
    ///
    /// Fails if `row_count` is zero. Column name uniqueness is the caller's
    /// responsibility and is not enforced.
    pub fn new(columns: Vec<Box<dyn Column>>, row_count: usize) -> Result<Self, Error> {
        if row_count == 0 {
            return Err(Error::EmptyDataset);
        }

        tracing::debug!(
            columns = columns.len(),
            rows = row_count,
            "dataset constructed"
        );

        Ok(Self { columns, row_count })
    }

    /// Number of rows a full pass produces.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name()).collect()
    }

    /// Materialize a single row.
    ///
    /// Builds the row by invoking every column in declaration order,
    /// accumulating each produced value under the column's name before the
    /// next column runs. A failing column aborts the whole row.
    ///
    /// Through [`rows`](Self::rows) the first row has `row_number = 1`;
    /// callers managing their own cursor (including concurrent consumers,
    /// which must not share one iterator) may pass any index.
    pub fn row(&self, row_number: usize) -> Result<Row, Error> {
        let mut column_values = Row::with_capacity(self.columns.len());

        for column in &self.columns {
            tracing::trace!(row = row_number, column = %column.name(), "producing value");
            let next_value =
                column.create_value(self.row_count, row_number, &column_values)?;
            column_values.insert(column.name().to_string(), next_value);
        }

        Ok(column_values)
    }

    /// Begin a fresh pass over the dataset.
    ///
    /// Each call returns an independent cursor starting at the first row;
    /// passes never interfere and every pass regenerates every row from
    /// scratch. The pass is finite (exactly [`row_count`](Self::row_count)
    /// rows) and ends early only if a column fails, in which case the error
    /// is yielded once and the iterator is exhausted.
    pub fn rows(&self) -> Rows<'_> {
        tracing::debug!(
            rows = self.row_count,
            columns = self.columns.len(),
            "starting row pass"
        );
        Rows {
            dataset: self,
            cursor: 0,
        }
    }

    /// Bulk 2-D view: a header row of column names, then one row of values
    /// per generated row, in column declaration order throughout.
    ///
    /// This is the shape delimited-text writers and dataframe builders
    /// consume; the conversions themselves live outside this crate.
    pub fn to_table(&self) -> Result<Vec<Vec<Value>>, Error> {
        let column_names = self.column_names();

        let mut table = Vec::with_capacity(self.row_count + 1);
        table.push(column_names.iter().map(|name| Value::from(*name)).collect());

        for row in self.rows() {
            let row = row?;
            table.push(
                column_names
                    .iter()
                    .map(|name| row.get(*name).cloned().unwrap_or(Value::Null))
                    .collect(),
            );
        }

        Ok(table)
    }
}

/// Cursor over one pass of a [`Dataset`].
///
/// The cursor advances before dispatch, so columns observe row numbers
/// starting at 1. Dropping the cursor early is always safe; no resources
/// are held across rows.
pub struct Rows<'a> {
    dataset: &'a Dataset,
    cursor: usize,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.dataset.row_count {
            return None;
        }

        self.cursor += 1;

        match self.dataset.row(self.cursor) {
            Ok(row) => Some(Ok(row)),
            Err(err) => {
                // A failing column aborts the pass, not just the row
                self.cursor = self.dataset.row_count;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dataset.row_count - self.cursor;
        (remaining, Some(remaining))
    }
}
