//! Named `f64` columns over a shared time index.

use std::ops::Range;

use crate::error::TableError;
use crate::index::TimeIndex;

/// A named column of values. Missing values are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// One value per index timestamp.
    pub values: Vec<f64>,
}

impl Column {
    /// Creates a column.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A time-indexed table of `f64` columns.
///
/// Column order is insertion order; names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeTable {
    index: TimeIndex,
    columns: Vec<Column>,
}

impl TimeTable {
    /// Creates a table with no columns.
    pub fn new(index: TimeIndex) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Creates a table from an index and columns.
    ///
    /// Later columns replace earlier columns of the same name.
    pub fn from_columns(index: TimeIndex, columns: Vec<Column>) -> Result<Self, TableError> {
        let mut table = Self::new(index);
        for column in columns {
            table.insert_column(column.name, column.values)?;
        }
        Ok(table)
    }

    /// Adds or replaces a column, builder style.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, TableError> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Adds or replaces a column.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::LengthMismatch`] if `values` does not have one
    /// entry per timestamp.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), TableError> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(TableError::LengthMismatch {
                column: name,
                expected: self.index.len(),
                got: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
        Ok(())
    }

    /// Removes and returns a column.
    pub fn remove_column(&mut self, name: &str) -> Option<Vec<f64>> {
        let pos = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(pos).values)
    }

    /// Returns the values of a column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Returns the values of a column or [`TableError::MissingColumn`].
    pub fn require(&self, name: &str) -> Result<&[f64], TableError> {
        self.column(name).ok_or_else(|| TableError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Returns `true` if a column named `name` exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Returns `true` if any column name starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.columns.iter().any(|c| c.name.starts_with(prefix))
    }

    /// Returns column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns all columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Returns the number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the time index.
    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// Returns a table holding only the named columns that exist, in the
    /// order given.
    pub fn select(&self, names: &[&str]) -> Self {
        let columns = names
            .iter()
            .filter_map(|n| self.columns.iter().find(|c| c.name == *n).cloned())
            .collect();
        Self {
            index: self.index.clone(),
            columns,
        }
    }

    /// Keeps the columns for which `keep` returns `true`.
    pub fn retain_columns(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.columns.retain(|c| keep(&c.name));
    }

    /// Returns the columns whose names start with `prefix`, with the prefix
    /// removed.
    pub fn strip_prefix(&self, prefix: &str) -> Self {
        let columns = self
            .columns
            .iter()
            .filter_map(|c| {
                c.name
                    .strip_prefix(prefix)
                    .map(|rest| Column::new(rest, c.values.clone()))
            })
            .collect();
        Self {
            index: self.index.clone(),
            columns,
        }
    }

    /// Returns a copy with `prefix` prepended to every column name.
    pub fn add_prefix(&self, prefix: &str) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(format!("{prefix}{}", c.name), c.values.clone()))
            .collect();
        Self {
            index: self.index.clone(),
            columns,
        }
    }

    /// Returns the rows at positions `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn take_rows(&self, range: Range<usize>) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.values[range.clone()].to_vec()))
            .collect();
        Self {
            index: self.index.slice(range),
            columns,
        }
    }

    /// Splits the table into its index and columns.
    pub fn into_parts(self) -> (TimeIndex, Vec<Column>) {
        (self.index, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use chrono_tz::Australia::Darwin;

    fn index(n: usize) -> TimeIndex {
        let start = Darwin.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        TimeIndex::periods(start, n, TimeDelta::minutes(5)).unwrap()
    }

    fn sample() -> TimeTable {
        TimeTable::new(index(4))
            .with_column("ghi", vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .with_column("k_ghi", vec![0.1, 0.2, 0.3, 0.4])
            .unwrap()
            .with_column("k_dhi", vec![0.5, 0.6, 0.7, 0.8])
            .unwrap()
    }

    #[test]
    fn insert_rejects_wrong_length() {
        let err = TimeTable::new(index(4))
            .with_column("ghi", vec![1.0; 3])
            .unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                column: "ghi".to_string(),
                expected: 4,
                got: 3
            }
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut t = sample();
        t.insert_column("ghi", vec![9.0; 4]).unwrap();
        assert_eq!(t.n_columns(), 3);
        assert_eq!(t.column_names()[0], "ghi");
        assert_eq!(t.column("ghi").unwrap(), &[9.0; 4]);
    }

    #[test]
    fn prefix_views() {
        let t = sample();
        assert!(t.has_prefix("k_"));
        assert!(!t.has_prefix("sp_"));
        let k = t.strip_prefix("k_");
        assert_eq!(k.column_names(), vec!["ghi", "dhi"]);
        assert_eq!(k.column("ghi").unwrap(), &[0.1, 0.2, 0.3, 0.4]);
        let back = k.add_prefix("k_");
        assert_eq!(back.column_names(), vec!["k_ghi", "k_dhi"]);
    }

    #[test]
    fn select_keeps_requested_order_and_skips_absent() {
        let t = sample().select(&["k_dhi", "dni", "ghi"]);
        assert_eq!(t.column_names(), vec!["k_dhi", "ghi"]);
    }

    #[test]
    fn retain_and_remove() {
        let mut t = sample();
        t.retain_columns(|n| !n.starts_with("k_"));
        assert_eq!(t.column_names(), vec!["ghi"]);
        assert_eq!(t.remove_column("ghi"), Some(vec![1.0, 2.0, 3.0, 4.0]));
        assert_eq!(t.remove_column("ghi"), None);
    }

    #[test]
    fn require_reports_missing() {
        let err = sample().require("dni").unwrap_err();
        assert_eq!(err.to_string(), "missing column: dni");
    }

    #[test]
    fn take_rows_slices_index_and_columns() {
        let t = sample().take_rows(1..3);
        assert_eq!(t.len(), 2);
        assert_eq!(t.column("ghi").unwrap(), &[2.0, 3.0]);
        assert_eq!(t.index().freq(), Some(TimeDelta::minutes(5)));
        assert_eq!(t.index().first(), sample().index().get(1));
    }
}
