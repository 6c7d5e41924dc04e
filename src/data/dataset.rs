//! Categorical dataset with cheap, immutable row views
//!
//! A [`Dataset`] is a shared table plus the list of row positions it exposes.
//! Filtering and partitioning build new views over the same backing table and
//! never touch the parent, so every view stays valid for as long as it lives.

use crate::error::{Id3Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug)]
struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    cells: Vec<Vec<String>>,
}

/// Read-only view over rows of a categorical table
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Arc<Table>,
    rows: Arc<[usize]>,
}

/// One row of a [`Dataset`], addressable by column name
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    index: &'a HashMap<String, usize>,
    values: &'a [String],
}

impl<'a> Row<'a> {
    /// Value of the named column, if the column exists
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.index.get(column).map(|&i| self.values[i].as_str())
    }

    /// Value at a column position
    pub fn value(&self, position: usize) -> Option<&'a str> {
        self.values.get(position).map(String::as_str)
    }

    /// `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.columns
            .iter()
            .zip(self.values.iter())
            .map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

impl Dataset {
    /// Build a dataset from named columns of equal length
    pub fn from_columns<S, V>(columns: Vec<(S, Vec<V>)>) -> Result<Self>
    where
        S: Into<String>,
        V: Into<String>,
    {
        let mut names = Vec::with_capacity(columns.len());
        let mut data: Vec<Vec<String>> = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            names.push(name.into());
            data.push(values.into_iter().map(Into::into).collect());
        }

        let n_rows = data.first().map_or(0, Vec::len);
        if let Some((name, col)) = names.iter().zip(&data).find(|(_, c)| c.len() != n_rows) {
            return Err(Id3Error::InvalidInput(format!(
                "column '{}' has {} values, expected {}",
                name,
                col.len(),
                n_rows
            )));
        }

        let mut iters: Vec<_> = data.into_iter().map(Vec::into_iter).collect();
        let cells = (0..n_rows)
            .map(|_| iters.iter_mut().filter_map(Iterator::next).collect())
            .collect();

        Self::from_rows(names, cells)
    }

    /// Build a dataset from a header and row-major cells
    pub fn from_rows(columns: Vec<String>, cells: Vec<Vec<String>>) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(Id3Error::InvalidInput(format!("duplicate column '{}'", name)));
            }
        }

        if let Some((i, row)) = cells.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(Id3Error::InvalidInput(format!(
                "row {} has {} values, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }

        let rows: Arc<[usize]> = (0..cells.len()).collect();
        Ok(Self {
            table: Arc::new(Table { columns, index, cells }),
            rows,
        })
    }

    /// Number of rows in this view
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in declared order
    pub fn columns(&self) -> &[String] {
        &self.table.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.index.contains_key(name)
    }

    /// Position of a column in declared order
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.table.index.get(name).copied()
    }

    /// Values of the column at `position`, in row order
    pub fn values_at(&self, position: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |&r| self.table.cells[r][position].as_str())
    }

    /// Values of a named column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        self.column_position(name)
            .map(|pos| self.values_at(pos).collect())
    }

    /// Distinct values of a column in first-seen order
    pub fn distinct(&self, name: &str) -> Option<Vec<&str>> {
        let pos = self.column_position(name)?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for value in self.values_at(pos) {
            if seen.insert(value) {
                out.push(value);
            }
        }
        Some(out)
    }

    /// Row at `i` within this view
    pub fn row(&self, i: usize) -> Option<Row<'_>> {
        self.rows.get(i).map(|&r| self.make_row(r))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |&r| self.make_row(r))
    }

    /// New view holding the rows for which `predicate` is true
    pub fn filter_rows<F>(&self, predicate: F) -> Dataset
    where
        F: Fn(&Row<'_>) -> bool,
    {
        let rows: Arc<[usize]> = self
            .rows
            .iter()
            .copied()
            .filter(|&r| predicate(&self.make_row(r)))
            .collect();
        Dataset {
            table: Arc::clone(&self.table),
            rows,
        }
    }

    /// Group rows by their value for `attribute`
    ///
    /// Groups come back in first-seen row order and only observed values
    /// become keys, so no group is ever empty.
    pub fn partition_by(&self, attribute: &str) -> Result<Vec<(String, Dataset)>> {
        let pos = self
            .column_position(attribute)
            .ok_or_else(|| Id3Error::FeatureNotFound(attribute.to_string()))?;

        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
        for &r in self.rows.iter() {
            let value = self.table.cells[r][pos].as_str();
            let slot = *slots.entry(value).or_insert_with(|| {
                groups.push((value, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(r);
        }

        Ok(groups
            .into_iter()
            .map(|(value, rows)| {
                let view = Dataset {
                    table: Arc::clone(&self.table),
                    rows: rows.into(),
                };
                (value.to_string(), view)
            })
            .collect())
    }

    fn make_row(&self, r: usize) -> Row<'_> {
        Row {
            columns: &self.table.columns,
            index: &self.table.index,
            values: &self.table.cells[r],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns(vec![
            ("color", vec!["red", "blue", "red", "green"]),
            ("size", vec!["s", "m", "l", "s"]),
            ("label", vec!["a", "b", "a", "b"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_columns_shape() {
        let ds = sample();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.columns(), &["color", "size", "label"]);
        assert_eq!(ds.row(1).unwrap().get("size"), Some("m"));
        assert_eq!(ds.row(1).unwrap().get("weight"), None);
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = Dataset::from_columns(vec![("a", vec!["1", "2"]), ("b", vec!["1"])]);
        assert!(matches!(result, Err(Id3Error::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = Dataset::from_rows(
            vec!["a".to_string(), "a".to_string()],
            vec![vec!["1".to_string(), "2".to_string()]],
        );
        assert!(matches!(result, Err(Id3Error::InvalidInput(_))));
    }

    #[test]
    fn test_filter_rows_leaves_parent_untouched() {
        let ds = sample();
        let reds = ds.filter_rows(|row| row.get("color") == Some("red"));

        assert_eq!(reds.len(), 2);
        assert_eq!(reds.column("size").unwrap(), vec!["s", "l"]);
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.column("color").unwrap(), vec!["red", "blue", "red", "green"]);
    }

    #[test]
    fn test_partition_first_seen_order() {
        let ds = sample();
        let parts = ds.partition_by("color").unwrap();
        let keys: Vec<&str> = parts.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["red", "blue", "green"]);
        assert!(parts.iter().all(|(_, v)| !v.is_empty()));
        assert_eq!(parts.iter().map(|(_, v)| v.len()).sum::<usize>(), ds.len());
    }

    #[test]
    fn test_partition_of_view() {
        let ds = sample();
        let small = ds.filter_rows(|row| row.get("size") == Some("s"));
        let parts = small.partition_by("label").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].1.column("color").unwrap(), vec!["red"]);
        assert_eq!(parts[1].1.column("color").unwrap(), vec!["green"]);
    }

    #[test]
    fn test_partition_unknown_attribute() {
        let ds = sample();
        assert!(matches!(ds.partition_by("shape"), Err(Id3Error::FeatureNotFound(_))));
    }

    #[test]
    fn test_distinct() {
        let ds = sample();
        assert_eq!(ds.distinct("label").unwrap(), vec!["a", "b"]);
        assert!(ds.distinct("missing").is_none());
    }
}
