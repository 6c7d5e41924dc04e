//! Data loading utilities
//!
//! Files are read with polars and then flattened into a categorical
//! [`Dataset`]: every cell becomes a string token, and a null cell is an
//! error because the tree builder expects fully labeled data.

use crate::data::Dataset;
use crate::error::{Id3Error, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Data loader for CSV, TSV, JSON and Parquet files
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows used for CSV schema inference; `Some(0)` reads every column as text
    infer_schema_length: Option<usize>,
    has_header: bool,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(0),
            has_header: true,
        }
    }

    /// Let polars infer CSV column types from the first `rows` rows
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        self.load_csv_with_separator(path, b',')
    }

    /// Load a delimited file with a specific separator
    pub fn load_csv_with_separator(&self, path: impl AsRef<Path>, separator: u8) -> Result<DataFrame> {
        let parse_opts = CsvParseOptions::default().with_separator(separator);

        CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(Id3Error::from)
    }

    /// Load a Parquet file
    pub fn load_parquet(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let file = File::open(path)?;
        ParquetReader::new(file).finish().map_err(Id3Error::from)
    }

    /// Load a JSON array or line-delimited JSON file
    pub fn load_json(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let format = if has_extension(path, &["jsonl", "ndjson"]) {
            JsonFormat::JsonLines
        } else {
            JsonFormat::Json
        };
        let file = File::open(path)?;
        JsonReader::new(file)
            .with_json_format(format)
            .finish()
            .map_err(Id3Error::from)
    }

    /// Detect file format from extension and load
    pub fn load_auto(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();

        if has_extension(path, &["tsv"]) {
            self.load_csv_with_separator(path, b'\t')
        } else if has_extension(path, &["parquet", "pq"]) {
            self.load_parquet(path)
        } else if has_extension(path, &["json", "jsonl", "ndjson"]) {
            self.load_json(path)
        } else {
            // Try CSV as default
            self.load_csv(path)
        }
    }

    /// Load any supported file straight into a [`Dataset`]
    pub fn load_dataset(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let df = self.load_auto(path)?;
        let dataset = dataframe_to_dataset(&df)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// Convert a `DataFrame` into a categorical dataset, casting every column to text
pub fn dataframe_to_dataset(df: &DataFrame) -> Result<Dataset> {
    let columns: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
    let mut cells: Vec<Vec<String>> = vec![Vec::with_capacity(columns.len()); df.height()];

    for column in df.get_columns() {
        let series = column.as_materialized_series().cast(&DataType::String)?;
        for (row, value) in series.str()?.into_iter().enumerate() {
            let value = value.ok_or_else(|| Id3Error::MissingValue {
                column: column.name().to_string(),
                row,
            })?;
            cells[row].push(value.to_string());
        }
    }

    Dataset::from_rows(columns, cells)
}

/// Convert a dataset view back into a `DataFrame` of string columns
pub fn dataset_to_dataframe(dataset: &Dataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(pos, name)| {
            let values: Vec<&str> = dataset.values_at(pos).collect();
            Column::new(name.as_str().into(), values)
        })
        .collect();
    DataFrame::new(columns).map_err(Id3Error::from)
}

/// Writes data frames back to disk
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).finish(df).map_err(Id3Error::from)
    }

    /// Save to JSON (array of records)
    pub fn save_json(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        JsonWriter::new(&mut file)
            .with_json_format(JsonFormat::Json)
            .finish(df)
            .map_err(Id3Error::from)
    }

    /// Pick the writer from the file extension; CSV unless it ends in `.json`
    pub fn save_auto(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if has_extension(path, &["json"]) {
            Self::save_json(df, path)?;
        } else {
            Self::save_csv(df, path)?;
        }
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(suffix: &str, lines: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_load_csv_as_text() {
        let file = create_test_file(".csv", &["size,count,label", "s,1,a", "m,02,b", "l,3,a"]);
        let loader = DataLoader::new();

        let df = loader.load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);

        let ds = dataframe_to_dataset(&df).unwrap();
        assert_eq!(ds.columns(), &["size", "count", "label"]);
        assert_eq!(ds.column("count").unwrap(), vec!["1", "02", "3"]);
    }

    #[test]
    fn test_load_tsv() {
        let file = create_test_file(".tsv", &["a\tb", "x\ty", "z\tw"]);
        let ds = DataLoader::new().load_dataset(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("b").unwrap(), vec!["y", "w"]);
    }

    #[test]
    fn test_load_json_lines() {
        let file = create_test_file(
            ".jsonl",
            &[
                r#"{"outlook": "sunny", "play": "no"}"#,
                r#"{"outlook": "rain", "play": "yes"}"#,
            ],
        );
        let ds = DataLoader::new().load_dataset(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("play").unwrap(), vec!["no", "yes"]);
    }

    #[test]
    fn test_missing_value_rejected() {
        let file = create_test_file(".csv", &["a,b", "x,1", ",2"]);
        let result = DataLoader::new().load_dataset(file.path());
        assert!(matches!(result, Err(Id3Error::MissingValue { row: 1, .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = DataLoader::new().load_dataset("/nonexistent/data.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_dataset_round_trip_through_csv() {
        let ds = crate::data::tennis().unwrap();
        let mut df = dataset_to_dataframe(&ds).unwrap();
        assert_eq!(df.height(), 11);

        let out = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        DataSaver::save_auto(&mut df, out.path()).unwrap();

        let back = DataLoader::new().load_dataset(out.path()).unwrap();
        assert_eq!(back.columns(), ds.columns());
        assert_eq!(back.column("Outlook"), ds.column("Outlook"));
    }
}
