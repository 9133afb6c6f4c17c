//! Dataset store: per-municipality population series loaded from JSON.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::categories::is_excluded;
use crate::models::{Record, YearExtent};


/// Reasons a dataset could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("malformed dataset: {0}")]
    Malformed(String),

    #[error("dataset contains no population records")]
    EmptyDataset,
}


/// One municipality's records, sorted ascending by year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MunicipalitySeries {
    pub name: String,
    pub records: Vec<Record>,
}


/// Immutable store of every municipality series, in document key order.
#[derive(Debug, Clone)]
pub struct Dataset {
    series: Vec<MunicipalitySeries>,
    index: HashMap<String, usize>,
    extent: YearExtent,
}


impl Dataset {
    /// Load a dataset from a JSON file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = Self::from_json_str(&text)?;
        debug!(
            path = %path.display(),
            municipalities = dataset.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse a dataset from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Build a dataset from an already-parsed JSON value.
    ///
    /// The top level must be an object mapping names to arrays of
    /// `{year, population}` objects. Excluded aggregate keys are dropped.
    /// Individual records missing an integer year or a non-negative integer
    /// population are skipped.
    pub fn from_value(value: &Value) -> Result<Self, LoadError> {
        let object = value.as_object().ok_or_else(|| {
            LoadError::Malformed(format!("expected a top-level object, found {}", kind_of(value)))
        })?;

        let mut series = Vec::with_capacity(object.len());
        for (name, entries) in object {
            if is_excluded(name) {
                debug!(name = %name, "skipping excluded key");
                continue;
            }

            let entries = entries.as_array().ok_or_else(|| {
                LoadError::Malformed(format!(
                    "expected an array of records for {}, found {}",
                    name,
                    kind_of(entries)
                ))
            })?;

            let mut records: Vec<Record> = Vec::with_capacity(entries.len());
            for (i, entry) in entries.iter().enumerate() {
                match parse_record(entry) {
                    Some(record) => records.push(record),
                    None => warn!(name = %name, index = i, "skipping malformed record"),
                }
            }
            records.sort_by_key(|r| r.year);

            series.push(MunicipalitySeries { name: name.clone(), records });
        }

        Self::from_series(series)
    }

    /// Build a dataset from series already in memory.
    pub fn from_series(series: Vec<MunicipalitySeries>) -> Result<Self, LoadError> {
        let extent = YearExtent::from_records(series.iter().flat_map(|s| s.records.iter()))
            .ok_or(LoadError::EmptyDataset)?;

        let index = series
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();

        Ok(Self { series, index, extent })
    }

    pub fn year_extent(&self) -> YearExtent {
        self.extent
    }

    /// Municipality names in dataset order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn series(&self) -> &[MunicipalitySeries] {
        &self.series
    }

    pub fn get(&self, name: &str) -> Option<&[Record]> {
        self.index.get(name).map(|&i| self.series[i].records.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}


/// Parse one `{year, population}` object.
fn parse_record(entry: &Value) -> Option<Record> {
    let year = entry.get("year")?.as_i64()?;
    let population = entry.get("population")?.as_u64()?;
    let year = i32::try_from(year).ok()?;
    Some(Record { year, population })
}


fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
