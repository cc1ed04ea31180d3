use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::StringRecord;
use thiserror::Error;

use super::model::{manufacturer_of, Dataset, Listing};

/// Columns every source file must carry.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "price",
    "model_year",
    "model",
    "condition",
    "fuel",
    "transmission",
    "type",
    "odometer",
    "date_posted",
    "days_listed",
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Always fatal for that source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: empty model, cannot derive manufacturer")]
    MissingModel { row: usize },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean the listings table from a CSV file.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(path, file)
}

/// Load from any reader. `source` is only recorded on the resulting [`Dataset`].
///
/// Cleaning steps:
/// * rows with an empty `model_year` or `date_posted` are dropped
/// * `model_year` is cast to an integer (float text such as `2011.0` is accepted)
/// * `date_posted` is parsed into a timestamp
/// * `manufacturer` is derived from the first token of `model`
pub fn load_reader<R: Read>(source: &Path, reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut listings = Vec::new();
    let mut dropped = 0usize;

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        match parse_row(&columns, &record, row_no + 1)? {
            Some(listing) => listings.push(listing),
            None => dropped += 1,
        }
    }

    log::info!(
        "Loaded {} listings from {} ({} incomplete rows dropped)",
        listings.len(),
        source.display(),
        dropped
    );
    Ok(Dataset::new(source, listings, dropped))
}

// ---------------------------------------------------------------------------
// Dataset cache
// ---------------------------------------------------------------------------

/// Loaded datasets keyed by canonical source path.
///
/// Owned by the application state and passed around explicitly. Paths are
/// remembered as requested, so a repeat request for a file returns the same
/// `Arc` without touching disk, even if the file has since gone away.
#[derive(Debug, Default)]
pub struct DatasetCache {
    /// Requested path -> canonical path.
    aliases: HashMap<PathBuf, PathBuf>,
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.aliases.get(path).and_then(|key| self.entries.get(key)) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(dataset));
        }

        let key = std::fs::canonicalize(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.aliases.insert(path.to_path_buf(), key.clone());

        if let Some(dataset) = self.entries.get(&key) {
            log::debug!("Dataset cache hit for {} via {}", key.display(), path.display());
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(&key)?);
        self.entries.insert(key, Arc::clone(&dataset));
        log::debug!("{} dataset(s) cached", self.entries.len());
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

/// Header positions of the columns we read.
struct ColumnIndex {
    price: usize,
    model_year: usize,
    model: usize,
    condition: usize,
    fuel: usize,
    transmission: usize,
    body_type: usize,
    odometer: usize,
    date_posted: usize,
    days_listed: usize,
    cylinders: Option<usize>,
    paint_color: Option<usize>,
    is_4wd: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self, LoadError> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|&name| position(name).is_none())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        let required = |name: &str| position(name).unwrap_or_default();
        Ok(ColumnIndex {
            price: required("price"),
            model_year: required("model_year"),
            model: required("model"),
            condition: required("condition"),
            fuel: required("fuel"),
            transmission: required("transmission"),
            body_type: required("type"),
            odometer: required("odometer"),
            date_posted: required("date_posted"),
            days_listed: required("days_listed"),
            cylinders: position("cylinders"),
            paint_color: position("paint_color"),
            is_4wd: position("is_4wd"),
        })
    }
}

/// Returns `Ok(None)` for a row that is dropped as incomplete.
fn parse_row(
    columns: &ColumnIndex,
    record: &StringRecord,
    row: usize,
) -> Result<Option<Listing>, LoadError> {
    let (Some(year_text), Some(date_text)) = (
        cell(record, columns.model_year),
        cell(record, columns.date_posted),
    ) else {
        return Ok(None);
    };

    let model_year = parse_whole::<i32>(year_text, row, "model_year")?;
    let date_posted = parse_timestamp(date_text).ok_or_else(|| LoadError::InvalidValue {
        row,
        column: "date_posted",
        value: date_text.to_string(),
    })?;

    let model = cell(record, columns.model).ok_or(LoadError::MissingModel { row })?;
    let manufacturer = manufacturer_of(model).ok_or(LoadError::MissingModel { row })?;

    let optional_f64 = |idx: usize, column: &'static str| {
        cell(record, idx)
            .map(|text| parse_f64(text, row, column))
            .transpose()
    };
    let text = |idx: usize| cell(record, idx).map(str::to_string);

    Ok(Some(Listing {
        price: optional_f64(columns.price, "price")?,
        model_year,
        model: model.to_string(),
        manufacturer: manufacturer.to_string(),
        condition: text(columns.condition),
        cylinders: match columns.cylinders {
            Some(idx) => optional_f64(idx, "cylinders")?,
            None => None,
        },
        fuel: text(columns.fuel),
        odometer: optional_f64(columns.odometer, "odometer")?,
        transmission: text(columns.transmission),
        body_type: text(columns.body_type),
        paint_color: columns.paint_color.and_then(text),
        is_4wd: match columns.is_4wd.and_then(|idx| cell(record, idx)) {
            Some(flag) => Some(parse_flag(flag, row)?),
            None => None,
        },
        date_posted,
        days_listed: cell(record, columns.days_listed)
            .map(|text| parse_whole::<i64>(text, row, "days_listed"))
            .transpose()?,
    }))
}

/// Trimmed cell text; empty cells read as missing.
fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_f64(text: &str, row: usize, column: &'static str) -> Result<f64, LoadError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidValue {
            row,
            column,
            value: text.to_string(),
        })
}

/// A whole number, written either plainly or with a zero fraction (`"2011.0"`).
/// Fractions and values outside `T` are rejected rather than truncated.
fn parse_whole<T: TryFrom<i64>>(text: &str, row: usize, column: &'static str) -> Result<T, LoadError> {
    let invalid = || LoadError::InvalidValue {
        row,
        column,
        value: text.to_string(),
    };
    if let Ok(value) = text.parse::<i64>() {
        return T::try_from(value).map_err(|_| invalid());
    }
    let value = parse_f64(text, row, column)?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(invalid());
    }
    T::try_from(value as i64).map_err(|_| invalid())
}

fn parse_flag(text: &str, row: usize) -> Result<bool, LoadError> {
    match text.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        _ => Err(LoadError::InvalidValue {
            row,
            column: "is_4wd",
            value: text.to_string(),
        }),
    }
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Accepts a bare date (midnight) or a date with time of day.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}
