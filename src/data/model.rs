use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single vehicle listing (one row of the source CSV).
///
/// `model_year` and `date_posted` are always present; rows missing either are
/// dropped by the loader. Every other cell may be missing and is passed
/// through as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub price: Option<f64>,
    pub model_year: i32,
    /// Full model text, e.g. `"ford f-150"`.
    pub model: String,
    /// First whitespace-delimited token of `model`.
    pub manufacturer: String,
    pub condition: Option<String>,
    pub cylinders: Option<f64>,
    pub fuel: Option<String>,
    pub odometer: Option<f64>,
    pub transmission: Option<String>,
    /// The `type` column (body style).
    pub body_type: Option<String>,
    pub paint_color: Option<String>,
    pub is_4wd: Option<bool>,
    pub date_posted: NaiveDateTime,
    pub days_listed: Option<i64>,
}

impl Listing {
    /// Calendar day the listing was posted.
    pub fn posted_day(&self) -> NaiveDate {
        self.date_posted.date()
    }
}

/// Derive the manufacturer from a model string: its first whitespace token.
pub fn manufacturer_of(model: &str) -> Option<&str> {
    model.split_whitespace().next()
}

// ---------------------------------------------------------------------------
// Categorical columns
// ---------------------------------------------------------------------------

/// The closed set of categorical columns that can be broken down or grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryColumn {
    Model,
    Condition,
    Fuel,
    Transmission,
    Type,
}

impl CategoryColumn {
    pub const ALL: [CategoryColumn; 5] = [
        CategoryColumn::Model,
        CategoryColumn::Condition,
        CategoryColumn::Fuel,
        CategoryColumn::Transmission,
        CategoryColumn::Type,
    ];

    /// Column name as it appears in the source header.
    pub fn column_name(self) -> &'static str {
        match self {
            CategoryColumn::Model => "model",
            CategoryColumn::Condition => "condition",
            CategoryColumn::Fuel => "fuel",
            CategoryColumn::Transmission => "transmission",
            CategoryColumn::Type => "type",
        }
    }

    /// Capitalised heading for chart panels.
    pub fn title(self) -> &'static str {
        match self {
            CategoryColumn::Model => "Model",
            CategoryColumn::Condition => "Condition",
            CategoryColumn::Fuel => "Fuel",
            CategoryColumn::Transmission => "Transmission",
            CategoryColumn::Type => "Type",
        }
    }

    /// The value of this column for a listing, if present.
    pub fn value_of(self, listing: &Listing) -> Option<&str> {
        match self {
            CategoryColumn::Model => Some(listing.model.as_str()),
            CategoryColumn::Condition => listing.condition.as_deref(),
            CategoryColumn::Fuel => listing.fuel.as_deref(),
            CategoryColumn::Transmission => listing.transmission.as_deref(),
            CategoryColumn::Type => listing.body_type.as_deref(),
        }
    }
}

/// How the price histogram splits its bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramGrouping {
    #[default]
    None,
    By(CategoryColumn),
}

impl HistogramGrouping {
    /// Every choice offered by the grouping radio row, in display order.
    pub const ALL: [HistogramGrouping; 6] = [
        HistogramGrouping::None,
        HistogramGrouping::By(CategoryColumn::Model),
        HistogramGrouping::By(CategoryColumn::Condition),
        HistogramGrouping::By(CategoryColumn::Fuel),
        HistogramGrouping::By(CategoryColumn::Transmission),
        HistogramGrouping::By(CategoryColumn::Type),
    ];

    pub fn column(self) -> Option<CategoryColumn> {
        match self {
            HistogramGrouping::None => None,
            HistogramGrouping::By(col) => Some(col),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistogramGrouping::None => "none",
            HistogramGrouping::By(col) => col.column_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The cleaned, immutable dataset. Shared as `Arc<Dataset>` once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    source: PathBuf,
    listings: Vec<Listing>,
    dropped_rows: usize,
}

impl Dataset {
    pub fn new(source: impl Into<PathBuf>, listings: Vec<Listing>, dropped_rows: usize) -> Self {
        Dataset {
            source: source.into(),
            listings,
            dropped_rows,
        }
    }

    /// Where the rows were read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Rows discarded at load time for a missing model year or posting date.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Earliest and latest posting day, or `None` for an empty dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut days = self.listings.iter().map(Listing::posted_day);
        let first = days.next()?;
        Some(days.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------
