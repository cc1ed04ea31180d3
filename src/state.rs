use std::path::Path;
use std::sync::Arc;

use crate::aggregate::breakdown::{category_breakdown, CategoryCount};
use crate::aggregate::histogram::{price_histogram, HistogramConfig, PriceHistogram};
use crate::aggregate::scatter::{price_vs_odometer, PriceOdometerScatter};
use crate::aggregate::trend::{daily_listing_trend, DailyTrendPoint};
use crate::config::DashboardConfig;
use crate::data::filter::{filter, DateRange, FilterOptions, FilteredView};
use crate::data::loader::{DatasetCache, LoadError};
use crate::data::model::{CategoryColumn, Dataset, HistogramGrouping};

// ---------------------------------------------------------------------------
// Chart inputs
// ---------------------------------------------------------------------------

/// Everything the chart panels draw, recomputed after each interaction.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub breakdowns: Vec<(CategoryColumn, Vec<CategoryCount>)>,
    pub histogram: PriceHistogram,
    pub scatter: PriceOdometerScatter,
    pub trend: Vec<DailyTrendPoint>,
}

impl ChartData {
    fn compute(view: &FilteredView, histogram: &HistogramConfig, regression: bool) -> Self {
        ChartData {
            breakdowns: CategoryColumn::ALL
                .into_iter()
                .map(|col| (col, category_breakdown(view, col)))
                .collect(),
            histogram: price_histogram(view, histogram),
            scatter: price_vs_odometer(view, regression),
            trend: daily_listing_trend(view),
        }
    }
}

/// The loaded dataset with its current filters and derived views.
#[derive(Debug, Clone)]
pub struct Session {
    pub dataset: Arc<Dataset>,
    pub date_range: DateRange,
    pub options: FilterOptions,
    pub view: FilteredView,
    pub charts: ChartData,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Datasets loaded so far, keyed by source.
    cache: DatasetCache,

    /// None until a dataset is loaded.
    pub session: Option<Session>,

    /// Histogram normalisation / grouping toggles.
    pub histogram: HistogramConfig,

    /// Whether the scatter shows an OLS line.
    pub regression: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let histogram = HistogramConfig {
            bins: config.histogram_bins,
            ..Default::default()
        };
        Self {
            config,
            cache: DatasetCache::new(),
            session: None,
            histogram,
            regression: false,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) a dataset and make it current.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        let dataset = self.cache.get_or_load(path)?;
        self.set_dataset(dataset);
        Ok(())
    }

    /// Ingest a dataset, reset the date range to its full span and rebuild views.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        if dataset.is_empty() {
            log::warn!("{} holds no complete listings", dataset.source().display());
        }
        let (start, end) = dataset.date_bounds().unwrap_or_default();
        let date_range = DateRange::new(start, end);
        let options = FilterOptions::derive(
            &dataset,
            date_range,
            None,
            &self.config.preferred_manufacturer,
        );
        let view = filter(&dataset, &options.selection);
        let charts = ChartData::compute(&view, &self.histogram, self.regression);

        self.session = Some(Session {
            dataset,
            date_range,
            options,
            view,
            charts,
        });
        self.status_message = None;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        if let Some(session) = &mut self.session {
            session.date_range = range;
        }
        self.refilter();
    }

    pub fn select_manufacturer(&mut self, manufacturer: &str) {
        if let Some(session) = &mut self.session {
            session.options.selection.manufacturer = Some(manufacturer.to_string());
        }
        self.refilter();
    }

    pub fn select_model_year(&mut self, year: i32) {
        if let Some(session) = &mut self.session {
            session.options.selection.model_year = Some(year);
        }
        self.refilter();
    }

    pub fn set_normalize(&mut self, normalize: bool) {
        self.histogram.normalize = normalize;
        self.recompute_charts();
    }

    pub fn set_grouping(&mut self, grouping: HistogramGrouping) {
        self.histogram.grouping = grouping;
        self.recompute_charts();
    }

    pub fn set_regression(&mut self, regression: bool) {
        self.regression = regression;
        self.recompute_charts();
    }

    /// Re-run the cascade and the filter from the current choices.
    fn refilter(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.options = FilterOptions::derive(
            &session.dataset,
            session.date_range,
            Some(&session.options),
            &self.config.preferred_manufacturer,
        );
        session.view = filter(&session.dataset, &session.options.selection);
        self.recompute_charts();
    }

    fn recompute_charts(&mut self) {
        if let Some(session) = &mut self.session {
            session.charts = ChartData::compute(&session.view, &self.histogram, self.regression);
        }
    }
}
