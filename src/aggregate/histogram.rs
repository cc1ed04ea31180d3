use std::collections::HashMap;

use crate::data::filter::FilteredView;
use crate::data::model::HistogramGrouping;

/// Options driven by the histogram panel's checkbox and radio row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistogramConfig {
    /// Express each series as percent of its own total.
    pub normalize: bool,
    pub grouping: HistogramGrouping,
    /// Fixed bin count; chosen automatically when `None`.
    pub bins: Option<usize>,
}

/// Bar heights for one group (or the whole view when ungrouped).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    /// Group value, `None` when ungrouped.
    pub label: Option<String>,
    /// One height per bin: a count, or a percentage when normalised.
    pub heights: Vec<f64>,
    /// Rows that fell into this series.
    pub total: usize,
}

/// Price distribution with bin edges shared by every series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistogram {
    pub start: f64,
    pub bin_width: f64,
    pub bin_count: usize,
    pub normalized: bool,
    pub series: Vec<HistogramSeries>,
}

impl PriceHistogram {
    fn empty(normalized: bool) -> Self {
        PriceHistogram {
            start: 0.0,
            bin_width: 1.0,
            bin_count: 0,
            normalized,
            series: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.start + (bin as f64 + 0.5) * self.bin_width
    }

    /// A legend only makes sense when bars are split by a column.
    pub fn show_legend(&self) -> bool {
        self.series.iter().any(|s| s.label.is_some())
    }

    fn bin_of(&self, price: f64) -> usize {
        let raw = ((price - self.start) / self.bin_width).floor();
        (raw.max(0.0) as usize).min(self.bin_count - 1)
    }
}

/// Bin the prices of the view.
///
/// Rows without a price are ignored; when grouping, so are rows without a
/// value in the grouping column. Series appear in first-seen order.
pub fn price_histogram(view: &FilteredView, config: &HistogramConfig) -> PriceHistogram {
    let column = config.grouping.column();
    let samples: Vec<(Option<&str>, f64)> = view
        .rows()
        .filter_map(|l| {
            let price = l.price?;
            match column {
                Some(col) => Some((Some(col.value_of(l)?), price)),
                None => Some((None, price)),
            }
        })
        .collect();

    let Some((start, bin_width, bin_count)) = bin_layout(samples.iter().map(|s| s.1), config.bins)
    else {
        return PriceHistogram::empty(config.normalize);
    };

    let mut hist = PriceHistogram {
        start,
        bin_width,
        bin_count,
        normalized: config.normalize,
        series: Vec::new(),
    };

    let mut position: HashMap<Option<&str>, usize> = HashMap::new();
    for (label, price) in samples {
        let idx = *position.entry(label).or_insert_with(|| {
            hist.series.push(HistogramSeries {
                label: label.map(str::to_string),
                heights: vec![0.0; bin_count],
                total: 0,
            });
            hist.series.len() - 1
        });
        let bin = hist.bin_of(price);
        let series = &mut hist.series[idx];
        series.heights[bin] += 1.0;
        series.total += 1;
    }

    if config.normalize {
        for series in &mut hist.series {
            let total = series.total as f64;
            for h in &mut series.heights {
                *h = *h * 100.0 / total;
            }
        }
    }
    hist
}

/// `(start, width, count)` covering every value, or `None` with no values.
fn bin_layout(values: impl Iterator<Item = f64>, bins: Option<usize>) -> Option<(f64, f64, usize)> {
    let mut n = 0usize;
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        n += 1;
        min = min.min(v);
        max = max.max(v);
    }
    if n == 0 {
        return None;
    }

    let range = max - min;
    if range <= 0.0 {
        return Some((min - 0.5, 1.0, 1));
    }

    match bins.filter(|&b| b > 0) {
        Some(count) => Some((min, range / count as f64, count)),
        None => {
            // Sturges' rule, widened to a 1/2/5 step.
            let target = (n as f64).log2().ceil() as usize + 1;
            let width = nice_step(range / target as f64);
            let start = (min / width).floor() * width;
            let count = ((max - start) / width).floor() as usize + 1;
            Some((start, width, count))
        }
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&step| step >= raw)
        .unwrap_or(10.0 * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, DateRange, Selection};
    use crate::data::model::fixtures::*;
    use crate::data::model::{CategoryColumn, Listing};

    fn view_of(listings: Vec<Listing>) -> FilteredView {
        let ds = dataset(listings);
        filter(
            &ds,
            &Selection {
                date_range: DateRange::new(day(2000, 1, 1), day(2030, 1, 1)),
                manufacturer: Some("ford".into()),
                model_year: Some(2015),
            },
        )
    }

    fn priced(prices: &[f64]) -> Vec<Listing> {
        prices
            .iter()
            .map(|&p| listing("ford focus", 2015, p, day(2020, 1, 1)))
            .collect()
    }

    #[test]
    fn every_price_lands_in_a_bin() {
        let view = view_of(priced(&[1200.0, 3500.0, 3999.0, 8000.0, 15000.0, 15000.0]));
        let hist = price_histogram(&view, &HistogramConfig::default());
        assert_eq!(hist.series.len(), 1);
        let total: f64 = hist.series[0].heights.iter().sum();
        assert_eq!(total, 6.0);
        assert!(hist.start <= 1200.0);
        assert!(hist.start + hist.bin_width * hist.bin_count as f64 > 15000.0);
        assert!(!hist.show_legend());
    }

    #[test]
    fn normalized_ungrouped_sums_to_hundred() {
        let view = view_of(priced(&[100.0, 250.0, 900.0, 910.0, 3000.0]));
        let config = HistogramConfig {
            normalize: true,
            ..Default::default()
        };
        let hist = price_histogram(&view, &config);
        let sum: f64 = hist.series[0].heights.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalized_groups_each_sum_to_hundred() {
        let mut rows = priced(&[100.0, 250.0, 900.0]);
        let mut diesel = priced(&[400.0, 5000.0]);
        for l in &mut diesel {
            l.fuel = Some("diesel".into());
        }
        rows.append(&mut diesel);
        let mut unknown = listing("ford focus", 2015, 777.0, day(2020, 1, 1));
        unknown.fuel = None;
        rows.push(unknown);

        let config = HistogramConfig {
            normalize: true,
            grouping: HistogramGrouping::By(CategoryColumn::Fuel),
            bins: None,
        };
        let hist = price_histogram(&view_of(rows), &config);
        let labels: Vec<_> = hist.series.iter().map(|s| s.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("gas"), Some("diesel")]);
        assert_eq!(hist.series[0].total, 3);
        for series in &hist.series {
            let sum: f64 = series.heights.iter().sum();
            assert!((sum - 100.0).abs() < 1e-9);
        }
        assert!(hist.show_legend());
    }

    #[test]
    fn fixed_bin_count_is_respected() {
        let view = view_of(priced(&[0.0, 10.0, 20.0, 30.0, 40.0]));
        let config = HistogramConfig {
            bins: Some(4),
            ..Default::default()
        };
        let hist = price_histogram(&view, &config);
        assert_eq!(hist.bin_count, 4);
        assert_eq!(hist.series[0].heights, vec![1.0, 1.0, 1.0, 2.0]);
    }

    #[test]
    fn single_price_gets_one_bin() {
        let hist = price_histogram(&view_of(priced(&[4500.0, 4500.0])), &HistogramConfig::default());
        assert_eq!(hist.bin_count, 1);
        assert_eq!(hist.series[0].heights, vec![2.0]);
        assert_eq!(hist.bin_center(0), 4500.0);
    }

    #[test]
    fn empty_view_gives_empty_histogram() {
        let view = view_of(vec![listing("toyota camry", 2018, 1.0, day(2020, 1, 1))]);
        let config = HistogramConfig {
            normalize: true,
            grouping: HistogramGrouping::By(CategoryColumn::Model),
            bins: None,
        };
        let hist = price_histogram(&view, &config);
        assert!(hist.is_empty());
        assert_eq!(hist.bin_count, 0);
    }

    #[test]
    fn nice_steps_round_up() {
        assert_eq!(nice_step(3.2), 5.0);
        assert_eq!(nice_step(1800.0), 2000.0);
        assert!((nice_step(0.07) - 0.1).abs() < 1e-12);
    }
}
