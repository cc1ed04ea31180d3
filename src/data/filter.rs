use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{Dataset, Listing};

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// Inclusive range of calendar days.
///
/// A timestamp is inside when it falls between the start of `start` and the
/// end of `end`. An inverted range contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        let day = timestamp.date();
        self.start <= day && day <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// The three active filter choices. `None` means nothing could be selected
/// (no options available), which matches no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub date_range: DateRange,
    pub manufacturer: Option<String>,
    pub model_year: Option<i32>,
}

impl Selection {
    /// Whether a listing passes all three predicates.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.date_range.contains(&listing.date_posted)
            && self.manufacturer.as_deref() == Some(listing.manufacturer.as_str())
            && self.model_year == Some(listing.model_year)
    }
}

// ---------------------------------------------------------------------------
// Cascading options
// ---------------------------------------------------------------------------

/// Sorted unique manufacturers among rows posted inside `range`.
pub fn available_manufacturers(dataset: &Dataset, range: &DateRange) -> Vec<String> {
    dataset
        .listings()
        .iter()
        .filter(|l| range.contains(&l.date_posted))
        .map(|l| l.manufacturer.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Unique model years, newest first, among rows inside `range` built by `manufacturer`.
pub fn available_model_years(dataset: &Dataset, range: &DateRange, manufacturer: &str) -> Vec<i32> {
    dataset
        .listings()
        .iter()
        .filter(|l| range.contains(&l.date_posted) && l.manufacturer == manufacturer)
        .map(|l| l.model_year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// `preferred` when it is available, otherwise the alphabetically first option.
pub fn default_manufacturer<'a>(available: &'a [String], preferred: &str) -> Option<&'a str> {
    available
        .iter()
        .find(|m| m.as_str() == preferred)
        .or_else(|| available.first())
        .map(String::as_str)
}

/// The most recent year of a newest-first list.
pub fn default_model_year(available: &[i32]) -> Option<i32> {
    available.first().copied()
}

/// Option lists for the manufacturer and model-year selectors together with
/// the resolved selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions {
    pub manufacturers: Vec<String>,
    pub model_years: Vec<i32>,
    pub selection: Selection,
}

impl FilterOptions {
    /// Re-derive the cascade for a date range.
    ///
    /// A previous choice survives only while its option list comes out
    /// exactly as before. Whenever a list changes, its selector falls back to
    /// the default rule, even if the old value is still offered.
    pub fn derive(
        dataset: &Dataset,
        date_range: DateRange,
        previous: Option<&FilterOptions>,
        preferred_manufacturer: &str,
    ) -> Self {
        let manufacturers = available_manufacturers(dataset, &date_range);
        let manufacturer = previous
            .filter(|p| p.manufacturers == manufacturers)
            .and_then(|p| p.selection.manufacturer.as_deref())
            .or_else(|| default_manufacturer(&manufacturers, preferred_manufacturer))
            .map(str::to_string);

        let model_years = match &manufacturer {
            Some(m) => available_model_years(dataset, &date_range, m),
            None => Vec::new(),
        };
        let model_year = previous
            .filter(|p| p.model_years == model_years)
            .and_then(|p| p.selection.model_year)
            .or_else(|| default_model_year(&model_years));

        FilterOptions {
            manufacturers,
            model_years,
            selection: Selection {
                date_range,
                manufacturer,
                model_year,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Raised (as a value, not an error) when the filters leave no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyResultWarning {
    pub selection: Selection,
}

impl fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "No listings match {} to {}, manufacturer {}, model year {}",
            self.selection.date_range.start,
            self.selection.date_range.end,
            self.selection.manufacturer.as_deref().unwrap_or("<none>"),
            self.selection
                .model_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "<none>".to_string()),
        )
    }
}

/// The rows of a shared dataset that pass a [`Selection`].
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    indices: Vec<usize>,
    selection: Selection,
}

impl FilteredView {
    pub fn rows(&self) -> impl Iterator<Item = &Listing> + '_ {
        self.indices.iter().map(|&i| &self.dataset.listings()[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn warning(&self) -> Option<EmptyResultWarning> {
        self.is_empty().then(|| EmptyResultWarning {
            selection: self.selection.clone(),
        })
    }
}

/// Narrow the dataset to the rows passing every predicate of `selection`.
pub fn filter(dataset: &Arc<Dataset>, selection: &Selection) -> FilteredView {
    let indices: Vec<usize> = dataset
        .listings()
        .iter()
        .enumerate()
        .filter(|(_, l)| selection.matches(l))
        .map(|(i, _)| i)
        .collect();

    let view = FilteredView {
        dataset: Arc::clone(dataset),
        indices,
        selection: selection.clone(),
    };
    if let Some(warning) = view.warning() {
        log::warn!("{warning}");
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::*;

    fn range(a: NaiveDate, b: NaiveDate) -> DateRange {
        DateRange::new(a, b)
    }

    fn year_2020() -> DateRange {
        range(day(2020, 1, 1), day(2020, 12, 31))
    }

    #[test]
    fn conjunction_keeps_single_matching_row() {
        let ds = scenario();
        let sel = Selection {
            date_range: year_2020(),
            manufacturer: Some("ford".into()),
            model_year: Some(2015),
        };
        let view = filter(&ds, &sel);
        let prices: Vec<_> = view.rows().map(|l| l.price).collect();
        assert_eq!(prices, vec![Some(5000.0)]);
        assert!(view.warning().is_none());
    }

    #[test]
    fn every_output_row_satisfies_all_predicates() {
        let ds = dataset(vec![
            listing("ford focus", 2015, 1.0, day(2020, 1, 1)),
            listing("ford focus", 2015, 2.0, day(2021, 1, 1)),
            listing("ford escape", 2016, 3.0, day(2020, 5, 1)),
            listing("ram 1500", 2015, 4.0, day(2020, 5, 1)),
            listing("ford f-150", 2015, 5.0, day(2020, 12, 31)),
        ]);
        let sel = Selection {
            date_range: year_2020(),
            manufacturer: Some("ford".into()),
            model_year: Some(2015),
        };
        let view = filter(&ds, &sel);
        assert_eq!(view.len(), 2);
        for l in view.rows() {
            assert!(sel.date_range.contains(&l.date_posted));
            assert_eq!(l.manufacturer, "ford");
            assert_eq!(l.model_year, 2015);
        }
    }

    #[test]
    fn end_day_is_inclusive_through_midnight() {
        let mut late = listing("ford focus", 2015, 1.0, day(2020, 3, 1));
        late.date_posted = day(2020, 3, 1).and_hms_opt(23, 59, 59).unwrap();
        let r = range(day(2020, 2, 1), day(2020, 3, 1));
        assert!(r.contains(&late.date_posted));
        assert!(!range(day(2020, 3, 2), day(2020, 4, 1)).contains(&late.date_posted));
    }

    #[test]
    fn manufacturers_depend_only_on_date_range() {
        let ds = scenario();
        let r = range(day(2020, 2, 1), day(2020, 12, 31));
        assert_eq!(available_manufacturers(&ds, &r), vec!["ford", "toyota"]);

        let opts = FilterOptions::derive(&ds, r, None, "ford");
        assert_eq!(opts.manufacturers, vec!["ford", "toyota"]);
        assert_eq!(opts.selection.manufacturer.as_deref(), Some("ford"));
    }

    #[test]
    fn unchanged_lists_keep_previous_choices() {
        let ds = scenario();
        let mut first = FilterOptions::derive(&ds, year_2020(), None, "ford");
        assert_eq!(first.model_years, vec![2016, 2015]);
        first.selection.model_year = Some(2015);

        // Widening the start day adds no rows, so neither list changes.
        let r = range(day(2019, 6, 1), day(2020, 12, 31));
        let opts = FilterOptions::derive(&ds, r, Some(&first), "ford");
        assert_eq!(opts.manufacturers, first.manufacturers);
        assert_eq!(opts.model_years, first.model_years);
        assert_eq!(opts.selection.model_year, Some(2015));
    }

    #[test]
    fn changed_manufacturer_list_resets_to_default() {
        let ds = dataset(vec![
            listing("ford focus", 2015, 5000.0, day(2020, 1, 1)),
            listing("ram 1500", 2018, 8000.0, day(2020, 1, 15)),
            listing("ford f-150", 2016, 7000.0, day(2020, 6, 1)),
            listing("toyota camry", 2018, 9000.0, day(2020, 3, 1)),
        ]);
        let mut first = FilterOptions::derive(&ds, year_2020(), None, "ford");
        assert_eq!(first.manufacturers, vec!["ford", "ram", "toyota"]);
        first.selection.manufacturer = Some("toyota".into());
        first.model_years = vec![2018];
        first.selection.model_year = Some(2018);

        // Toyota is still offered, but ram dropped out of the list.
        let r = range(day(2020, 2, 1), day(2020, 12, 31));
        let opts = FilterOptions::derive(&ds, r, Some(&first), "ford");
        assert_eq!(opts.manufacturers, vec!["ford", "toyota"]);
        assert_eq!(opts.selection.manufacturer.as_deref(), Some("ford"));
        assert_eq!(opts.model_years, vec![2016]);
        assert_eq!(opts.selection.model_year, Some(2016));
    }

    #[test]
    fn ford_is_default_while_available() {
        let ds = scenario();
        let r = range(day(2020, 2, 1), day(2020, 12, 31));
        let opts = FilterOptions::derive(&ds, r, None, "ford");
        assert_eq!(opts.selection.manufacturer.as_deref(), Some("ford"));
        assert_eq!(opts.model_years, vec![2016]);
        assert_eq!(opts.selection.model_year, Some(2016));
    }

    #[test]
    fn default_falls_back_to_alphabetical_first() {
        let available = vec!["audi".to_string(), "bmw".to_string()];
        assert_eq!(default_manufacturer(&available, "ford"), Some("audi"));
        assert_eq!(default_manufacturer(&[], "ford"), None);

        let ds = scenario();
        let r = range(day(2020, 3, 1), day(2020, 3, 31));
        let opts = FilterOptions::derive(&ds, r, None, "ford");
        assert_eq!(opts.selection.manufacturer.as_deref(), Some("toyota"));
    }

    #[test]
    fn model_years_are_newest_first() {
        let ds = dataset(vec![
            listing("ford focus", 2012, 1.0, day(2020, 1, 1)),
            listing("ford focus", 2018, 1.0, day(2020, 1, 2)),
            listing("ford focus", 2015, 1.0, day(2020, 1, 3)),
            listing("ford focus", 2018, 1.0, day(2020, 1, 4)),
        ]);
        let years = available_model_years(&ds, &year_2020(), "ford");
        assert_eq!(years, vec![2018, 2015, 2012]);
        assert_eq!(default_model_year(&years), Some(2018));
    }

    #[test]
    fn excluded_range_gives_empty_view_with_warning() {
        let ds = scenario();
        let r = range(day(2021, 1, 1), day(2021, 12, 31));
        let previous = FilterOptions::derive(&ds, year_2020(), None, "ford");
        let opts = FilterOptions::derive(&ds, r, Some(&previous), "ford");
        assert!(opts.manufacturers.is_empty());
        assert_eq!(opts.selection.manufacturer, None);

        let view = filter(&ds, &opts.selection);
        assert!(view.is_empty());
        assert!(view.warning().is_some());
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let ds = scenario();
        let r = range(day(2020, 12, 31), day(2020, 1, 1));
        assert!(r.is_inverted());
        let sel = Selection {
            date_range: r,
            manufacturer: Some("ford".into()),
            model_year: Some(2015),
        };
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn filtering_leaves_dataset_untouched() {
        let ds = scenario();
        let before = ds.listings().to_vec();
        let sel = Selection {
            date_range: year_2020(),
            manufacturer: Some("toyota".into()),
            model_year: Some(2018),
        };
        let view = filter(&ds, &sel);
        let models: Vec<&str> = view.rows().map(|l| l.model.as_str()).collect();
        assert_eq!(models, vec!["toyota camry"]);
        assert_eq!(ds.listings(), before.as_slice());
    }
}
