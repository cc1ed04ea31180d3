use std::collections::HashMap;

use crate::data::filter::FilteredView;
use crate::data::model::CategoryColumn;

/// One slice of a category donut.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Share of all counted rows, 0..=100.
    pub percent: f64,
}

/// Count each distinct value of `column` in the view.
///
/// Sorted by descending count; ties keep first-appearance order. Rows with
/// no value in the column are not counted.
pub fn category_breakdown(view: &FilteredView, column: CategoryColumn) -> Vec<CategoryCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for value in view.rows().filter_map(|l| column.value_of(l)) {
        match position.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    // Stable sort keeps first appearance among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, DateRange, Selection};
    use crate::data::model::fixtures::*;

    fn all_fords(listings: Vec<crate::data::model::Listing>) -> FilteredView {
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

    #[test]
    fn counts_each_value_most_common_first() {
        let mut a = listing("ford focus", 2015, 1.0, day(2020, 1, 1));
        let mut b = a.clone();
        let mut c = a.clone();
        let d = listing("ford fusion", 2015, 1.0, day(2020, 1, 1));
        a.condition = Some("fair".into());
        b.condition = Some("excellent".into());
        c.condition = Some("excellent".into());
        let view = all_fords(vec![a, b, c, d]);

        let models = category_breakdown(&view, CategoryColumn::Model);
        assert_eq!(models[0].value, "ford focus");
        assert_eq!(models[0].count, 3);
        assert_eq!(models[1].value, "ford fusion");

        let conditions = category_breakdown(&view, CategoryColumn::Condition);
        let pairs: Vec<(&str, usize)> = conditions
            .iter()
            .map(|c| (c.value.as_str(), c.count))
            .collect();
        assert_eq!(pairs, vec![("excellent", 2), ("fair", 1), ("good", 1)]);
        let total: f64 = conditions.iter().map(|c| c.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn missing_values_are_skipped() {
        let mut a = listing("ford focus", 2015, 1.0, day(2020, 1, 1));
        a.fuel = None;
        let b = listing("ford focus", 2015, 1.0, day(2020, 1, 1));
        let view = all_fords(vec![a, b]);
        let fuel = category_breakdown(&view, CategoryColumn::Fuel);
        assert_eq!(fuel.len(), 1);
        assert_eq!(fuel[0].count, 1);
        assert_eq!(fuel[0].percent, 100.0);
    }

    #[test]
    fn empty_view_yields_no_counts() {
        let view = all_fords(vec![listing("toyota camry", 2018, 1.0, day(2020, 1, 1))]);
        for column in CategoryColumn::ALL {
            assert!(category_breakdown(&view, column).is_empty());
        }
    }
}
