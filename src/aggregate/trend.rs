use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::filter::FilteredView;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyTrendPoint {
    pub day: NaiveDate,
    /// Sum of `days_listed` over the day's listings; missing values count as zero.
    pub total_days_listed: i64,
    pub listings: usize,
}

/// Sum `days_listed` per posting day, in date order.
///
/// Only days that have at least one listing appear. Gaps are not filled.
pub fn daily_listing_trend(view: &FilteredView) -> Vec<DailyTrendPoint> {
    let mut per_day: BTreeMap<NaiveDate, (i64, usize)> = BTreeMap::new();
    for l in view.rows() {
        let entry = per_day.entry(l.posted_day()).or_default();
        entry.0 += l.days_listed.unwrap_or(0);
        entry.1 += 1;
    }

    per_day
        .into_iter()
        .map(|(day, (total_days_listed, listings))| DailyTrendPoint {
            day,
            total_days_listed,
            listings,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter, DateRange, Selection};
    use crate::data::model::fixtures::*;
    use crate::data::model::Listing;

    fn posted(d: NaiveDate, days_listed: Option<i64>) -> Listing {
        let mut l = listing("ford focus", 2015, 1.0, d);
        l.days_listed = days_listed;
        l
    }

    fn view_of(listings: Vec<Listing>) -> FilteredView {
        filter(
            &dataset(listings),
            &Selection {
                date_range: DateRange::new(day(2000, 1, 1), day(2030, 1, 1)),
                manufacturer: Some("ford".into()),
                model_year: Some(2015),
            },
        )
    }

    #[test]
    fn sums_per_day_without_filling_gaps() {
        let mut late = posted(day(2020, 1, 1), Some(5));
        late.date_posted = day(2020, 1, 1).and_hms_opt(18, 30, 0).unwrap();
        let view = view_of(vec![
            posted(day(2020, 1, 5), Some(7)),
            posted(day(2020, 1, 1), Some(10)),
            late,
            posted(day(2020, 1, 5), None),
        ]);

        let trend = daily_listing_trend(&view);
        let days: Vec<NaiveDate> = trend.iter().map(|p| p.day).collect();
        assert_eq!(days, vec![day(2020, 1, 1), day(2020, 1, 5)]);
        assert_eq!(trend[0].total_days_listed, 15);
        assert_eq!(trend[0].listings, 2);
        assert_eq!(trend[1].total_days_listed, 7);
        assert_eq!(trend[1].listings, 2);
    }

    #[test]
    fn empty_view_has_no_points() {
        let view = view_of(vec![listing("toyota camry", 2018, 1.0, day(2020, 1, 1))]);
        assert!(daily_listing_trend(&view).is_empty());
    }
}
