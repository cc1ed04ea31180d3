//! Chart adapters: pure transforms from a [`FilteredView`] to plot-ready data.
//!
//! ```text
//!   FilteredView
//!        │
//!        ├── breakdown  → value counts per categorical column (donuts)
//!        ├── histogram  → binned prices, optionally grouped / normalised
//!        ├── scatter    → (odometer, price) pairs + optional OLS line
//!        └── trend      → days_listed summed per posting day
//! ```
//!
//! Every adapter accepts an empty view and returns empty chart data.
//!
//! [`FilteredView`]: crate::data::filter::FilteredView

pub mod breakdown;
pub mod histogram;
pub mod scatter;
pub mod trend;
