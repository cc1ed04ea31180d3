use crate::data::filter::FilteredView;

/// Ordinary-least-squares fit of price on odometer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl RegressionLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// End points of the fitted segment over the observed odometer range.
    pub fn endpoints(&self) -> [[f64; 2]; 2] {
        [
            [self.x_min, self.predict(self.x_min)],
            [self.x_max, self.predict(self.x_max)],
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceOdometerScatter {
    /// `[odometer, price]` pairs.
    pub points: Vec<[f64; 2]>,
    pub regression: Option<RegressionLine>,
}

/// Pair odometer with price for every row that has both, and optionally fit a line.
pub fn price_vs_odometer(view: &FilteredView, regression: bool) -> PriceOdometerScatter {
    let points: Vec<[f64; 2]> = view
        .rows()
        .filter_map(|l| Some([l.odometer?, l.price?]))
        .collect();
    let regression = if regression { fit_ols(&points) } else { None };
    PriceOdometerScatter { points, regression }
}

/// Least-squares line through `points`; `None` with fewer than two points
/// or when every x is identical.
pub fn fit_ols(points: &[[f64; 2]]) -> Option<RegressionLine> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for [x, y] in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx <= f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy <= f64::EPSILON {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };

    let x_min = points.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let x_max = points.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);

    Some(RegressionLine {
        slope,
        intercept,
        r_squared,
        x_min,
        x_max,
    })
}
