//! Univariate regression of visitors on population in log-log space.

/// Slope and intercept of a fitted line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn apply(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit quality, measured in the original (not log) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
}

/// Fits a line through `(x, y)` points.
pub trait Regressor {
    /// `None` when there are no points.
    fn fit(&self, x: &[f64], y: &[f64]) -> Option<LinearFit>;
}

/// Ordinary least squares.
///
/// With a single distinct `x` the slope is zero and the intercept is the
/// mean of `y`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrdinaryLeastSquares;

impl Regressor for OrdinaryLeastSquares {
    fn fit(&self, x: &[f64], y: &[f64]) -> Option<LinearFit> {
        let n = x.len().min(y.len());
        if n == 0 {
            return None;
        }
        let (x, y) = (&x[..n], &y[..n]);

        let mean_x = mean(x);
        let mean_y = mean(y);

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (xi, yi) in x.iter().zip(y) {
            let dx = xi - mean_x;
            sxx += dx * dx;
            sxy += dx * (yi - mean_y);
        }

        let slope = if sxx > f64::EPSILON { sxy / sxx } else { 0.0 };
        Some(LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }
}

/// Fit `ln(y) = slope * ln(x) + intercept` over the pairs with positive values.
///
/// Returns the fit and the number of pairs used.
pub fn fit_log_log<R: Regressor>(
    regressor: &R,
    pairs: &[(u64, u64)],
) -> Option<(LinearFit, usize)> {
    let usable: Vec<(f64, f64)> = pairs
        .iter()
        .filter(|(x, y)| *x > 0 && *y > 0)
        .map(|&(x, y)| ((x as f64).ln(), (y as f64).ln()))
        .collect();

    let (log_x, log_y): (Vec<f64>, Vec<f64>) = usable.into_iter().unzip();
    let fit = regressor.fit(&log_x, &log_y)?;
    Some((fit, log_x.len()))
}

/// R², RMSE and MAE between observed and predicted values.
pub fn metrics(observed: &[f64], predicted: &[f64]) -> FitMetrics {
    let n = observed.len().min(predicted.len());
    if n == 0 {
        return FitMetrics {
            r2: 0.0,
            rmse: 0.0,
            mae: 0.0,
        };
    }

    let mean_obs = mean(&observed[..n]);
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    let mut abs_err = 0.0;
    for (o, p) in observed.iter().zip(predicted).take(n) {
        let err = o - p;
        ss_res += err * err;
        ss_tot += (o - mean_obs) * (o - mean_obs);
        abs_err += err.abs();
    }

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    FitMetrics {
        r2,
        rmse: (ss_res / n as f64).sqrt(),
        mae: abs_err / n as f64,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
