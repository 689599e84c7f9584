//! Rolling time-series statistics.
//!
//! Population standard deviation (divide by N, not N-1) over a trailing
//! window, annualization by sqrt(252), cumulative-product equity curves and
//! running-peak drawdown. Warm-up points (fewer than `window` observations)
//! are `None`, never a NaN sentinel.

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Rolling population standard deviation over a trailing window of exactly
/// `window` observations. The first `window - 1` points are `None`.
pub fn rolling_vol(series: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(series.len());
    let warmup = window.saturating_sub(1);

    for i in 0..series.len() {
        if window == 0 || i < warmup {
            out.push(None);
            continue;
        }
        let start = i + 1 - window;
        let slice = &series[start..=i];

        let mean: f64 = slice.iter().sum::<f64>() / window as f64;
        let variance: f64 = slice
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / window as f64;

        out.push(Some(variance.sqrt()));
    }
    out
}

/// Scale a daily statistic to annual terms.
pub fn annualize(x: f64) -> f64 {
    x * TRADING_DAYS_PER_YEAR.sqrt()
}

/// Cumulative product of (1 + r): the growth of one unit of capital.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(returns.len());
    let mut equity = 1.0;
    for r in returns {
        equity *= 1.0 + r;
        out.push(equity);
    }
    out
}

/// Drawdown versus the running peak: `equity / max_so_far - 1`.
/// Always <= 0, exactly 0 at new highs.
pub fn drawdown(equity: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(equity.len());
    let mut peak = f64::MIN;
    for &e in equity {
        if e > peak {
            peak = e;
        }
        out.push(e / peak - 1.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rolling_vol_warmup() {
        let series = [0.01, -0.02, 0.03, 0.01, -0.01];
        let vol = rolling_vol(&series, 3);
        assert_eq!(vol.len(), 5);
        assert!(vol[0].is_none());
        assert!(vol[1].is_none());
        assert!(vol[2].is_some());
        assert!(vol[3].is_some());
        assert!(vol[4].is_some());
    }

    #[test]
    fn rolling_vol_is_population_stddev() {
        let series = [10.0, 20.0, 30.0];
        let vol = rolling_vol(&series, 3);
        let mean = 20.0;
        let expected = (((10.0_f64 - mean).powi(2)
            + (20.0_f64 - mean).powi(2)
            + (30.0_f64 - mean).powi(2))
            / 3.0)
            .sqrt();
        assert_abs_diff_eq!(vol[2].unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn rolling_vol_constant_series_is_zero() {
        let series = [0.5; 6];
        let vol = rolling_vol(&series, 4);
        assert_abs_diff_eq!(vol[3].unwrap(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(vol[5].unwrap(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn rolling_vol_zero_window() {
        let vol = rolling_vol(&[1.0, 2.0], 0);
        assert!(vol.iter().all(|v| v.is_none()));
    }

    #[test]
    fn annualize_sqrt_252() {
        assert_abs_diff_eq!(annualize(0.01), 0.01 * 252.0_f64.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn equity_curve_compounds() {
        let curve = equity_curve(&[0.10, -0.50, 1.0]);
        assert_abs_diff_eq!(curve[0], 1.10, epsilon = 1e-12);
        assert_abs_diff_eq!(curve[1], 0.55, epsilon = 1e-12);
        assert_abs_diff_eq!(curve[2], 1.10, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_zero_at_new_highs() {
        let dd = drawdown(&[1.0, 1.1, 1.2]);
        assert!(dd.iter().all(|&d| d.abs() < 1e-15));
    }

    #[test]
    fn drawdown_measures_from_peak() {
        let dd = drawdown(&[1.0, 2.0, 1.0, 2.0, 3.0]);
        assert_abs_diff_eq!(dd[2], -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(dd[3], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dd[4], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn drawdown_never_positive() {
        let dd = drawdown(&equity_curve(&[0.03, -0.02, 0.05, -0.10, 0.01]));
        assert!(dd.iter().all(|&d| d <= 1e-15));
    }
}
