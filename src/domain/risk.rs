//! Risk overlay engine: vol targeting, drawdown kill switch, turnover costs.
//!
//! [`apply_risk`] turns proposed daily weights into executed weights:
//!
//! 1. Unscaled portfolio returns from one-day-lagged weights (no look-ahead;
//!    the day-0 lagged weight is zero).
//! 2. Rolling annualized vol of those returns over `vol_lookback`, then a
//!    candidate scale `clip(target_vol_ann / vol_est, 0, max_leverage)`.
//!    Warm-up days get scale 0.
//! 3. A sequential kill-switch fold over the candidate-scale pre-cost equity
//!    curve. Day t's state depends on day t-1's, so this stage must run in
//!    strict timestamp order.
//! 4. Turnover and linear transaction costs on the final scaled weights,
//!    then net portfolio returns.
//!
//! Every day ends up as one [`AuditRow`] explaining its outcome.

use super::audit::AuditRow;
use super::error::VolguardError;
use super::frame::DailyFrame;
use super::stats::{annualize, rolling_vol};

#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    /// Annualized vol the overlay sizes toward, e.g. 0.12 for 12%.
    pub target_vol_ann: f64,
    pub vol_lookback: usize,
    /// Upper bound on the exposure scale; keep <= 1 for long-only cash+equities.
    pub max_leverage: f64,
    /// Kill when drawdown <= -dd_kill.
    pub dd_kill: f64,
    /// If set, re-enable when drawdown > -dd_recover; if unset, a kill is
    /// sticky for the rest of the run.
    pub dd_recover: Option<f64>,
}

impl RiskConfig {
    pub fn new(
        target_vol_ann: f64,
        vol_lookback: usize,
        max_leverage: f64,
        dd_kill: f64,
        dd_recover: Option<f64>,
    ) -> Result<Self, VolguardError> {
        if !(target_vol_ann > 0.0) {
            return Err(VolguardError::InvalidRiskConfig {
                field: "target_vol_ann".into(),
                reason: "must be positive".into(),
            });
        }
        if vol_lookback < 1 {
            return Err(VolguardError::InvalidRiskConfig {
                field: "vol_lookback".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !(max_leverage >= 0.0) {
            return Err(VolguardError::InvalidRiskConfig {
                field: "max_leverage".into(),
                reason: "must be non-negative".into(),
            });
        }
        if !(dd_kill > 0.0 && dd_kill <= 1.0) {
            return Err(VolguardError::InvalidRiskConfig {
                field: "dd_kill".into(),
                reason: "must be in (0, 1]".into(),
            });
        }
        if let Some(recover) = dd_recover {
            if !(recover > 0.0 && recover <= 1.0) {
                return Err(VolguardError::InvalidRiskConfig {
                    field: "dd_recover".into(),
                    reason: "must be in (0, 1]".into(),
                });
            }
        }
        Ok(RiskConfig {
            target_vol_ann,
            vol_lookback,
            max_leverage,
            dd_kill,
            dd_recover,
        })
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            target_vol_ann: 0.12,
            vol_lookback: 20,
            max_leverage: 1.0,
            dd_kill: 0.20,
            dd_recover: None,
        }
    }
}

/// Output of one overlay run. Built once, read-only afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskOutput {
    /// Executed weights: `scale * base_weights`, aligned with the inputs.
    pub weights: DailyFrame,
    /// Daily net portfolio returns (lagged executed weights, minus costs).
    pub portfolio_returns: Vec<f64>,
    pub audit: Vec<AuditRow>,
}

/// Apply the vol-targeting overlay and drawdown kill switch to proposed
/// weights. `base_weights` and `asset_returns` must share the exact same
/// date index and ticker set.
pub fn apply_risk(
    base_weights: &DailyFrame,
    asset_returns: &DailyFrame,
    transaction_cost_bps: f64,
    cfg: &RiskConfig,
) -> Result<RiskOutput, VolguardError> {
    base_weights.check_aligned(asset_returns)?;

    let n = base_weights.len();

    // Unscaled portfolio returns with one-day-lagged weights.
    let base_port_ret: Vec<f64> = (0..n)
        .map(|t| {
            if t == 0 {
                0.0
            } else {
                dot(base_weights.row(t - 1), asset_returns.row(t))
            }
        })
        .collect();

    // Annualized rolling vol; None during warm-up.
    let vol_est_ann: Vec<Option<f64>> = rolling_vol(&base_port_ret, cfg.vol_lookback)
        .into_iter()
        .map(|v| v.map(annualize))
        .collect();

    // Candidate scale: target / vol_est, clipped to [0, max_leverage].
    // A zero vol estimate divides to +inf and clips to max_leverage.
    let mut raw_scale = vec![0.0; n];
    let mut candidate = vec![0.0; n];
    for t in 0..n {
        if let Some(vol) = vol_est_ann[t] {
            let raw = cfg.target_vol_ann / vol;
            raw_scale[t] = raw;
            candidate[t] = raw.clamp(0.0, cfg.max_leverage);
        }
    }

    // Kill switch: a strictly sequential fold. The drawdown is taken on the
    // pre-cost equity of the candidate scale (lagged one day), against the
    // running peak of that same curve. Recovery is checked before re-kill,
    // in that order, on the same day's drawdown.
    let mut killed = vec![false; n];
    let mut dd = vec![0.0; n];
    let mut live = true;
    let mut equity = 1.0;
    let mut peak = f64::NEG_INFINITY;
    for t in 0..n {
        let lagged_scale = if t == 0 { 0.0 } else { candidate[t - 1] };
        equity *= 1.0 + lagged_scale * base_port_ret[t];
        if equity > peak {
            peak = equity;
        }
        dd[t] = equity / peak - 1.0;

        if !live {
            match cfg.dd_recover {
                Some(recover) if dd[t] > -recover => live = true,
                _ => {
                    killed[t] = true;
                    continue;
                }
            }
        }
        if dd[t] <= -cfg.dd_kill {
            live = false;
            killed[t] = true;
        }
    }

    let scale: Vec<f64> = (0..n)
        .map(|t| if killed[t] { 0.0 } else { candidate[t] })
        .collect();

    // Executed weights and day-over-day churn. The weight before day 0 is zero.
    let weight_rows: Vec<Vec<f64>> = (0..n)
        .map(|t| base_weights.row(t).iter().map(|w| w * scale[t]).collect())
        .collect();

    let zero_row = vec![0.0; base_weights.tickers.len()];
    let mut turnover = vec![0.0; n];
    let mut cost = vec![0.0; n];
    let mut portfolio_returns = vec![0.0; n];
    for t in 0..n {
        let prev: &[f64] = if t == 0 { &zero_row } else { &weight_rows[t - 1] };
        turnover[t] = weight_rows[t]
            .iter()
            .zip(prev.iter())
            .map(|(w, p)| (w - p).abs())
            .sum();
        cost[t] = turnover[t] * (transaction_cost_bps / 1e4);
        portfolio_returns[t] = dot(prev, asset_returns.row(t)) - cost[t];
    }

    let audit: Vec<AuditRow> = (0..n)
        .map(|t| {
            AuditRow::build(
                base_weights.dates[t],
                cfg,
                killed[t],
                dd[t],
                vol_est_ann[t],
                raw_scale[t],
                scale[t],
                turnover[t],
                cost[t],
            )
        })
        .collect();

    let weights = DailyFrame {
        dates: base_weights.dates.clone(),
        tickers: base_weights.tickers.clone(),
        values: weight_rows,
    };

    Ok(RiskOutput {
        weights,
        portfolio_returns,
        audit,
    })
}

fn dot(weights: &[f64], returns: &[f64]) -> f64 {
    weights.iter().zip(returns.iter()).map(|(w, r)| w * r).sum()
}
