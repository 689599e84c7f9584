//! Risk-gated execution planning.
//!
//! At decision time the latest audit row's scale gates every proposed
//! position, and an optional per-ticker volatility snapshot applies a second
//! cap. Every proposed ticker gets a row, accepted or rejected, with the
//! reasons spelled out; nothing is filtered silently.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::audit::{fmt_pct0, fmt_pct2, AuditRow};

/// How to treat a ticker whose snapshot vol exceeds the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VolCapMode {
    /// Shrink the weight by `cap / vol`.
    Scale,
    /// Zero the weight.
    Reject,
}

impl VolCapMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scale" => Some(VolCapMode::Scale),
            "reject" => Some(VolCapMode::Reject),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionRow {
    pub ticker: String,
    pub proposed_weight: f64,
    pub executed_weight: f64,
    pub status: PlanStatus,
    pub gate_reason: String,
}

/// One decision point's plan. Constructed fresh per call, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionPlan {
    pub as_of: NaiveDate,
    pub scale: f64,
    pub gate_reason: String,
    pub rows: Vec<ExecutionRow>,
    pub cash_weight: f64,
    pub gross_exposure: f64,
}

/// Build a risk-gated execution plan from proposed weights.
///
/// `latest_audit` is the most recent row of the overlay's audit table; with
/// no audit history the plan defaults to full scale with an explicit
/// `NO_RISK_AUDIT` reason — never a silent risk-on or risk-off. `vol_snapshots`
/// maps ticker to 20-day annualized vol; tickers without a snapshot skip the
/// per-ticker cap.
pub fn build_execution_plan(
    as_of: NaiveDate,
    proposed: &[(String, f64)],
    latest_audit: Option<&AuditRow>,
    vol_snapshots: Option<&HashMap<String, f64>>,
    max_ticker_vol_ann: f64,
    vol_cap_mode: VolCapMode,
) -> ExecutionPlan {
    let (scale, day_reason) = match latest_audit {
        Some(row) => (row.scale, row.reason.clone()),
        None => (1.0, "NO_RISK_AUDIT: scale=1".to_string()),
    };

    let mut rows = Vec::with_capacity(proposed.len());
    for (ticker, weight) in proposed {
        let day_gated = weight * scale;

        let (factor, cap_note) = match vol_snapshots.and_then(|s| s.get(ticker)) {
            Some(&vol) if vol > max_ticker_vol_ann => match vol_cap_mode {
                VolCapMode::Reject => (
                    0.0,
                    format!(
                        "VOL_CAP_REJECT: vol20D={} > {}",
                        fmt_pct2(vol),
                        fmt_pct0(max_ticker_vol_ann)
                    ),
                ),
                VolCapMode::Scale => {
                    let factor = max_ticker_vol_ann / vol;
                    (
                        factor,
                        format!(
                            "VOL_CAP_SCALE: vol20D={} > {} → factor={:.2}",
                            fmt_pct2(vol),
                            fmt_pct0(max_ticker_vol_ann),
                            factor
                        ),
                    )
                }
            },
            _ => (1.0, String::new()),
        };

        let executed = day_gated * factor;
        let status = if executed > 0.0 {
            PlanStatus::Accepted
        } else {
            PlanStatus::Rejected
        };
        let gate_reason = if cap_note.is_empty() {
            day_reason.clone()
        } else {
            format!("{day_reason}; {cap_note}")
        };

        rows.push(ExecutionRow {
            ticker: ticker.clone(),
            proposed_weight: *weight,
            executed_weight: executed,
            status,
            gate_reason,
        });
    }

    let gross_exposure: f64 = rows.iter().map(|r| r.executed_weight).sum();
    let cash_weight = (1.0 - gross_exposure).max(0.0);

    ExecutionPlan {
        as_of,
        scale,
        gate_reason: day_reason,
        rows,
        cash_weight,
        gross_exposure,
    }
}
