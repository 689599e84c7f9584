//! Per-day audit records for the risk overlay.
//!
//! Each day of a run gets exactly one immutable [`AuditRow`] with a
//! deterministic, human-readable reason string. Branch priority is strict:
//! killed, then warm-up, then vol targeting. The audit table is the
//! append-only ledger of a run; it is built once and never mutated.

use chrono::NaiveDate;
use serde::Serialize;

use super::risk::RiskConfig;

/// Clipping is only reported when the raw and final scales differ by more
/// than this epsilon.
pub const CLIP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditRow {
    pub date: NaiveDate,
    pub scale: f64,
    /// Annualized rolling vol estimate; `None` during warm-up.
    pub vol_est_ann: Option<f64>,
    pub drawdown: f64,
    pub killed: bool,
    pub clipped: bool,
    pub reason: String,
    pub turnover: f64,
    pub cost: f64,
}

impl AuditRow {
    /// Assemble one day's record from the overlay outputs. `raw_scale` is the
    /// unclipped vol-target ratio, `scale` the final post-kill value.
    pub fn build(
        date: NaiveDate,
        cfg: &RiskConfig,
        killed: bool,
        drawdown: f64,
        vol_est_ann: Option<f64>,
        raw_scale: f64,
        scale: f64,
        turnover: f64,
        cost: f64,
    ) -> Self {
        let (clipped, reason) = if killed {
            (
                false,
                format!(
                    "KILL_SWITCH: dd={} <= -{} → scale=0",
                    fmt_pct2(drawdown),
                    fmt_pct0(cfg.dd_kill)
                ),
            )
        } else {
            match vol_est_ann {
                None => (
                    false,
                    format!("WARMUP: need {}d for vol_est → scale=0", cfg.vol_lookback),
                ),
                Some(vol) => {
                    let clipped = (raw_scale - scale).abs() > CLIP_EPSILON;
                    let clip_note = if clipped { " (CLIPPED)" } else { "" };
                    (
                        clipped,
                        format!(
                            "VOL_TARGET: vol_est={}, target={} → raw_scale={:.2}, scale={:.2}{}",
                            fmt_pct2(vol),
                            fmt_pct2(cfg.target_vol_ann),
                            raw_scale,
                            scale,
                            clip_note
                        ),
                    )
                }
            }
        };

        AuditRow {
            date,
            scale,
            vol_est_ann,
            drawdown,
            killed,
            clipped,
            reason,
            turnover,
            cost,
        }
    }
}

/// Percent with two decimals, e.g. 0.1234 -> "12.34%".
pub(crate) fn fmt_pct2(x: f64) -> String {
    format!("{:.2}%", x * 100.0)
}

/// Percent with no decimals, e.g. 0.20 -> "20%".
pub(crate) fn fmt_pct0(x: f64) -> String {
    format!("{:.0}%", x * 100.0)
}
