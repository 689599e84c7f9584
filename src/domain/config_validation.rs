//! Configuration validation.
//!
//! Every config field is checked before a run starts; a bad value fails
//! here, never mid-computation.

use crate::domain::error::VolguardError;
use crate::domain::plan::VolCapMode;
use crate::ports::config_port::ConfigPort;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), VolguardError> {
    validate_data_paths(config)?;
    validate_risk_section(config)?;
    validate_costs(config)?;
    validate_plan_section(config)?;
    Ok(())
}

fn validate_data_paths(config: &dyn ConfigPort) -> Result<(), VolguardError> {
    for key in ["prices", "weights"] {
        if config.get_string("data", key).is_none() {
            return Err(VolguardError::ConfigMissing {
                section: "data".to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_risk_section(config: &dyn ConfigPort) -> Result<(), VolguardError> {
    let target = config.get_double("risk", "target_vol_ann", 0.12);
    if target <= 0.0 {
        return Err(VolguardError::ConfigInvalid {
            section: "risk".to_string(),
            key: "target_vol_ann".to_string(),
            reason: "target_vol_ann must be positive".to_string(),
        });
    }

    let lookback = config.get_int("risk", "vol_lookback", 20);
    if lookback < 1 {
        return Err(VolguardError::ConfigInvalid {
            section: "risk".to_string(),
            key: "vol_lookback".to_string(),
            reason: "vol_lookback must be at least 1".to_string(),
        });
    }

    let max_leverage = config.get_double("risk", "max_leverage", 1.0);
    if max_leverage < 0.0 {
        return Err(VolguardError::ConfigInvalid {
            section: "risk".to_string(),
            key: "max_leverage".to_string(),
            reason: "max_leverage must be non-negative".to_string(),
        });
    }

    let dd_kill = config.get_double("risk", "dd_kill", 0.20);
    if !(dd_kill > 0.0 && dd_kill <= 1.0) {
        return Err(VolguardError::ConfigInvalid {
            section: "risk".to_string(),
            key: "dd_kill".to_string(),
            reason: "dd_kill must be in (0, 1]".to_string(),
        });
    }

    if let Some(recover) = parse_dd_recover(config)? {
        if !(recover > 0.0 && recover <= 1.0) {
            return Err(VolguardError::ConfigInvalid {
                section: "risk".to_string(),
                key: "dd_recover".to_string(),
                reason: "dd_recover must be in (0, 1]".to_string(),
            });
        }
    }
    Ok(())
}

/// `dd_recover` is genuinely optional: absent or empty means the kill switch
/// is sticky. A present value must parse.
pub fn parse_dd_recover(config: &dyn ConfigPort) -> Result<Option<f64>, VolguardError> {
    match config.get_string("risk", "dd_recover") {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| VolguardError::ConfigInvalid {
                section: "risk".to_string(),
                key: "dd_recover".to_string(),
                reason: format!("not a number: {raw:?}"),
            }),
    }
}

fn validate_costs(config: &dyn ConfigPort) -> Result<(), VolguardError> {
    let bps = config.get_double("costs", "transaction_cost_bps", 0.0);
    if bps < 0.0 {
        return Err(VolguardError::ConfigInvalid {
            section: "costs".to_string(),
            key: "transaction_cost_bps".to_string(),
            reason: "transaction_cost_bps must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_plan_section(config: &dyn ConfigPort) -> Result<(), VolguardError> {
    let cap = config.get_double("plan", "max_ticker_vol_ann", 0.35);
    if cap <= 0.0 {
        return Err(VolguardError::ConfigInvalid {
            section: "plan".to_string(),
            key: "max_ticker_vol_ann".to_string(),
            reason: "max_ticker_vol_ann must be positive".to_string(),
        });
    }

    let mode = config
        .get_string("plan", "vol_cap_mode")
        .unwrap_or_else(|| "scale".to_string());
    if VolCapMode::parse(&mode).is_none() {
        return Err(VolguardError::ConfigInvalid {
            section: "plan".to_string(),
            key: "vol_cap_mode".to_string(),
            reason: format!("expected scale or reject, got {mode:?}"),
        });
    }
    Ok(())
}
