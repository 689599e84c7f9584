#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use std::collections::HashMap;
use volguard::domain::error::VolguardError;
use volguard::domain::frame::DailyFrame;
use volguard::domain::risk::RiskConfig;
use volguard::ports::data_port::DataPort;

pub fn date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(i as u64)
}

/// Single-ticker weight frame, fully invested every day.
pub fn full_weights(n: usize) -> DailyFrame {
    DailyFrame::new(
        (0..n).map(date).collect(),
        vec!["AAA".into()],
        vec![vec![1.0]; n],
    )
    .unwrap()
}

pub fn returns_frame(rets: &[f64]) -> DailyFrame {
    DailyFrame::new(
        (0..rets.len()).map(date).collect(),
        vec!["AAA".into()],
        rets.iter().map(|&r| vec![r]).collect(),
    )
    .unwrap()
}

/// Alternating small returns: rolling vol is never zero.
pub fn choppy_returns(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| if i % 2 == 0 { 0.01 } else { -0.008 })
        .collect()
}

pub fn risk_config(lookback: usize, dd_kill: f64, dd_recover: Option<f64>) -> RiskConfig {
    RiskConfig::new(0.12, lookback, 1.0, dd_kill, dd_recover).unwrap()
}

pub struct MockDataPort {
    pub frames: HashMap<String, DailyFrame>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            frames: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_frame(mut self, name: &str, frame: DailyFrame) -> Self {
        self.frames.insert(name.to_string(), frame);
        self
    }

    pub fn with_error(mut self, name: &str, reason: &str) -> Self {
        self.errors.insert(name.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_frame(&self, name: &str) -> Result<DailyFrame, VolguardError> {
        if let Some(reason) = self.errors.get(name) {
            return Err(VolguardError::Data {
                reason: reason.clone(),
            });
        }
        self.frames
            .get(name)
            .cloned()
            .ok_or_else(|| VolguardError::Data {
                reason: format!("no frame named {name:?}"),
            })
    }
}
