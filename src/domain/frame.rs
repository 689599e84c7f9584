//! Date-indexed ticker matrices.
//!
//! A [`DailyFrame`] holds one f64 value per (date, ticker) cell and is the
//! tabular input/output shape of the risk engine: price frames, return
//! frames, and weight matrices all use it. Dates are strictly increasing;
//! every row has exactly one value per ticker. Weight frames are long-only
//! by convention (non-negative weights, cash implicit as 1 - sum).

use chrono::NaiveDate;

use super::error::VolguardError;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyFrame {
    pub dates: Vec<NaiveDate>,
    pub tickers: Vec<String>,
    /// Row-major: `values[day][ticker_idx]`.
    pub values: Vec<Vec<f64>>,
}

impl DailyFrame {
    pub fn new(
        dates: Vec<NaiveDate>,
        tickers: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self, VolguardError> {
        if values.len() != dates.len() {
            return Err(VolguardError::InvalidFrame {
                reason: format!("{} rows for {} dates", values.len(), dates.len()),
            });
        }
        for (i, row) in values.iter().enumerate() {
            if row.len() != tickers.len() {
                return Err(VolguardError::InvalidFrame {
                    reason: format!(
                        "row {} has {} values for {} tickers",
                        i,
                        row.len(),
                        tickers.len()
                    ),
                });
            }
        }
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(VolguardError::InvalidFrame {
                    reason: format!("dates not strictly increasing at {}", pair[1]),
                });
            }
        }
        Ok(DailyFrame {
            dates,
            tickers,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn row(&self, day: usize) -> &[f64] {
        &self.values[day]
    }

    pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
        self.tickers.iter().position(|t| t == ticker)
    }

    pub fn column(&self, ticker: &str) -> Option<Vec<f64>> {
        let idx = self.ticker_index(ticker)?;
        Some(self.values.iter().map(|row| row[idx]).collect())
    }

    /// Fail fast when two frames do not share the exact same date index and
    /// ticker set. Frames are never silently re-aligned.
    pub fn check_aligned(&self, other: &DailyFrame) -> Result<(), VolguardError> {
        if self.dates != other.dates {
            return Err(VolguardError::ShapeMismatch {
                reason: format!(
                    "date index differs ({} vs {} rows)",
                    self.dates.len(),
                    other.dates.len()
                ),
            });
        }
        if self.tickers != other.tickers {
            return Err(VolguardError::ShapeMismatch {
                reason: format!(
                    "ticker set differs ({:?} vs {:?})",
                    self.tickers, other.tickers
                ),
            });
        }
        Ok(())
    }

    /// Simple daily returns from a price frame: `p[t] / p[t-1] - 1`, with
    /// day 0 set to zero.
    pub fn to_returns(&self) -> DailyFrame {
        let mut values = Vec::with_capacity(self.values.len());
        for (i, row) in self.values.iter().enumerate() {
            if i == 0 {
                values.push(vec![0.0; row.len()]);
            } else {
                let prev = &self.values[i - 1];
                values.push(
                    row.iter()
                        .zip(prev.iter())
                        .map(|(&p, &q)| if q != 0.0 { p / q - 1.0 } else { 0.0 })
                        .collect(),
                );
            }
        }
        DailyFrame {
            dates: self.dates.clone(),
            tickers: self.tickers.clone(),
            values,
        }
    }
}
