//! CSV file data adapter.
//!
//! Reads wide frames: first column `date` (YYYY-MM-DD), one column per
//! ticker, one row per day. Used for both price frames and proposed-weight
//! frames.

use crate::domain::error::VolguardError;
use crate::domain::frame::DailyFrame;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::PathBuf;

pub struct CsvAdapter {
    /// Dataset name -> CSV path.
    files: HashMap<String, PathBuf>,
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn with_file(mut self, name: &str, path: PathBuf) -> Self {
        self.files.insert(name.to_string(), path);
        self
    }

    fn read_frame(path: &PathBuf) -> Result<DailyFrame, VolguardError> {
        let mut rdr = csv::Reader::from_path(path).map_err(|e| VolguardError::Data {
            reason: format!("failed to open {}: {}", path.display(), e),
        })?;

        let headers = rdr.headers().map_err(|e| VolguardError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        if headers.is_empty() {
            return Err(VolguardError::Data {
                reason: format!("{} has no columns", path.display()),
            });
        }
        let tickers: Vec<String> = headers.iter().skip(1).map(|h| h.to_string()).collect();

        let mut dates = Vec::new();
        let mut values = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| VolguardError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).ok_or_else(|| VolguardError::Data {
                reason: format!("{}: missing date column", path.display()),
            })?;
            let date =
                NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| VolguardError::Data {
                    reason: format!("{}: invalid date {:?}: {}", path.display(), date_str, e),
                })?;

            let mut row = Vec::with_capacity(tickers.len());
            for (i, ticker) in tickers.iter().enumerate() {
                let cell = record.get(i + 1).ok_or_else(|| VolguardError::Data {
                    reason: format!("{}: row {} missing column {}", path.display(), date, ticker),
                })?;
                let value: f64 = cell.trim().parse().map_err(|e| VolguardError::Data {
                    reason: format!(
                        "{}: invalid value {:?} for {} on {}: {}",
                        path.display(),
                        cell,
                        ticker,
                        date,
                        e
                    ),
                })?;
                row.push(value);
            }

            dates.push(date);
            values.push(row);
        }

        DailyFrame::new(dates, tickers, values)
    }
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataPort for CsvAdapter {
    fn load_frame(&self, name: &str) -> Result<DailyFrame, VolguardError> {
        let path = self.files.get(name).ok_or_else(|| VolguardError::Data {
            reason: format!("no dataset named {:?} configured", name),
        })?;
        Self::read_frame(path)
    }
}
