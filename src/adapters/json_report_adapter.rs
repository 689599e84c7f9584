//! JSON report adapter.
//!
//! Persists a run's artifacts under an output directory:
//! `<name>_audit.json` (the full per-day audit ledger),
//! `<name>_execution.json` (the as-of execution plan), and a
//! `latest_execution.json` pointer copy of the most recent plan.

use crate::domain::audit::AuditRow;
use crate::domain::error::VolguardError;
use crate::domain::plan::ExecutionPlan;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::PathBuf;

pub struct JsonReportAdapter {
    out_dir: PathBuf,
}

impl JsonReportAdapter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn write_json(&self, filename: &str, json: &str) -> Result<PathBuf, VolguardError> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(filename);
        fs::write(&path, json)?;
        Ok(path)
    }
}

impl ReportPort for JsonReportAdapter {
    fn write_audit(&self, audit: &[AuditRow], name: &str) -> Result<(), VolguardError> {
        let json = serde_json::to_string_pretty(audit).map_err(|e| VolguardError::Report {
            reason: format!("audit serialization failed: {e}"),
        })?;
        self.write_json(&format!("{name}_audit.json"), &json)?;
        Ok(())
    }

    fn write_plan(&self, plan: &ExecutionPlan, name: &str) -> Result<(), VolguardError> {
        let json = serde_json::to_string_pretty(plan).map_err(|e| VolguardError::Report {
            reason: format!("plan serialization failed: {e}"),
        })?;
        self.write_json(&format!("{name}_execution.json"), &json)?;
        self.write_json("latest_execution.json", &json)?;
        Ok(())
    }
}
