//! Report persistence port trait.

use crate::domain::audit::AuditRow;
use crate::domain::error::VolguardError;
use crate::domain::plan::ExecutionPlan;

/// Port for persisting a run's artifacts: the per-day audit ledger and the
/// as-of execution plan. The domain performs no I/O itself.
pub trait ReportPort {
    fn write_audit(&self, audit: &[AuditRow], name: &str) -> Result<(), VolguardError>;

    fn write_plan(&self, plan: &ExecutionPlan, name: &str) -> Result<(), VolguardError>;
}
