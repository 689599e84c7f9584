//! Data access port trait.

use crate::domain::error::VolguardError;
use crate::domain::frame::DailyFrame;

/// Source of tabular market inputs: a price or weight frame per named
/// dataset (one date column, one value column per ticker).
pub trait DataPort {
    fn load_frame(&self, name: &str) -> Result<DailyFrame, VolguardError>;
}
