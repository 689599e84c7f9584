//! Core domain types and logic.

pub mod frame;
pub mod stats;
pub mod risk;
pub mod audit;
pub mod plan;
pub mod config_validation;
pub mod error;
