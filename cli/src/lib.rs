//! Z Token command line support
//!
//! Config file loading and the offline reports behind the `ztoken` binary.

pub mod config;
pub mod report;

pub use config::{Config, ConfigError, SimulationConfig, TokenConfig};
pub use report::{
    format_tokens, schedule_rows, ScheduleRow, SimulationReport, YearSummary, MAX_SIMULATION_MINTS,
};
