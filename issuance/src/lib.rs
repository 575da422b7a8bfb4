//! Z Token Issuance Module
//!
//! Deterministic, non-compounding issuance accrual:
//! - Per-year inflation schedule with a flat terminal rate
//! - Timestamp to year-index resolution against a fixed epoch
//! - Full-year issuance from a frozen base supply
//! - Accrual across any number of year boundaries

pub mod accrual;
pub mod calculator;
pub mod error;
pub mod resolver;
pub mod schedule;

pub use accrual::{AccrualBreakdown, AccrualEngine};
pub use calculator::{base_supply_from_tokens, YearlyIssuanceCalculator};
pub use error::{IssuanceError, Result};
pub use resolver::YearResolver;
pub use schedule::ScheduleTable;

/// Issuance constants
pub mod constants {
    /// Length of one issuance year in seconds (365 days, not calendar accurate)
    pub const YEAR_SECONDS: u64 = 31_536_000;

    /// Basis points in a whole (100 bp = 1%)
    pub const BASIS_POINTS: u128 = 10_000;

    /// Decimal places of the token
    pub const TOKEN_DECIMALS: u8 = 18;

    /// One whole token in base units (10^18)
    pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

    /// Largest base supply (in base units) whose accrual products stay inside u128
    pub const MAX_BASE_SUPPLY: u128 = u128::MAX / YEAR_SECONDS as u128;

    /// Default annual schedule, index 0 is the sentinel
    pub const DEFAULT_INFLATION_RATES: [u16; 12] =
        [0, 900, 765, 650, 552, 469, 398, 338, 287, 243, 206, 175];

    /// Default rate once the schedule runs out (1.5%)
    pub const DEFAULT_FINAL_INFLATION_RATE: u16 = 150;
}
