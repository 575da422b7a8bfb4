//! Issuance error types

use thiserror::Error;

/// Issuance engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssuanceError {
    #[error("Invalid time: {actual} (bound: {lower_bound})")]
    InvalidTime { lower_bound: u64, actual: u64 },

    #[error("Invalid inflation array: {0:?}")]
    InvalidInflationArray(Vec<u16>),

    #[error("Initial supply must be greater than zero")]
    ZeroInitialSupply,

    #[error("Initial supply too large: {0}")]
    SupplyTooLarge(u128),

    #[error("Arithmetic overflow while accruing issuance")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, IssuanceError>;
