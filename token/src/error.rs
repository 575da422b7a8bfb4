//! Token error types

use thiserror::Error;
use z_issuance::IssuanceError;

use crate::access::Role;
use crate::address::Address;

/// Token, ledger and access control errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error(transparent)]
    Issuance(#[from] IssuanceError),

    #[error("Zero address passed")]
    ZeroAddressPassed,

    #[error("Invalid default admin: {0}")]
    InvalidDefaultAdmin(Address),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Account {account} is missing role {role}")]
    Unauthorized { account: Address, role: Role },

    #[error("Invalid receiver: {0}")]
    InvalidReceiver(Address),

    #[error("Insufficient balance for {account}: balance {balance}, needed {needed}")]
    InsufficientBalance {
        account: Address,
        balance: u128,
        needed: u128,
    },

    #[error("Balance overflow")]
    BalanceOverflow,

    #[error("Admin transfer not ready: scheduled for {schedule}, now {now}")]
    AdminTransferNotReady { schedule: u64, now: u64 },

    #[error("No pending default admin transfer for {0}")]
    NoPendingAdminTransfer(Address),

    #[error("Default admin role is only changed through the delayed transfer")]
    AdminRoleManagedByTransfer,
}

pub type Result<T> = std::result::Result<T, TokenError>;
