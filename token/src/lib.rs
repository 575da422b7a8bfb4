//! Z Token Module
//!
//! Wraps the issuance engine in a token:
//! - Mint controller with a single-writer mint watermark
//! - Role-based access with a delayed default-admin transfer
//! - Balance ledger where transfers to the token address burn
//!
//! Every base-supply figure used for issuance is frozen at construction;
//! burns only ever change the live total supply.

pub mod access;
pub mod address;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod token;

pub use access::{AccessControl, Pending, Role, DEFAULT_ADMIN_DELAY_INCREASE_WAIT};
pub use address::Address;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, TokenError};
pub use ledger::{SupplyStats, TokenLedger, TransferEvent, DEFAULT_EVENT_CAPACITY};
pub use token::{MintReceipt, TokenParams, ZToken};

pub use z_issuance::{self as issuance, AccrualBreakdown, IssuanceError};
