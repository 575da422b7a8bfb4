//! Fungible balance ledger
//!
//! Transfers to the token's own address are burns: the value leaves the
//! sender and the total supply shrinks. The base supply used for issuance
//! lives elsewhere and never sees these changes.
//!
//! Transfer events are logged as they happen and only the most recent ones
//! are kept in memory.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::{Result, TokenError};

/// Transfer events retained by default before the oldest are dropped
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Balance movement; `Address::ZERO` as source is a mint, as destination a burn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub value: u128,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplyStats {
    pub total_supply: u128,
    pub total_minted: u128,
    pub total_burned: u128,
    pub holders: usize,
    /// Every event ever recorded, including the ones no longer retained
    pub events_recorded: u64,
}

#[derive(Debug, Clone)]
pub struct TokenLedger {
    token_address: Address,
    balances: HashMap<Address, u128>,
    total_supply: u128,
    total_minted: u128,
    total_burned: u128,
    events: VecDeque<TransferEvent>,
    event_capacity: usize,
    events_recorded: u64,
}

impl TokenLedger {
    pub fn new(token_address: Address) -> Self {
        Self::with_event_capacity(token_address, DEFAULT_EVENT_CAPACITY)
    }

    /// Ledger retaining at most `event_capacity` recent transfer events
    pub fn with_event_capacity(token_address: Address, event_capacity: usize) -> Self {
        Self {
            token_address,
            balances: HashMap::new(),
            total_supply: 0,
            total_minted: 0,
            total_burned: 0,
            events: VecDeque::with_capacity(event_capacity.min(DEFAULT_EVENT_CAPACITY)),
            event_capacity,
            events_recorded: 0,
        }
    }

    pub fn token_address(&self) -> Address {
        self.token_address
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Retained events, oldest first
    pub fn events(&self) -> Vec<TransferEvent> {
        self.events.iter().copied().collect()
    }

    /// Hand over the retained events and forget them
    pub fn drain_events(&mut self) -> Vec<TransferEvent> {
        self.events.drain(..).collect()
    }

    pub fn stats(&self) -> SupplyStats {
        SupplyStats {
            total_supply: self.total_supply,
            total_minted: self.total_minted,
            total_burned: self.total_burned,
            holders: self.balances.values().filter(|b| **b > 0).count(),
            events_recorded: self.events_recorded,
        }
    }

    /// Create `amount` new tokens for `to`. A zero amount still records an event.
    pub fn mint_to(&mut self, to: Address, amount: u128) -> Result<()> {
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(to));
        }

        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::BalanceOverflow)?;
        // Every balance is bounded by the total supply
        *self.balances.entry(to).or_insert(0) += amount;
        self.total_supply = total_supply;
        self.total_minted = self.total_minted.saturating_add(amount);

        self.record(Address::ZERO, to, amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to`, burning it when `to` is the token itself
    pub fn transfer(&mut self, from: Address, to: Address, amount: u128) -> Result<()> {
        if from.is_zero() {
            return Err(TokenError::ZeroAddressPassed);
        }
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver(to));
        }

        self.debit(from, amount)?;
        self.record(from, to, amount);

        if to == self.token_address {
            self.total_supply -= amount;
            self.total_burned = self.total_burned.saturating_add(amount);
            self.record(from, Address::ZERO, amount);
            log::info!("🔥 Burned {} from {}", amount, from);
        } else {
            *self.balances.entry(to).or_insert(0) += amount;
        }

        Ok(())
    }

    /// Destroy `amount` of `from`'s tokens
    pub fn burn_from(&mut self, from: Address, amount: u128) -> Result<()> {
        self.debit(from, amount)?;
        self.total_supply -= amount;
        self.total_burned = self.total_burned.saturating_add(amount);

        self.record(from, Address::ZERO, amount);
        Ok(())
    }

    fn record(&mut self, from: Address, to: Address, value: u128) {
        log::debug!("Transfer {} -> {}: {}", from, to, value);
        self.events_recorded += 1;
        if self.event_capacity == 0 {
            return;
        }
        if self.events.len() == self.event_capacity {
            self.events.pop_front();
        }
        self.events.push_back(TransferEvent { from, to, value });
    }

    fn debit(&mut self, account: Address, amount: u128) -> Result<()> {
        let balance = self.balance_of(&account);
        if balance < amount {
            return Err(TokenError::InsufficientBalance {
                account,
                balance,
                needed: amount,
            });
        }

        self.balances.insert(account, balance - amount);
        Ok(())
    }
}
