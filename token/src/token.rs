//! The Z token: issuance engine, mint controller, roles and ledger

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use z_issuance::constants::TOKEN_DECIMALS;
use z_issuance::{
    base_supply_from_tokens, AccrualBreakdown, AccrualEngine, ScheduleTable, YearResolver,
    YearlyIssuanceCalculator,
};

use crate::access::{AccessControl, Pending, Role};
use crate::address::Address;
use crate::clock::Clock;
use crate::error::{Result, TokenError};
use crate::ledger::{SupplyStats, TokenLedger, TransferEvent};

/// Construction parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    pub name: String,
    pub symbol: String,
    pub admin: Address,
    /// Seconds a default-admin transfer has to wait
    pub admin_delay: u64,
    pub minter: Address,
    pub mint_beneficiary: Address,
    /// Whole tokens; scaled by 10^18 into the base supply
    pub initial_supply: u128,
    pub inflation_rates: Vec<u16>,
    pub final_inflation_rate: u16,
}

/// Outcome of one successful mint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub amount: u128,
    pub beneficiary: Address,
    pub previous_mint_time: u64,
    pub minted_at: u64,
}

/// Watermark and ledger change together, so they share one lock
#[derive(Debug)]
struct MintState {
    last_mint_time: u64,
    ledger: TokenLedger,
}

pub struct ZToken {
    name: String,
    symbol: String,
    address: Address,
    engine: AccrualEngine,
    clock: Arc<dyn Clock>,
    access: RwLock<AccessControl>,
    mint_beneficiary: RwLock<Address>,
    state: Mutex<MintState>,
}

impl ZToken {
    /// Validate `params`, fix the epoch at `clock.now()` and credit the whole
    /// base supply to the mint beneficiary.
    pub fn new(params: TokenParams, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut access = AccessControl::new(params.admin, params.admin_delay)?;
        if params.minter.is_zero() || params.mint_beneficiary.is_zero() {
            return Err(TokenError::ZeroAddressPassed);
        }

        let base_supply = base_supply_from_tokens(params.initial_supply)?;
        let schedule = ScheduleTable::new(params.inflation_rates, params.final_inflation_rate)?;
        let calculator = YearlyIssuanceCalculator::new(base_supply, schedule)?;

        let deploy_time = clock.now();
        let engine = AccrualEngine::new(YearResolver::new(deploy_time), calculator);

        access.grant_role(&params.admin, Role::minter(), params.minter)?;

        let address = Self::derive_address(&params.admin, &params.name, deploy_time);
        let mut ledger = TokenLedger::new(address);
        ledger.mint_to(params.mint_beneficiary, base_supply)?;

        log::info!(
            "🪙 {} ({}) deployed at {} with base supply {} to {}",
            params.name,
            params.symbol,
            deploy_time,
            base_supply,
            params.mint_beneficiary
        );

        Ok(Self {
            name: params.name,
            symbol: params.symbol,
            address,
            engine,
            clock,
            access: RwLock::new(access),
            mint_beneficiary: RwLock::new(params.mint_beneficiary),
            state: Mutex::new(MintState {
                last_mint_time: deploy_time,
                ledger,
            }),
        })
    }

    fn derive_address(admin: &Address, name: &str, deploy_time: u64) -> Address {
        let mut seed = Vec::with_capacity(20 + name.len() + 8);
        seed.extend_from_slice(admin.as_bytes());
        seed.extend_from_slice(name.as_bytes());
        seed.extend_from_slice(&deploy_time.to_be_bytes());
        Address::derive(&seed)
    }

    // ---- metadata -------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        TOKEN_DECIMALS
    }

    /// The token's own address; transfers here are burns
    pub fn address(&self) -> Address {
        self.address
    }

    // ---- issuance queries ----------------------------------------------

    pub fn engine(&self) -> &AccrualEngine {
        &self.engine
    }

    pub fn deploy_time(&self) -> u64 {
        self.engine.deploy_time()
    }

    pub fn last_mint_time(&self) -> u64 {
        self.state.lock().last_mint_time
    }

    pub fn base_supply(&self) -> u128 {
        self.engine.base_supply()
    }

    pub fn annual_inflation_rates(&self) -> &[u16] {
        self.engine.schedule().rates()
    }

    pub fn final_inflation_rate(&self) -> u16 {
        self.engine.schedule().final_rate()
    }

    pub fn current_inflation_rate(&self, year: u64) -> u16 {
        self.engine.current_inflation_rate(year)
    }

    pub fn year_since_deploy(&self, timestamp: u64) -> Result<u64> {
        Ok(self.engine.year_since_deploy(timestamp)?)
    }

    pub fn tokens_per_year(&self, year: u64) -> u128 {
        self.engine.tokens_per_year(year)
    }

    /// Tokens a mint at `timestamp` would credit, against the current watermark
    pub fn calculate_mintable_tokens(&self, timestamp: u64) -> Result<u128> {
        let last_mint_time = self.last_mint_time();
        Ok(self.engine.calculate_mintable_tokens(last_mint_time, timestamp)?)
    }

    pub fn mintable_breakdown(&self, timestamp: u64) -> Result<AccrualBreakdown> {
        let last_mint_time = self.last_mint_time();
        Ok(self.engine.breakdown(last_mint_time, timestamp)?)
    }

    // ---- mint controller ------------------------------------------------

    pub fn mint_beneficiary(&self) -> Address {
        *self.mint_beneficiary.read()
    }

    /// Credit everything accrued since the last mint to the beneficiary.
    ///
    /// A second mint in the same second credits zero and succeeds. A clock
    /// that reads earlier than the watermark fails with `InvalidTime`.
    pub fn mint(&self, caller: &Address) -> Result<MintReceipt> {
        let access = self.access.read();
        access.check_role(&Role::minter(), caller)?;
        let beneficiary = *self.mint_beneficiary.read();

        let mut state = self.state.lock();
        let now = self.clock.now();
        let previous_mint_time = state.last_mint_time;

        let amount = if now == previous_mint_time {
            0
        } else {
            self.engine.calculate_mintable_tokens(previous_mint_time, now)?
        };

        state.ledger.mint_to(beneficiary, amount)?;
        state.last_mint_time = now;

        log::info!(
            "✅ Minted {} to {} for ({}, {}]",
            amount,
            beneficiary,
            previous_mint_time,
            now
        );

        Ok(MintReceipt {
            amount,
            beneficiary,
            previous_mint_time,
            minted_at: now,
        })
    }

    pub fn set_mint_beneficiary(&self, caller: &Address, beneficiary: Address) -> Result<()> {
        let access = self.access.read();
        access.check_role(&Role::DEFAULT_ADMIN, caller)?;
        if beneficiary.is_zero() {
            return Err(TokenError::ZeroAddressPassed);
        }

        let mut current = self.mint_beneficiary.write();
        log::info!("📝 Mint beneficiary {} -> {}", *current, beneficiary);
        *current = beneficiary;
        Ok(())
    }

    // ---- ledger ---------------------------------------------------------

    pub fn total_supply(&self) -> u128 {
        self.state.lock().ledger.total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.state.lock().ledger.balance_of(account)
    }

    pub fn supply_stats(&self) -> SupplyStats {
        self.state.lock().ledger.stats()
    }

    /// Most recent transfer events, oldest first
    pub fn transfer_events(&self) -> Vec<TransferEvent> {
        self.state.lock().ledger.events()
    }

    /// Retained transfer events, removed from the token
    pub fn take_transfer_events(&self) -> Vec<TransferEvent> {
        self.state.lock().ledger.drain_events()
    }

    pub fn transfer(&self, caller: &Address, to: Address, amount: u128) -> Result<()> {
        self.state.lock().ledger.transfer(*caller, to, amount)
    }

    // ---- access control -------------------------------------------------

    pub fn has_role(&self, role: &Role, account: &Address) -> bool {
        self.access.read().has_role(role, account)
    }

    pub fn default_admin(&self) -> Option<Address> {
        self.access.read().default_admin()
    }

    pub fn grant_role(&self, caller: &Address, role: Role, account: Address) -> Result<bool> {
        self.access.write().grant_role(caller, role, account)
    }

    pub fn revoke_role(&self, caller: &Address, role: Role, account: &Address) -> Result<bool> {
        self.access.write().revoke_role(caller, role, account)
    }

    pub fn renounce_role(&self, caller: &Address, role: Role) -> Result<bool> {
        self.access.write().renounce_role(caller, role)
    }

    pub fn default_admin_delay(&self) -> u64 {
        self.access.read().default_admin_delay(self.clock.now())
    }

    pub fn pending_default_admin(&self) -> Option<Pending<Address>> {
        self.access.read().pending_default_admin()
    }

    pub fn begin_default_admin_transfer(
        &self,
        caller: &Address,
        new_admin: Address,
    ) -> Result<Pending<Address>> {
        let now = self.clock.now();
        self.access
            .write()
            .begin_default_admin_transfer(caller, new_admin, now)
    }

    pub fn accept_default_admin_transfer(&self, caller: &Address) -> Result<()> {
        let now = self.clock.now();
        self.access.write().accept_default_admin_transfer(caller, now)
    }

    pub fn cancel_default_admin_transfer(&self, caller: &Address) -> Result<()> {
        self.access.write().cancel_default_admin_transfer(caller)
    }

    pub fn change_default_admin_delay(&self, caller: &Address, new_delay: u64) -> Result<Pending<u64>> {
        let now = self.clock.now();
        self.access
            .write()
            .change_default_admin_delay(caller, new_delay, now)
    }
}

impl std::fmt::Debug for ZToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZToken")
            .field("name", &self.name)
            .field("symbol", &self.symbol)
            .field("address", &self.address)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}
