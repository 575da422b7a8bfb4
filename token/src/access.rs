//! Role-based access control with a delayed default-admin handover
//!
//! Exactly one account holds the default admin role. It can grant and revoke
//! every other role. Handing the admin role to someone else is a two-step
//! process: the current admin schedules the transfer, and the new admin
//! accepts it once the admin delay has passed.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::address::Address;
use crate::error::{Result, TokenError};

/// Longest wait before an increased admin delay takes effect (5 days)
pub const DEFAULT_ADMIN_DELAY_INCREASE_WAIT: u64 = 5 * 86_400;

/// 32-byte role identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role([u8; 32]);

impl Role {
    pub const DEFAULT_ADMIN: Role = Role([0u8; 32]);

    /// Role id derived from its name, `keccak256(name)`
    pub fn named(name: &str) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Keccak256::digest(name.as_bytes()));
        Self(bytes)
    }

    pub fn minter() -> Self {
        Self::named("MINTER_ROLE")
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A scheduled change that becomes effective at `schedule`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pending<T> {
    pub value: T,
    pub schedule: u64,
}

#[derive(Debug, Clone)]
pub struct AccessControl {
    members: HashMap<Role, HashSet<Address>>,
    default_admin: Option<Address>,
    admin_delay: u64,
    pending_delay: Option<Pending<u64>>,
    pending_admin: Option<Pending<Address>>,
}

impl AccessControl {
    pub fn new(admin: Address, admin_delay: u64) -> Result<Self> {
        if admin.is_zero() {
            return Err(TokenError::InvalidDefaultAdmin(admin));
        }

        let mut access = Self {
            members: HashMap::new(),
            default_admin: None,
            admin_delay,
            pending_delay: None,
            pending_admin: None,
        };
        access.set_default_admin(Some(admin));
        Ok(access)
    }

    pub fn has_role(&self, role: &Role, account: &Address) -> bool {
        self.members
            .get(role)
            .is_some_and(|accounts| accounts.contains(account))
    }

    /// Fails with `Unauthorized` unless `account` holds `role`
    pub fn check_role(&self, role: &Role, account: &Address) -> Result<()> {
        if self.has_role(role, account) {
            Ok(())
        } else {
            Err(TokenError::Unauthorized {
                account: *account,
                role: *role,
            })
        }
    }

    pub fn default_admin(&self) -> Option<Address> {
        self.default_admin
    }

    pub fn grant_role(&mut self, caller: &Address, role: Role, account: Address) -> Result<bool> {
        self.check_role(&Role::DEFAULT_ADMIN, caller)?;
        if role == Role::DEFAULT_ADMIN {
            return Err(TokenError::AdminRoleManagedByTransfer);
        }
        if account.is_zero() {
            return Err(TokenError::ZeroAddressPassed);
        }

        let granted = self.members.entry(role).or_default().insert(account);
        if granted {
            log::info!("🔑 Role {} granted to {} by {}", role, account, caller);
        }
        Ok(granted)
    }

    pub fn revoke_role(&mut self, caller: &Address, role: Role, account: &Address) -> Result<bool> {
        self.check_role(&Role::DEFAULT_ADMIN, caller)?;
        if role == Role::DEFAULT_ADMIN {
            return Err(TokenError::AdminRoleManagedByTransfer);
        }

        Ok(self.remove_member(role, account))
    }

    /// Give up a role held by `caller`. The admin role cannot be renounced here.
    pub fn renounce_role(&mut self, caller: &Address, role: Role) -> Result<bool> {
        if role == Role::DEFAULT_ADMIN {
            return Err(TokenError::AdminRoleManagedByTransfer);
        }

        Ok(self.remove_member(role, caller))
    }

    /// Delay currently in force at `now`; a scheduled change applies strictly after its schedule
    pub fn default_admin_delay(&self, now: u64) -> u64 {
        match self.pending_delay {
            Some(pending) if pending.schedule < now => pending.value,
            _ => self.admin_delay,
        }
    }

    pub fn pending_default_admin_delay(&self, now: u64) -> Option<Pending<u64>> {
        self.pending_delay.filter(|pending| pending.schedule >= now)
    }

    pub fn pending_default_admin(&self) -> Option<Pending<Address>> {
        self.pending_admin
    }

    pub fn begin_default_admin_transfer(
        &mut self,
        caller: &Address,
        new_admin: Address,
        now: u64,
    ) -> Result<Pending<Address>> {
        self.check_role(&Role::DEFAULT_ADMIN, caller)?;
        if new_admin.is_zero() {
            return Err(TokenError::ZeroAddressPassed);
        }

        let pending = Pending {
            value: new_admin,
            schedule: now.saturating_add(self.default_admin_delay(now)),
        };
        self.pending_admin = Some(pending);

        log::info!(
            "⏳ Default admin transfer {} -> {} scheduled for {}",
            caller,
            new_admin,
            pending.schedule
        );
        Ok(pending)
    }

    pub fn cancel_default_admin_transfer(&mut self, caller: &Address) -> Result<()> {
        self.check_role(&Role::DEFAULT_ADMIN, caller)?;

        if let Some(pending) = self.pending_admin.take() {
            log::info!("↩️  Default admin transfer to {} cancelled", pending.value);
        }
        Ok(())
    }

    /// Complete a scheduled transfer. Only the pending admin may call this,
    /// and only strictly after the schedule.
    pub fn accept_default_admin_transfer(&mut self, caller: &Address, now: u64) -> Result<()> {
        let pending = match self.pending_admin {
            Some(pending) if pending.value == *caller => pending,
            _ => return Err(TokenError::NoPendingAdminTransfer(*caller)),
        };
        if now <= pending.schedule {
            return Err(TokenError::AdminTransferNotReady {
                schedule: pending.schedule,
                now,
            });
        }

        let previous = self.default_admin;
        self.set_default_admin(Some(pending.value));
        self.pending_admin = None;

        log::info!(
            "👑 Default admin transferred from {:?} to {}",
            previous,
            pending.value
        );
        Ok(())
    }

    /// Schedule a new admin delay.
    ///
    /// A shorter delay waits out the difference, a longer one waits its own
    /// length capped at `DEFAULT_ADMIN_DELAY_INCREASE_WAIT`.
    pub fn change_default_admin_delay(
        &mut self,
        caller: &Address,
        new_delay: u64,
        now: u64,
    ) -> Result<Pending<u64>> {
        self.check_role(&Role::DEFAULT_ADMIN, caller)?;

        let current = self.default_admin_delay(now);
        self.admin_delay = current;

        let wait = if new_delay > current {
            new_delay.min(DEFAULT_ADMIN_DELAY_INCREASE_WAIT)
        } else {
            current - new_delay
        };
        let pending = Pending {
            value: new_delay,
            schedule: now.saturating_add(wait),
        };
        self.pending_delay = Some(pending);

        log::info!(
            "⏳ Default admin delay {} -> {} effective at {}",
            current,
            new_delay,
            pending.schedule
        );
        Ok(pending)
    }

    fn set_default_admin(&mut self, admin: Option<Address>) {
        if let Some(previous) = self.default_admin.take() {
            self.remove_member(Role::DEFAULT_ADMIN, &previous);
        }
        if let Some(admin) = admin {
            self.members
                .entry(Role::DEFAULT_ADMIN)
                .or_default()
                .insert(admin);
        }
        self.default_admin = admin;
    }

    fn remove_member(&mut self, role: Role, account: &Address) -> bool {
        let removed = self
            .members
            .get_mut(&role)
            .is_some_and(|accounts| accounts.remove(account));
        if removed {
            log::info!("🔒 Role {} removed from {}", role, account);
        }
        removed
    }
}
