//! In-memory collaborators for exercising the vault off-chain.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::engine::GobblerVault;
use crate::events::Deposited;
use crate::interfaces::{BalanceOracle, GobblerCustody};
use crate::math::Wad;
use crate::state::Pool;
use crate::strategies::MaxBiddingMintStrategy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockGobbler {
    pub owner: Pubkey,
    pub multiple: u64,
    pub revealed: bool,
}

/// Gobbler collection double: explicit ownership, per-token multiples, goo balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockArtGobbler {
    pub pool: Pubkey,
    pub gobblers: BTreeMap<u64, MockGobbler>,
    pub goo: BTreeMap<Pubkey, Wad>,
    /// Multiple assigned to Gobblers minted from goo
    pub mint_multiple: u64,
    /// Goo charged per mint; bids below it fail
    pub mint_price: Wad,
    next_id: u64,
}

impl MockArtGobbler {
    pub fn new(pool: Pubkey) -> Self {
        Self {
            pool,
            gobblers: BTreeMap::new(),
            goo: BTreeMap::new(),
            mint_multiple: 5,
            mint_price: Wad::ZERO,
            next_id: 0,
        }
    }

    /// Mints a revealed Gobbler straight to `owner`.
    pub fn mint_to(&mut self, owner: &Pubkey, multiple: u64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.gobblers.insert(
            id,
            MockGobbler {
                owner: *owner,
                multiple,
                revealed: true,
            },
        );
        id
    }

    pub fn unreveal(&mut self, gobbler_id: u64) {
        if let Some(gobbler) = self.gobblers.get_mut(&gobbler_id) {
            gobbler.revealed = false;
        }
    }

    pub fn reveal(&mut self, gobbler_id: u64, multiple: u64) {
        if let Some(gobbler) = self.gobblers.get_mut(&gobbler_id) {
            gobbler.revealed = true;
            gobbler.multiple = multiple;
        }
    }

    pub fn set_goo_balance(&mut self, holder: &Pubkey, amount: Wad) {
        self.goo.insert(*holder, amount);
    }

    fn move_gobbler(&mut self, gobbler_id: u64, from: &Pubkey, to: &Pubkey) -> Result<()> {
        let gobbler = self
            .gobblers
            .get_mut(&gobbler_id)
            .ok_or(ProgramError::InvalidArgument)?;
        if gobbler.owner != *from {
            return Err(ProgramError::IllegalOwner.into());
        }
        gobbler.owner = *to;
        Ok(())
    }
}

impl GobblerCustody for MockArtGobbler {
    fn transfer_in(&mut self, from: &Pubkey, gobbler_id: u64) -> Result<()> {
        let pool = self.pool;
        self.move_gobbler(gobbler_id, from, &pool)
    }

    fn transfer_out(&mut self, gobbler_id: u64, to: &Pubkey) -> Result<()> {
        let pool = self.pool;
        self.move_gobbler(gobbler_id, &pool, to)
    }

    fn multiplier_of(&self, gobbler_id: u64) -> u64 {
        match self.gobblers.get(&gobbler_id) {
            Some(gobbler) if gobbler.revealed => gobbler.multiple,
            _ => 0,
        }
    }

    fn total_multiplier_of(&self, holder: &Pubkey) -> u64 {
        self.gobblers
            .values()
            .filter(|gobbler| gobbler.owner == *holder && gobbler.revealed)
            .map(|gobbler| gobbler.multiple)
            .sum()
    }

    fn is_revealed(&self, gobbler_id: u64) -> bool {
        self.gobblers
            .get(&gobbler_id)
            .map(|gobbler| gobbler.revealed)
            .unwrap_or(false)
    }

    fn owner_of(&self, gobbler_id: u64) -> Option<Pubkey> {
        self.gobblers.get(&gobbler_id).map(|gobbler| gobbler.owner)
    }

    fn goo_balance_of(&self, holder: &Pubkey) -> Wad {
        self.goo.get(holder).copied().unwrap_or_default()
    }

    fn deposit_goo(&mut self, from: &Pubkey, amount: Wad) -> Result<()> {
        let from_balance = self
            .goo_balance_of(from)
            .checked_sub(amount)
            .map_err(|_| ProgramError::InsufficientFunds)?;
        let pool_balance = self.goo_balance_of(&self.pool).checked_add(amount)?;
        self.goo.insert(*from, from_balance);
        self.goo.insert(self.pool, pool_balance);
        Ok(())
    }

    fn mint_for_balance(&mut self, bid: Wad) -> Result<u64> {
        if bid < self.mint_price {
            return Err(ProgramError::InsufficientFunds.into());
        }
        let remaining = self
            .goo_balance_of(&self.pool)
            .checked_sub(self.mint_price)
            .map_err(|_| ProgramError::InsufficientFunds)?;
        self.goo.insert(self.pool, remaining);

        let pool = self.pool;
        let multiple = self.mint_multiple;
        Ok(self.mint_to(&pool, multiple))
    }

    fn mint_legendary(&mut self, gobbler_ids: &[u64]) -> Result<u64> {
        let mut burned_multiple = 0u64;
        for gobbler_id in gobbler_ids {
            let gobbler = self
                .gobblers
                .get(gobbler_id)
                .ok_or(ProgramError::InvalidArgument)?;
            if gobbler.owner != self.pool {
                return Err(ProgramError::IllegalOwner.into());
            }
            burned_multiple += gobbler.multiple;
        }
        for gobbler_id in gobbler_ids {
            self.gobblers.remove(gobbler_id);
        }

        let pool = self.pool;
        Ok(self.mint_to(&pool, burned_multiple * 2))
    }
}

/// Linear stand-in for the collection's goo curve: `last + multiple * days`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearGooOracle;

impl BalanceOracle for LinearGooOracle {
    fn compute_balance(&self, emission_multiple: u64, last_balance: Wad, time_elapsed: Wad) -> Result<Wad> {
        last_balance.checked_add(time_elapsed.checked_mul_int(emission_multiple)?)
    }
}

/// Everything a vault test needs: the pool config, its keys and a vault over the
/// in-memory collaborators.
pub struct TestPool {
    pub owner: Pubkey,
    pub tax_recipient: Pubkey,
    pub pool: Pool,
    pub vault: GobblerVault<MockArtGobbler, LinearGooOracle>,
}

impl TestPool {
    /// Pool owned by `owner`, taxing to the owner after `tax_threshold` mints.
    pub fn new(tax_threshold: u64) -> Self {
        let key = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let strategy = MaxBiddingMintStrategy::new(Pubkey::new_unique());
        let pool = Pool::new(owner, owner, strategy.key, tax_threshold);

        let vault = GobblerVault::new(key, MockArtGobbler::new(key), LinearGooOracle, Box::new(strategy));

        Self {
            owner,
            tax_recipient: owner,
            pool,
            vault,
        }
    }

    pub fn gobblers(&mut self) -> &mut MockArtGobbler {
        self.vault.custody_mut()
    }

    /// Mints a revealed Gobbler with `multiple` to `holder`.
    pub fn give(&mut self, holder: &Pubkey, multiple: u64) -> u64 {
        self.gobblers().mint_to(holder, multiple)
    }

    /// Transfers `gobbler_id` straight to the pool and runs the receive hook, undoing the
    /// transfer when the hook fails.
    pub fn safe_transfer_to_pool(&mut self, from: &Pubkey, gobbler_id: u64, now: i64) -> Result<Deposited> {
        let before = self.vault.custody().clone();
        self.gobblers().transfer_in(from, gobbler_id)?;

        let result = self.vault.on_gobbler_received(&self.pool, from, gobbler_id, now);
        if result.is_err() {
            *self.gobblers() = before;
        }
        result
    }
}
