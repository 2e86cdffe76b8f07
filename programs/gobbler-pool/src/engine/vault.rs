use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::engine::{
    conversion_rate, goo_deposit, issue_shares, orchestrator, shares_for, LagEntry, MintCheckpoint,
    MintedIndex, ShareLedger, WindowLedger,
};
use crate::error::VaultError;
use crate::events::{
    Deposited, GobblerMinted, LaggedClaimed, LaggedDeposited, LaggedWithdrawn, LegendaryGobblerMinted,
    MintStrategyChanged, TaxAddressChanged, Withdrawn,
};
use crate::interfaces::{BalanceOracle, GobblerCustody, MintStrategy};
use crate::math::Wad;
use crate::state::Pool;

/// Ledgers owned by the vault. Operations run against a copy that is only kept when
/// the whole operation succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaultState {
    pub shares: ShareLedger,
    pub windows: WindowLedger,
    pub minted: MintedIndex,
    pub checkpoint: MintCheckpoint,
    /// Gobblers in custody that the ledgers account for
    pub held: BTreeSet<u64>,
}

struct Env<'a, C, O> {
    key: &'a Pubkey,
    custody: &'a mut C,
    oracle: &'a O,
    strategy: &'a dyn MintStrategy,
}

impl<C: GobblerCustody, O: BalanceOracle> Env<'_, C, O> {
    fn rate(&self, shares: &ShareLedger, excluded_multiple: u64) -> Result<Wad> {
        conversion_rate(
            shares.total_supply(),
            self.custody.total_multiplier_of(self.key),
            excluded_multiple,
        )
    }

    fn revealed_multiple(&self, gobbler_id: u64) -> Result<u64> {
        require!(self.custody.is_revealed(gobbler_id), VaultError::UnrevealedGobbler);
        Ok(self.custody.multiplier_of(gobbler_id))
    }

    /// Issues the shares for a Gobbler already in custody and collects its goo deposit.
    fn credit_deposit(
        &mut self,
        state: &mut VaultState,
        pool: &Pool,
        depositor: &Pubkey,
        gobbler_id: u64,
        rate: Wad,
        now: i64,
    ) -> Result<Deposited> {
        let multiple = self.custody.multiplier_of(gobbler_id);
        let shares = shares_for(multiple, rate)?;
        let total_minted = state.minted.total_minted();
        let goo = goo_deposit(self.oracle, &state.checkpoint, total_minted, multiple, now)?;
        let (net, tax) = issue_shares(&mut state.shares, pool, depositor, shares, total_minted)?;

        if !goo.is_zero() {
            self.custody.deposit_goo(depositor, goo)?;
        }
        state.held.insert(gobbler_id);

        msg!("Deposit successful!");
        msg!("Gobbler {} with multiple {}", gobbler_id, multiple);
        msg!("Minted: {} shares (tax {})", net, tax);
        msg!("Goo deposit: {}", goo);
        msg!("Total shares supply: {}", state.shares.total_supply());

        let event = Deposited {
            depositor: *depositor,
            gobbler_id,
            multiple,
            shares: net,
            tax,
            goo_deposit: goo,
        };
        emit!(event.clone());
        Ok(event)
    }
}

/// The mGOB pool: Gobbler custody in, fungible shares out.
///
/// Configuration is not stored here. Every operation that depends on it borrows the
/// `Pool` account, so the on-chain config stays the only copy.
pub struct GobblerVault<C, O> {
    key: Pubkey,
    state: VaultState,
    custody: C,
    oracle: O,
    strategy: Box<dyn MintStrategy>,
}

impl<C: GobblerCustody + Clone, O: BalanceOracle> GobblerVault<C, O> {
    pub fn new(key: Pubkey, custody: C, oracle: O, strategy: Box<dyn MintStrategy>) -> Self {
        Self {
            key,
            state: VaultState::default(),
            custody,
            oracle,
            strategy,
        }
    }

    /// Runs `op` against staged copies of the ledgers and the collection; both are
    /// kept only if it succeeds.
    fn commit<T>(&mut self, op: impl FnOnce(&mut VaultState, Env<'_, C, O>) -> Result<T>) -> Result<T> {
        let mut staged = self.state.clone();
        let mut custody = self.custody.clone();
        let env = Env {
            key: &self.key,
            custody: &mut custody,
            oracle: &self.oracle,
            strategy: self.strategy.as_ref(),
        };
        let out = op(&mut staged, env)?;
        self.state = staged;
        self.custody = custody;
        Ok(out)
    }

    fn require_strategy(&self, pool: &Pool) -> Result<()> {
        require_keys_eq!(self.strategy.key(), pool.mint_strategy, VaultError::StrategyMismatch);
        Ok(())
    }

    pub fn key(&self) -> &Pubkey {
        &self.key
    }

    pub fn state(&self) -> &VaultState {
        &self.state
    }

    pub fn custody(&self) -> &C {
        &self.custody
    }

    /// Direct access to the collection, for driving reveals and balances externally.
    pub fn custody_mut(&mut self) -> &mut C {
        &mut self.custody
    }

    pub fn mint_strategy(&self) -> &dyn MintStrategy {
        self.strategy.as_ref()
    }

    pub fn conversion_rate(&self) -> Result<Wad> {
        conversion_rate(
            self.state.shares.total_supply(),
            self.custody.total_multiplier_of(&self.key),
            self.state.windows.total_lagged_multiple(),
        )
    }

    /// Goo a depositor of `multiple` has to pay in at `now`.
    pub fn goo_deposit(&self, multiple: u64, now: i64) -> Result<Wad> {
        goo_deposit(
            &self.oracle,
            &self.state.checkpoint,
            self.state.minted.total_minted(),
            multiple,
            now,
        )
    }

    pub fn balance_of(&self, holder: &Pubkey) -> Wad {
        self.state.shares.balance_of(holder)
    }

    pub fn total_supply(&self) -> Wad {
        self.state.shares.total_supply()
    }

    pub fn total_minted(&self) -> u64 {
        self.state.minted.total_minted()
    }

    pub fn minted_gobbler_id(&self, index: u64) -> Option<u64> {
        self.state.minted.minted_gobbler_id(index)
    }

    pub fn current_window(&self) -> u64 {
        self.state.windows.current_window()
    }

    pub fn lagging_deposit(&self, depositor: &Pubkey, window: u64) -> u64 {
        self.state.windows.lagging_deposit(depositor, window)
    }

    pub fn lag_entry(&self, depositor: &Pubkey, window: u64) -> LagEntry {
        self.state.windows.entry(depositor, window)
    }

    pub fn total_lagged_multiple(&self) -> u64 {
        self.state.windows.total_lagged_multiple()
    }

    /// Deposits a revealed Gobbler priced at the pool state just before it arrives.
    pub fn deposit(&mut self, pool: &Pool, depositor: &Pubkey, gobbler_id: u64, now: i64) -> Result<Deposited> {
        self.commit(|state, mut env| {
            env.revealed_multiple(gobbler_id)?;
            let rate = env.rate(&state.shares, state.windows.total_lagged_multiple())?;

            env.custody.transfer_in(depositor, gobbler_id)?;
            env.credit_deposit(state, pool, depositor, gobbler_id, rate, now)
        })
    }

    /// Credits a Gobbler that `from` already transferred to the pool. Priced and taxed
    /// like `deposit`, with the arrived multiple left out of the rate.
    pub fn on_gobbler_received(
        &mut self,
        pool: &Pool,
        from: &Pubkey,
        gobbler_id: u64,
        now: i64,
    ) -> Result<Deposited> {
        self.commit(|state, mut env| {
            require!(
                env.custody.owner_of(gobbler_id) == Some(*env.key) && !state.held.contains(&gobbler_id),
                VaultError::GobblerNotReceived
            );
            let multiple = env.revealed_multiple(gobbler_id)?;
            let excluded = state
                .windows
                .total_lagged_multiple()
                .checked_add(multiple)
                .ok_or(VaultError::MathOverflow)?;
            let rate = env.rate(&state.shares, excluded)?;

            env.credit_deposit(state, pool, from, gobbler_id, rate, now)
        })
    }

    pub fn withdraw(&mut self, owner: &Pubkey, gobbler_id: u64) -> Result<Withdrawn> {
        self.commit(|state, mut env| {
            let multiple = env.revealed_multiple(gobbler_id)?;
            require!(!state.windows.is_pending(gobbler_id), VaultError::GobblerLagPending);

            let rate = env.rate(&state.shares, state.windows.total_lagged_multiple())?;
            let shares = shares_for(multiple, rate)?;
            state.shares.burn(owner, shares)?;
            env.custody.transfer_out(gobbler_id, owner)?;
            state.held.remove(&gobbler_id);

            msg!("Withdraw successful!");
            msg!("Gobbler {} with multiple {}", gobbler_id, multiple);
            msg!("Shares burned: {}", shares);
            msg!("Remaining shares supply: {}", state.shares.total_supply());

            let event = Withdrawn {
                owner: *owner,
                gobbler_id,
                multiple,
                shares_burned: shares,
            };
            emit!(event.clone());
            Ok(event)
        })
    }

    /// Parks a Gobbler until the current mint window closes; no shares yet and no goo
    /// deposit owed.
    pub fn deposit_with_lag(&mut self, depositor: &Pubkey, gobbler_id: u64) -> Result<LaggedDeposited> {
        self.commit(|state, mut env| {
            require!(state.windows.current_window() > 0, VaultError::TotalMintedIsZero);
            let multiple = env.revealed_multiple(gobbler_id)?;

            let window = state.windows.record(depositor, gobbler_id, multiple)?;
            env.custody.transfer_in(depositor, gobbler_id)?;
            state.held.insert(gobbler_id);

            msg!("Lagged deposit successful!");
            msg!("Gobbler {} with multiple {} in window {}", gobbler_id, multiple, window);
            msg!("Total lagged multiple: {}", state.windows.total_lagged_multiple());

            let event = LaggedDeposited {
                depositor: *depositor,
                gobbler_id,
                multiple,
                window,
            };
            emit!(event.clone());
            Ok(event)
        })
    }

    pub fn withdraw_lagged(&mut self, depositor: &Pubkey, gobbler_id: u64) -> Result<LaggedWithdrawn> {
        self.commit(|state, mut env| {
            env.revealed_multiple(gobbler_id)?;

            let receipt = state.windows.cancel(depositor, gobbler_id)?;
            env.custody.transfer_out(gobbler_id, depositor)?;
            state.held.remove(&gobbler_id);

            msg!("Lagged withdraw successful!");
            msg!("Gobbler {} left window {}", gobbler_id, receipt.window);
            msg!("Total lagged multiple: {}", state.windows.total_lagged_multiple());

            let event = LaggedWithdrawn {
                depositor: *depositor,
                gobbler_id,
                multiple: receipt.multiple,
                window: receipt.window,
            };
            emit!(event.clone());
            Ok(event)
        })
    }

    /// Settles closed windows at the current rate. Any failing window aborts the call.
    pub fn claim_lagged(&mut self, pool: &Pool, depositor: &Pubkey, windows: &[u64]) -> Result<Vec<LaggedClaimed>> {
        self.commit(|state, env| {
            let total_minted = state.minted.total_minted();
            let mut claimed = Vec::with_capacity(windows.len());

            for &window in windows {
                let lagged_before = state.windows.total_lagged_multiple();
                let multiple = state.windows.settle(depositor, window)?;

                let rate = env.rate(&state.shares, lagged_before)?;
                let shares = shares_for(multiple, rate)?;
                let (net, tax) = issue_shares(&mut state.shares, pool, depositor, shares, total_minted)?;

                msg!("Lagged claim successful!");
                msg!("Window {}: multiple {}", window, multiple);
                msg!("Minted: {} shares (tax {})", net, tax);

                claimed.push(LaggedClaimed {
                    depositor: *depositor,
                    window,
                    multiple,
                    shares: net,
                    tax,
                });
            }

            msg!("Total shares supply: {}", state.shares.total_supply());
            msg!("Total lagged multiple: {}", state.windows.total_lagged_multiple());
            for event in &claimed {
                emit!(event.clone());
            }
            Ok(claimed)
        })
    }

    pub fn mint_gobbler(&mut self, pool: &Pool, now: i64) -> Result<GobblerMinted> {
        self.require_strategy(pool)?;
        self.commit(|state, mut env| {
            let event = orchestrator::mint_gobbler(state, env.custody, env.strategy, env.key, now)?;
            state.held.insert(event.gobbler_id);
            Ok(event)
        })
    }

    pub fn mint_legendary_gobbler(&mut self, pool: &Pool, gobbler_ids: &[u64]) -> Result<LegendaryGobblerMinted> {
        self.require_strategy(pool)?;
        self.commit(|state, mut env| {
            let event = orchestrator::mint_legendary_gobbler(state, env.custody, env.strategy, gobbler_ids)?;
            for gobbler_id in &event.burned {
                state.held.remove(gobbler_id);
            }
            state.held.insert(event.gobbler_id);
            Ok(event)
        })
    }

    /// Changes the configured strategy on `pool` and swaps in the matching implementation.
    pub fn change_mint_strategy(
        &mut self,
        pool: &mut Pool,
        caller: &Pubkey,
        new_strategy: Box<dyn MintStrategy>,
    ) -> Result<MintStrategyChanged> {
        let event = pool.change_mint_strategy(caller, new_strategy.key())?;
        self.strategy = new_strategy;
        Ok(event)
    }

    /// Adopts the implementation of a strategy already configured on `pool`, e.g. after
    /// the `change_mint_strategy` instruction ran.
    pub fn set_mint_strategy(&mut self, pool: &Pool, strategy: Box<dyn MintStrategy>) -> Result<()> {
        require_keys_eq!(strategy.key(), pool.mint_strategy, VaultError::StrategyMismatch);
        self.strategy = strategy;
        Ok(())
    }

    pub fn change_tax_address(
        &mut self,
        pool: &mut Pool,
        caller: &Pubkey,
        new_tax_address: Pubkey,
    ) -> Result<TaxAddressChanged> {
        pool.change_tax_address(caller, new_tax_address)
    }
}
