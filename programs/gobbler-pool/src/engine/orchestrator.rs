use anchor_lang::prelude::*;

use crate::engine::{MintCheckpoint, VaultState};
use crate::error::VaultError;
use crate::events::{GobblerMinted, LegendaryGobblerMinted};
use crate::interfaces::{GobblerCustody, MintStrategy};

/// Append-only record of the Gobblers the pool minted from goo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintedIndex {
    gobbler_ids: Vec<u64>,
}

impl MintedIndex {
    pub fn total_minted(&self) -> u64 {
        self.gobbler_ids.len() as u64
    }

    pub fn minted_gobbler_id(&self, index: u64) -> Option<u64> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.gobbler_ids.get(index).copied())
    }

    pub fn push(&mut self, gobbler_id: u64) -> u64 {
        self.gobbler_ids.push(gobbler_id);
        self.total_minted() - 1
    }
}

pub fn mint_gobbler<C: GobblerCustody>(
    state: &mut VaultState,
    custody: &mut C,
    strategy: &dyn MintStrategy,
    pool_key: &Pubkey,
    now: i64,
) -> Result<GobblerMinted> {
    let bid = strategy.gobbler_mint_strategy(&*custody, pool_key)?;
    let gobbler_id = custody.mint_for_balance(bid)?;

    let index = state.minted.push(gobbler_id);
    let window = state.windows.advance_window()?;
    state.checkpoint = MintCheckpoint {
        timestamp: now,
        emission_multiple: custody.total_multiplier_of(pool_key),
    };

    let event = GobblerMinted {
        gobbler_id,
        window,
        bid,
    };

    msg!("Gobbler minted!");
    msg!("Gobbler id: {} (mint #{})", gobbler_id, index);
    msg!("Bid: {}", bid);
    msg!("Current window: {}", window);
    emit!(event.clone());

    Ok(event)
}

/// Burns a strategy-selected basket for a legendary. Share supply is untouched, so the
/// extra multiple accrues to every current holder.
pub fn mint_legendary_gobbler<C: GobblerCustody>(
    state: &VaultState,
    custody: &mut C,
    strategy: &dyn MintStrategy,
    gobbler_ids: &[u64],
) -> Result<LegendaryGobblerMinted> {
    let burned = strategy.legendary_gobbler_mint_strategy(&*custody, gobbler_ids)?;
    require!(!burned.is_empty(), VaultError::EmptyLegendarySelection);
    for gobbler_id in &burned {
        require!(!state.windows.is_pending(*gobbler_id), VaultError::GobblerLagPending);
    }

    let gobbler_id = custody.mint_legendary(&burned)?;

    let event = LegendaryGobblerMinted { gobbler_id, burned };

    msg!("Legendary Gobbler minted!");
    msg!("Gobbler id: {}", gobbler_id);
    msg!("Burned: {:?}", event.burned);
    emit!(event.clone());

    Ok(event)
}
