use anchor_lang::prelude::*;

use crate::math::Wad;

/// The Gobbler collection as seen by the pool.
///
/// Implementations move tokens and virtual balance on behalf of the pool. Multipliers
/// are read through on every call: the pool never caches them.
pub trait GobblerCustody {
    /// Moves `gobbler_id` from `from` into the pool.
    fn transfer_in(&mut self, from: &Pubkey, gobbler_id: u64) -> Result<()>;

    /// Releases `gobbler_id` from the pool to `to`.
    fn transfer_out(&mut self, gobbler_id: u64, to: &Pubkey) -> Result<()>;

    /// Emission multiple of a single Gobbler, zero until revealed.
    fn multiplier_of(&self, gobbler_id: u64) -> u64;

    /// Sum of the emission multiples of every Gobbler `holder` owns.
    fn total_multiplier_of(&self, holder: &Pubkey) -> u64;

    fn is_revealed(&self, gobbler_id: u64) -> bool;

    /// Current holder of `gobbler_id`, `None` once burned or if it never existed.
    fn owner_of(&self, gobbler_id: u64) -> Option<Pubkey>;

    /// Virtual (goo) balance of `holder`.
    fn goo_balance_of(&self, holder: &Pubkey) -> Wad;

    /// Pulls `amount` of goo from `from` into the pool's virtual balance.
    fn deposit_goo(&mut self, from: &Pubkey, amount: Wad) -> Result<()>;

    /// Mints a Gobbler to the pool paying at most `bid` from its virtual balance.
    fn mint_for_balance(&mut self, bid: Wad) -> Result<u64>;

    /// Burns `gobbler_ids` out of the pool and mints a legendary Gobbler to it.
    fn mint_legendary(&mut self, gobbler_ids: &[u64]) -> Result<u64>;
}
