use anchor_lang::prelude::*;

use crate::interfaces::GobblerCustody;
use crate::math::Wad;

/// How the pool bids for new Gobblers and which Gobblers it burns for a legendary.
pub trait MintStrategy {
    /// Key recorded in `Pool::mint_strategy` for this strategy.
    fn key(&self) -> Pubkey;

    /// Virtual balance to bid on the next mint.
    fn gobbler_mint_strategy(&self, custody: &dyn GobblerCustody, pool: &Pubkey) -> Result<Wad>;

    /// Validates `gobbler_ids` and returns the ones to burn. Fails with
    /// `VaultError::UnrevealedGobbler` on any unrevealed id.
    fn legendary_gobbler_mint_strategy(
        &self,
        custody: &dyn GobblerCustody,
        gobbler_ids: &[u64],
    ) -> Result<Vec<u64>>;
}
