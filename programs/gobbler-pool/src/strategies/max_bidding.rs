use anchor_lang::prelude::*;

use crate::interfaces::{GobblerCustody, MintStrategy};
use crate::math::Wad;
use crate::strategies::require_revealed;

/// Bids the pool's whole virtual balance on every mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxBiddingMintStrategy {
    pub key: Pubkey,
}

impl MaxBiddingMintStrategy {
    pub fn new(key: Pubkey) -> Self {
        Self { key }
    }
}

impl MintStrategy for MaxBiddingMintStrategy {
    fn key(&self) -> Pubkey {
        self.key
    }

    fn gobbler_mint_strategy(&self, custody: &dyn GobblerCustody, pool: &Pubkey) -> Result<Wad> {
        Ok(custody.goo_balance_of(pool))
    }

    fn legendary_gobbler_mint_strategy(
        &self,
        custody: &dyn GobblerCustody,
        gobbler_ids: &[u64],
    ) -> Result<Vec<u64>> {
        require_revealed(custody, gobbler_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VaultError;
    use crate::testing::MockArtGobbler;

    #[test]
    fn bids_the_pool_goo_balance() {
        let pool = Pubkey::new_unique();
        let mut gobblers = MockArtGobbler::new(pool);
        let strategy = MaxBiddingMintStrategy::new(Pubkey::new_unique());

        assert_eq!(strategy.gobbler_mint_strategy(&gobblers, &pool).unwrap(), Wad::ZERO);
        gobblers.set_goo_balance(&pool, Wad::ONE);
        assert_eq!(strategy.gobbler_mint_strategy(&gobblers, &pool).unwrap(), Wad::ONE);
    }

    #[test]
    fn legendary_selection_rejects_unrevealed() {
        let pool = Pubkey::new_unique();
        let mut gobblers = MockArtGobbler::new(pool);
        let id = gobblers.mint_to(&pool, 5);
        let strategy = MaxBiddingMintStrategy::new(Pubkey::new_unique());

        assert_eq!(strategy.legendary_gobbler_mint_strategy(&gobblers, &[id]).unwrap(), vec![id]);

        gobblers.unreveal(id);
        assert_eq!(
            strategy.legendary_gobbler_mint_strategy(&gobblers, &[id]).unwrap_err(),
            VaultError::UnrevealedGobbler.into()
        );
    }
}
