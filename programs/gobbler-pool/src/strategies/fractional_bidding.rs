use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::interfaces::{GobblerCustody, MintStrategy};
use crate::math::Wad;
use crate::strategies::require_revealed;

/// Bids a fixed fraction of the pool's virtual balance, keeping the rest compounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FractionalBiddingMintStrategy {
    pub key: Pubkey,
    pub numerator: u64,
    pub denominator: u64,
}

impl FractionalBiddingMintStrategy {
    pub fn new(key: Pubkey, numerator: u64, denominator: u64) -> Result<Self> {
        require!(denominator > 0, VaultError::InvalidStrategyConfig);
        require!(numerator <= denominator, VaultError::InvalidStrategyConfig);
        Ok(Self {
            key,
            numerator,
            denominator,
        })
    }
}

impl MintStrategy for FractionalBiddingMintStrategy {
    fn key(&self) -> Pubkey {
        self.key
    }

    fn gobbler_mint_strategy(&self, custody: &dyn GobblerCustody, pool: &Pubkey) -> Result<Wad> {
        custody
            .goo_balance_of(pool)
            .checked_mul_ratio(self.numerator as u128, self.denominator as u128)
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
    use crate::testing::MockArtGobbler;

    #[test]
    fn bids_a_fraction_of_the_balance() {
        let pool = Pubkey::new_unique();
        let mut gobblers = MockArtGobbler::new(pool);
        gobblers.set_goo_balance(&pool, Wad::from_int(10));

        let strategy = FractionalBiddingMintStrategy::new(Pubkey::new_unique(), 1, 4).unwrap();
        assert_eq!(
            strategy.gobbler_mint_strategy(&gobblers, &pool).unwrap(),
            Wad::from_raw(2_500_000_000_000_000_000)
        );
    }

    #[test]
    fn rejects_fractions_above_one() {
        let key = Pubkey::new_unique();
        assert_eq!(
            FractionalBiddingMintStrategy::new(key, 3, 2).unwrap_err(),
            VaultError::InvalidStrategyConfig.into()
        );
        assert!(FractionalBiddingMintStrategy::new(key, 0, 0).is_err());
    }

    #[test]
    fn legendary_selection_requires_ids() {
        let pool = Pubkey::new_unique();
        let gobblers = MockArtGobbler::new(pool);
        let strategy = FractionalBiddingMintStrategy::new(Pubkey::new_unique(), 1, 2).unwrap();
        assert_eq!(
            strategy.legendary_gobbler_mint_strategy(&gobblers, &[]).unwrap_err(),
            VaultError::EmptyLegendarySelection.into()
        );
    }
}
