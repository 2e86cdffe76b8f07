use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::math::Wad;

/// mGOB balances. The supply is only ever moved together with a balance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    balances: BTreeMap<Pubkey, Wad>,
    total_supply: Wad,
}

impl ShareLedger {
    pub fn total_supply(&self) -> Wad {
        self.total_supply
    }

    pub fn balance_of(&self, holder: &Pubkey) -> Wad {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    pub fn holders(&self) -> impl Iterator<Item = (&Pubkey, &Wad)> {
        self.balances.iter()
    }

    pub fn mint(&mut self, to: &Pubkey, amount: Wad) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }
        let total_supply = self.total_supply.checked_add(amount)?;
        let balance = self.balance_of(to).checked_add(amount)?;
        self.balances.insert(*to, balance);
        self.total_supply = total_supply;
        Ok(())
    }

    pub fn burn(&mut self, from: &Pubkey, amount: Wad) -> Result<()> {
        let balance = self.balance_of(from);
        require!(balance >= amount, VaultError::InsufficientShares);

        let remaining = balance.checked_sub(amount)?;
        if remaining.is_zero() {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        self.total_supply = self.total_supply.checked_sub(amount)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_tracks_balances() {
        let mut ledger = ShareLedger::default();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        ledger.mint(&alice, Wad::from_int(5)).unwrap();
        ledger.mint(&bob, Wad::from_int(2)).unwrap();
        ledger.burn(&alice, Wad::from_int(1)).unwrap();

        assert_eq!(ledger.balance_of(&alice), Wad::from_int(4));
        assert_eq!(ledger.total_supply(), Wad::from_int(6));
        let sum = ledger
            .holders()
            .fold(Wad::ZERO, |acc, (_, balance)| acc.checked_add(*balance).unwrap());
        assert_eq!(sum, ledger.total_supply());
    }

    #[test]
    fn burning_more_than_balance_fails_untouched() {
        let mut ledger = ShareLedger::default();
        let alice = Pubkey::new_unique();
        ledger.mint(&alice, Wad::ONE).unwrap();

        assert_eq!(
            ledger.burn(&alice, Wad::from_int(2)).unwrap_err(),
            VaultError::InsufficientShares.into()
        );
        assert_eq!(ledger.balance_of(&alice), Wad::ONE);
        assert_eq!(ledger.total_supply(), Wad::ONE);
    }

    #[test]
    fn empty_balances_are_pruned() {
        let mut ledger = ShareLedger::default();
        let alice = Pubkey::new_unique();
        ledger.mint(&alice, Wad::ONE).unwrap();
        ledger.burn(&alice, Wad::ONE).unwrap();
        assert_eq!(ledger.holders().count(), 0);
    }
}
