use anchor_lang::prelude::*;

use crate::constants::{DEPOSIT_TAX_DENOMINATOR, DEPOSIT_TAX_NUMERATOR};
use crate::error::VaultError;
use crate::events::{MintStrategyChanged, TaxAddressChanged};
use crate::math::Wad;

#[account]
#[derive(Debug, Default, PartialEq, Eq, InitSpace)]
pub struct Pool {
    /// The pool owner who can change the strategy and the tax recipient
    pub owner: Pubkey,
    /// Receives the deposit tax; the default key burns it
    pub tax_recipient: Pubkey,
    /// Identity of the mint strategy the pool bids with
    pub mint_strategy: Pubkey,
    /// Deposit tax applies once the pool minted more Gobblers than this
    pub tax_threshold: u64,
    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Pool {
    pub const LEN: usize = 8 + Pool::INIT_SPACE;

    pub fn new(owner: Pubkey, tax_recipient: Pubkey, mint_strategy: Pubkey, tax_threshold: u64) -> Self {
        Self {
            owner,
            tax_recipient,
            mint_strategy,
            tax_threshold,
            bump: 0,
        }
    }

    pub fn tax_active(&self, total_minted: u64) -> bool {
        total_minted > self.tax_threshold
    }

    /// Splits freshly issued shares into `(net, tax)`.
    pub fn split_deposit_tax(&self, shares: Wad, total_minted: u64) -> Result<(Wad, Wad)> {
        if !self.tax_active(total_minted) {
            return Ok((shares, Wad::ZERO));
        }
        let tax = shares.checked_mul_ratio(DEPOSIT_TAX_NUMERATOR, DEPOSIT_TAX_DENOMINATOR)?;
        Ok((shares.checked_sub(tax)?, tax))
    }

    pub fn change_mint_strategy(&mut self, caller: &Pubkey, new_strategy: Pubkey) -> Result<MintStrategyChanged> {
        require_keys_eq!(*caller, self.owner, VaultError::Unauthorized);

        let event = MintStrategyChanged {
            old_strategy: self.mint_strategy,
            new_strategy,
        };
        self.mint_strategy = new_strategy;

        msg!("Mint strategy changed!");
        msg!("Previous strategy: {}", event.old_strategy);
        msg!("New strategy: {}", event.new_strategy);
        emit!(event.clone());

        Ok(event)
    }

    pub fn change_tax_address(&mut self, caller: &Pubkey, new_tax_address: Pubkey) -> Result<TaxAddressChanged> {
        require_keys_eq!(*caller, self.owner, VaultError::Unauthorized);

        let event = TaxAddressChanged {
            old_tax_address: self.tax_recipient,
            new_tax_address,
        };
        self.tax_recipient = new_tax_address;

        msg!("Tax address changed!");
        msg!("Previous tax address: {}", event.old_tax_address);
        msg!("New tax address: {}", event.new_tax_address);
        emit!(event.clone());

        Ok(event)
    }
}
