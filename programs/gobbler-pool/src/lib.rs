pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod instructions;
pub mod interfaces;
pub mod math;
pub mod state;
pub mod strategies;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use anchor_lang::prelude::*;

pub use constants::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use interfaces::*;
pub use math::*;
pub use state::*;
pub use strategies::*;

declare_id!("3ZZL2rQGkxLMwRHGEctkBFwvPm4uYNxXNb5TRmq7qqtF");

#[program]
pub mod gobbler_pool {
    use super::*;

    pub fn initialize(
        ctx: Context<Initialize>,
        tax_recipient: Pubkey,
        mint_strategy: Pubkey,
        tax_threshold: Option<u64>,
    ) -> Result<()> {
        initialize::handler(ctx, tax_recipient, mint_strategy, tax_threshold)
    }

    pub fn change_mint_strategy(ctx: Context<ChangeMintStrategy>, new_strategy: Pubkey) -> Result<()> {
        change_mint_strategy::handler(ctx, new_strategy)
    }

    pub fn change_tax_address(ctx: Context<ChangeTaxAddress>, new_tax_address: Pubkey) -> Result<()> {
        change_tax_address::handler(ctx, new_tax_address)
    }
}
