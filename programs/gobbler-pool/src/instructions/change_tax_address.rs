use anchor_lang::prelude::*;

use crate::constants::POOL_SEED;
use crate::state::Pool;

#[derive(Accounts)]
pub struct ChangeTaxAddress<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Must be the pool owner
    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<ChangeTaxAddress>, new_tax_address: Pubkey) -> Result<()> {
    let caller = ctx.accounts.owner.key();
    ctx.accounts.pool.change_tax_address(&caller, new_tax_address)?;

    Ok(())
}
