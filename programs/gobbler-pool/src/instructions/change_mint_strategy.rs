use anchor_lang::prelude::*;

use crate::constants::POOL_SEED;
use crate::state::Pool;

#[derive(Accounts)]
pub struct ChangeMintStrategy<'info> {
    #[account(
        mut,
        seeds = [POOL_SEED],
        bump = pool.bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Must be the pool owner
    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<ChangeMintStrategy>, new_strategy: Pubkey) -> Result<()> {
    let caller = ctx.accounts.owner.key();
    ctx.accounts.pool.change_mint_strategy(&caller, new_strategy)?;

    Ok(())
}
