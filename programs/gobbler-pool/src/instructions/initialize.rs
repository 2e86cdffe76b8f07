use anchor_lang::prelude::*;

use crate::constants::{DEFAULT_TAX_THRESHOLD, POOL_SEED};
use crate::state::Pool;

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The pool configuration account
    #[account(
        init,
        payer = payer,
        space = Pool::LEN,
        seeds = [POOL_SEED],
        bump
    )]
    pub pool: Account<'info, Pool>,

    /// The initial pool owner
    pub owner: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<Initialize>,
    tax_recipient: Pubkey,
    mint_strategy: Pubkey,
    tax_threshold: Option<u64>,
) -> Result<()> {
    let pool = &mut ctx.accounts.pool;

    pool.set_inner(Pool::new(
        ctx.accounts.owner.key(),
        tax_recipient,
        mint_strategy,
        tax_threshold.unwrap_or(DEFAULT_TAX_THRESHOLD),
    ));
    pool.bump = ctx.bumps.pool;

    msg!("Pool initialized successfully!");
    msg!("Pool: {}", pool.key());
    msg!("Pool Owner: {}", pool.owner);
    msg!("Tax Recipient: {}", pool.tax_recipient);
    msg!("Mint Strategy: {}", pool.mint_strategy);
    msg!("Tax Threshold: {}", pool.tax_threshold);

    Ok(())
}
