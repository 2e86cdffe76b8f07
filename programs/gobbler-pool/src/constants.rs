use anchor_lang::prelude::*;

#[constant]
pub const POOL_SEED: &[u8] = b"pool";

/// 18-decimal fixed-point scale shared by shares, rates and virtual balances.
pub const WAD: u128 = 1_000_000_000_000_000_000;

/// Deposit tax rate, 5 / 1000 = 0.5%.
pub const DEPOSIT_TAX_NUMERATOR: u128 = 5;
pub const DEPOSIT_TAX_DENOMINATOR: u128 = 1_000;

/// Tax applies once more than this many Gobblers were minted by the pool.
pub const DEFAULT_TAX_THRESHOLD: u64 = 2;

pub const SECONDS_PER_DAY: u128 = 86_400;
