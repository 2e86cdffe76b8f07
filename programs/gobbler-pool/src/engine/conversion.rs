use anchor_lang::prelude::*;

use crate::engine::ShareLedger;
use crate::error::VaultError;
use crate::interfaces::BalanceOracle;
use crate::math::{seconds_to_wad_days, Wad};
use crate::state::Pool;

/// Pool state captured by the last `mint_gobbler`, the baseline for goo deposits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MintCheckpoint {
    pub timestamp: i64,
    pub emission_multiple: u64,
}

/// Shares per unit of multiple.
///
/// Lagged multiple is left out of the denominator: it has not bought shares yet.
pub fn conversion_rate(total_shares: Wad, total_multiple: u64, lagged_multiple: u64) -> Result<Wad> {
    if total_shares.is_zero() {
        return Ok(Wad::ONE);
    }
    let backing = total_multiple
        .checked_sub(lagged_multiple)
        .ok_or(VaultError::MathOverflow)?;
    require!(backing > 0, VaultError::ZeroBackingMultiple);
    total_shares.checked_div_int(backing)
}

pub fn shares_for(multiple: u64, rate: Wad) -> Result<Wad> {
    rate.checked_mul_int(multiple)
}

/// Mints `shares` for `recipient`, diverting the deposit tax when it is active.
/// Returns `(net, tax)`.
pub fn issue_shares(
    ledger: &mut ShareLedger,
    pool: &Pool,
    recipient: &Pubkey,
    shares: Wad,
    total_minted: u64,
) -> Result<(Wad, Wad)> {
    let (net, tax) = pool.split_deposit_tax(shares, total_minted)?;
    ledger.mint(recipient, net)?;
    ledger.mint(&pool.tax_recipient, tax)?;
    Ok((net, tax))
}

/// Goo the pool would have earned since the last mint had `multiple` been in it.
pub fn goo_deposit<O: BalanceOracle + ?Sized>(
    oracle: &O,
    checkpoint: &MintCheckpoint,
    total_minted: u64,
    multiple: u64,
    now: i64,
) -> Result<Wad> {
    if total_minted == 0 {
        return Ok(Wad::ZERO);
    }
    let elapsed = now.saturating_sub(checkpoint.timestamp).max(0) as u64;
    let time_elapsed = seconds_to_wad_days(elapsed)?;

    let last = checkpoint.emission_multiple;
    let with_deposit = last.checked_add(multiple).ok_or(VaultError::MathOverflow)?;
    let initial = oracle.compute_balance(last, Wad::ZERO, time_elapsed)?;
    let last_with_deposit = oracle.compute_balance(with_deposit, Wad::ZERO, time_elapsed)?;

    Ok(last_with_deposit.saturating_sub(initial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LinearGooOracle;

    #[test]
    fn fresh_pool_rate_is_one() {
        assert_eq!(conversion_rate(Wad::ZERO, 0, 0).unwrap(), Wad::ONE);
        assert_eq!(conversion_rate(Wad::ZERO, 40, 5).unwrap(), Wad::ONE);
    }

    #[test]
    fn rate_halves_when_multiple_doubles() {
        assert_eq!(conversion_rate(Wad::from_int(5), 5, 0).unwrap(), Wad::ONE);
        assert_eq!(
            conversion_rate(Wad::from_int(5), 10, 0).unwrap(),
            Wad::from_raw(500_000_000_000_000_000)
        );
    }

    #[test]
    fn lagged_multiple_does_not_dilute() {
        let before = conversion_rate(Wad::from_int(5), 10, 0).unwrap();
        let after = conversion_rate(Wad::from_int(5), 15, 5).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn outstanding_shares_without_backing_fail() {
        assert_eq!(
            conversion_rate(Wad::from_int(5), 5, 5).unwrap_err(),
            VaultError::ZeroBackingMultiple.into()
        );
        assert_eq!(
            conversion_rate(Wad::from_int(5), 5, 6).unwrap_err(),
            VaultError::MathOverflow.into()
        );
    }

    #[test]
    fn tax_goes_to_the_recipient() {
        let owner = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let depositor = Pubkey::new_unique();
        let pool = Pool::new(owner, recipient, Pubkey::new_unique(), 2);
        let mut ledger = ShareLedger::default();

        let (net, tax) = issue_shares(&mut ledger, &pool, &depositor, Wad::from_int(5), 3).unwrap();
        assert_eq!(ledger.balance_of(&depositor), net);
        assert_eq!(ledger.balance_of(&recipient), tax);
        assert_eq!(ledger.total_supply(), Wad::from_int(5));
    }

    #[test]
    fn tax_to_the_null_address_still_counts_in_supply() {
        let owner = Pubkey::new_unique();
        let depositor = Pubkey::new_unique();
        let pool = Pool::new(owner, Pubkey::default(), Pubkey::new_unique(), 0);
        let mut ledger = ShareLedger::default();

        issue_shares(&mut ledger, &pool, &depositor, Wad::from_int(5), 1).unwrap();
        assert_eq!(
            ledger.balance_of(&Pubkey::default()),
            Wad::from_raw(25_000_000_000_000_000)
        );
        assert_eq!(ledger.total_supply(), Wad::from_int(5));
    }

    #[test]
    fn no_goo_deposit_before_first_mint() {
        let checkpoint = MintCheckpoint::default();
        assert_eq!(
            goo_deposit(&LinearGooOracle, &checkpoint, 0, 5, 1_000).unwrap(),
            Wad::ZERO
        );
    }

    #[test]
    fn goo_deposit_is_the_marginal_growth_since_last_mint() {
        let checkpoint = MintCheckpoint {
            timestamp: 100,
            emission_multiple: 10,
        };
        // same instant as the mint
        assert_eq!(goo_deposit(&LinearGooOracle, &checkpoint, 1, 5, 100).unwrap(), Wad::ZERO);

        let day_later = goo_deposit(&LinearGooOracle, &checkpoint, 1, 5, 100 + 86_400).unwrap();
        assert_eq!(day_later, Wad::from_int(5));

        // clocks never run backwards into a negative elapsed time
        assert_eq!(goo_deposit(&LinearGooOracle, &checkpoint, 1, 5, 50).unwrap(), Wad::ZERO);
    }
}
