use anchor_lang::prelude::*;

use crate::math::Wad;

/// Virtual balance growth curve of the Gobbler collection.
///
/// Must be pure and monotonically non-decreasing in every argument. `time_elapsed` is
/// a wad number of days.
pub trait BalanceOracle {
    fn compute_balance(&self, emission_multiple: u64, last_balance: Wad, time_elapsed: Wad) -> Result<Wad>;
}
