pub mod fractional_bidding;
pub mod max_bidding;

pub use fractional_bidding::*;
pub use max_bidding::*;

use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::interfaces::GobblerCustody;

/// Every Gobbler burned for a legendary must have a known multiple.
pub(crate) fn require_revealed(custody: &dyn GobblerCustody, gobbler_ids: &[u64]) -> Result<Vec<u64>> {
    require!(!gobbler_ids.is_empty(), VaultError::EmptyLegendarySelection);
    for &gobbler_id in gobbler_ids {
        require!(custody.is_revealed(gobbler_id), VaultError::UnrevealedGobbler);
    }
    Ok(gobbler_ids.to_vec())
}
