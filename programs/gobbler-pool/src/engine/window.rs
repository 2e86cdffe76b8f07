use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::VaultError;

/// Settlement state of one (depositor, window) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LagEntry {
    #[default]
    Empty,
    Pending {
        /// Sum of the multiples lagged into this window
        multiple: u64,
        gobbler_ids: Vec<u64>,
    },
}

impl LagEntry {
    pub fn multiple(&self) -> u64 {
        match self {
            LagEntry::Empty => 0,
            LagEntry::Pending { multiple, .. } => *multiple,
        }
    }
}

/// Ties a lagged Gobbler to the entry holding its multiple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LagReceipt {
    pub depositor: Pubkey,
    pub window: u64,
    pub multiple: u64,
}

/// Mint-window counter plus the deposits waiting for their window to close.
///
/// The current window is the number of completed mints. A deposit lagged while the
/// counter reads `w` is kept under `w`; it can be cancelled while the counter still
/// reads `w` and claimed once it moved past it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowLedger {
    current_window: u64,
    entries: BTreeMap<(Pubkey, u64), LagEntry>,
    receipts: BTreeMap<u64, LagReceipt>,
    total_lagged_multiple: u64,
}

impl WindowLedger {
    pub fn current_window(&self) -> u64 {
        self.current_window
    }

    pub fn total_lagged_multiple(&self) -> u64 {
        self.total_lagged_multiple
    }

    pub fn entry(&self, depositor: &Pubkey, window: u64) -> LagEntry {
        self.entries
            .get(&(*depositor, window))
            .cloned()
            .unwrap_or_default()
    }

    pub fn lagging_deposit(&self, depositor: &Pubkey, window: u64) -> u64 {
        self.entries
            .get(&(*depositor, window))
            .map(LagEntry::multiple)
            .unwrap_or(0)
    }

    pub fn receipt(&self, gobbler_id: u64) -> Option<&LagReceipt> {
        self.receipts.get(&gobbler_id)
    }

    pub fn is_pending(&self, gobbler_id: u64) -> bool {
        self.receipts.contains_key(&gobbler_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&(Pubkey, u64), &LagEntry)> {
        self.entries.iter()
    }

    pub fn advance_window(&mut self) -> Result<u64> {
        self.current_window = self
            .current_window
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        Ok(self.current_window)
    }

    /// Adds `multiple` to the depositor's entry for the current window.
    pub fn record(&mut self, depositor: &Pubkey, gobbler_id: u64, multiple: u64) -> Result<u64> {
        require!(self.current_window > 0, VaultError::TotalMintedIsZero);
        require!(!self.is_pending(gobbler_id), VaultError::GobblerLagPending);

        let window = self.current_window;
        let total = self
            .total_lagged_multiple
            .checked_add(multiple)
            .ok_or(VaultError::MathOverflow)?;

        let key = (*depositor, window);
        let updated = match self.entries.get(&key) {
            Some(LagEntry::Pending {
                multiple: pending,
                gobbler_ids,
            }) => {
                let mut gobbler_ids = gobbler_ids.clone();
                gobbler_ids.push(gobbler_id);
                LagEntry::Pending {
                    multiple: pending.checked_add(multiple).ok_or(VaultError::MathOverflow)?,
                    gobbler_ids,
                }
            }
            _ => LagEntry::Pending {
                multiple,
                gobbler_ids: vec![gobbler_id],
            },
        };

        self.entries.insert(key, updated);
        self.receipts.insert(
            gobbler_id,
            LagReceipt {
                depositor: *depositor,
                window,
                multiple,
            },
        );
        self.total_lagged_multiple = total;
        Ok(window)
    }

    /// Takes a lagged Gobbler back out before its window closed.
    pub fn cancel(&mut self, depositor: &Pubkey, gobbler_id: u64) -> Result<LagReceipt> {
        let receipt = match self.receipts.get(&gobbler_id) {
            Some(receipt) if receipt.depositor == *depositor => *receipt,
            _ => return err!(VaultError::LagEntryNotFound),
        };
        require!(receipt.window == self.current_window, VaultError::LagWindowClosed);

        let key = (*depositor, receipt.window);
        let emptied = match self.entries.get_mut(&key) {
            Some(LagEntry::Pending {
                multiple,
                gobbler_ids,
            }) => {
                *multiple = multiple
                    .checked_sub(receipt.multiple)
                    .ok_or(VaultError::MathOverflow)?;
                gobbler_ids.retain(|id| *id != gobbler_id);
                gobbler_ids.is_empty()
            }
            _ => return err!(VaultError::LagEntryNotFound),
        };
        if emptied {
            self.entries.remove(&key);
        }

        self.receipts.remove(&gobbler_id);
        self.total_lagged_multiple = self
            .total_lagged_multiple
            .checked_sub(receipt.multiple)
            .ok_or(VaultError::MathOverflow)?;
        Ok(receipt)
    }

    /// Closes a matured entry and returns the multiple it held.
    pub fn settle(&mut self, depositor: &Pubkey, window: u64) -> Result<u64> {
        require!(window < self.current_window, VaultError::ClaimingInLowerMintWindow);

        let (multiple, gobbler_ids) = match self.entries.remove(&(*depositor, window)) {
            Some(LagEntry::Pending {
                multiple,
                gobbler_ids,
            }) => (multiple, gobbler_ids),
            _ => return err!(VaultError::NothingToClaim),
        };

        for gobbler_id in gobbler_ids {
            self.receipts.remove(&gobbler_id);
        }
        self.total_lagged_multiple = self
            .total_lagged_multiple
            .checked_sub(multiple)
            .ok_or(VaultError::MathOverflow)?;
        Ok(multiple)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_after_mints(mints: u64) -> WindowLedger {
        let mut ledger = WindowLedger::default();
        for _ in 0..mints {
            ledger.advance_window().unwrap();
        }
        ledger
    }

    fn entries_sum(ledger: &WindowLedger) -> u64 {
        ledger.entries().map(|(_, entry)| entry.multiple()).sum()
    }

    #[test]
    fn lagging_before_any_mint_fails() {
        let mut ledger = WindowLedger::default();
        assert_eq!(
            ledger.record(&Pubkey::new_unique(), 0, 5).unwrap_err(),
            VaultError::TotalMintedIsZero.into()
        );
        assert_eq!(ledger.total_lagged_multiple(), 0);
    }

    #[test]
    fn deposits_into_the_same_window_accumulate() {
        let mut ledger = ledger_after_mints(1);
        let alice = Pubkey::new_unique();

        assert_eq!(ledger.record(&alice, 0, 5).unwrap(), 1);
        assert_eq!(ledger.record(&alice, 1, 7).unwrap(), 1);

        assert_eq!(
            ledger.entry(&alice, 1),
            LagEntry::Pending {
                multiple: 12,
                gobbler_ids: vec![0, 1]
            }
        );
        assert_eq!(ledger.total_lagged_multiple(), 12);
        assert_eq!(entries_sum(&ledger), 12);
    }

    #[test]
    fn same_gobbler_cannot_be_lagged_twice() {
        let mut ledger = ledger_after_mints(1);
        let alice = Pubkey::new_unique();
        ledger.record(&alice, 3, 5).unwrap();
        assert_eq!(
            ledger.record(&alice, 3, 5).unwrap_err(),
            VaultError::GobblerLagPending.into()
        );
    }

    #[test]
    fn cancel_only_within_the_same_window() {
        let mut ledger = ledger_after_mints(1);
        let alice = Pubkey::new_unique();
        ledger.record(&alice, 0, 5).unwrap();
        ledger.record(&alice, 1, 3).unwrap();

        let receipt = ledger.cancel(&alice, 0).unwrap();
        assert_eq!(receipt.multiple, 5);
        assert_eq!(ledger.lagging_deposit(&alice, 1), 3);
        assert_eq!(ledger.total_lagged_multiple(), 3);

        ledger.advance_window().unwrap();
        assert_eq!(
            ledger.cancel(&alice, 1).unwrap_err(),
            VaultError::LagWindowClosed.into()
        );
        assert_eq!(ledger.total_lagged_multiple(), 3);
    }

    #[test]
    fn cancel_requires_the_lagging_depositor() {
        let mut ledger = ledger_after_mints(1);
        let alice = Pubkey::new_unique();
        ledger.record(&alice, 0, 5).unwrap();

        assert_eq!(
            ledger.cancel(&Pubkey::new_unique(), 0).unwrap_err(),
            VaultError::LagEntryNotFound.into()
        );
        assert!(ledger.is_pending(0));
    }

    #[test]
    fn cancelling_the_last_gobbler_empties_the_entry() {
        let mut ledger = ledger_after_mints(2);
        let alice = Pubkey::new_unique();
        ledger.record(&alice, 9, 4).unwrap();
        ledger.cancel(&alice, 9).unwrap();

        assert_eq!(ledger.entry(&alice, 2), LagEntry::Empty);
        assert!(!ledger.is_pending(9));
        assert_eq!(ledger.entries().count(), 0);
    }

    #[test]
    fn settle_only_after_the_window_closed() {
        let mut ledger = ledger_after_mints(1);
        let alice = Pubkey::new_unique();
        ledger.record(&alice, 0, 5).unwrap();

        assert_eq!(
            ledger.settle(&alice, 1).unwrap_err(),
            VaultError::ClaimingInLowerMintWindow.into()
        );
        assert_eq!(ledger.lagging_deposit(&alice, 1), 5);

        ledger.advance_window().unwrap();
        assert_eq!(ledger.settle(&alice, 1).unwrap(), 5);
        assert_eq!(ledger.total_lagged_multiple(), 0);
        assert!(!ledger.is_pending(0));

        assert_eq!(
            ledger.settle(&alice, 1).unwrap_err(),
            VaultError::NothingToClaim.into()
        );
    }

    #[test]
    fn windows_only_move_forward() {
        let mut ledger = WindowLedger::default();
        for expected in 1..=4 {
            assert_eq!(ledger.advance_window().unwrap(), expected);
        }
        assert_eq!(ledger.current_window(), 4);
    }
}
