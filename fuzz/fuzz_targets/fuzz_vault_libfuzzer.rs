#![no_main]

use arbitrary::Arbitrary;
use fuzz_helpers::*;
use gobbler_pool::{GobblerCustody, Wad};
use libfuzzer_sys::fuzz_target;
use solana_sdk::pubkey::Pubkey;

const USERS: usize = 3;
const START: i64 = 1_700_000_000;

/// One call against the vault or the collection around it
#[derive(Debug, Clone, Arbitrary)]
enum VaultOp {
    /// Mint a revealed Gobbler to a user
    Give { user: u8, multiple: u8 },
    Deposit { user: u8, pick: u8 },
    /// Transfer straight to the pool, then run the receive hook
    SafeTransfer { user: u8, pick: u8 },
    Withdraw { user: u8, pick: u8 },
    DepositWithLag { user: u8, pick: u8 },
    WithdrawLagged { user: u8, pick: u8 },
    ClaimLagged { user: u8, windows: Vec<u8> },
    /// Advance the clock, then mint from the pool's goo
    MintGobbler { wait_secs: u32 },
    MintLegendary { picks: Vec<u8> },
    Unreveal { pick: u8 },
    Reveal { pick: u8, multiple: u8 },
    SetGoo { user: u8, amount: u32 },
    ChangeTaxAddress { by_owner: bool, user: u8 },
}

/// Fuzzable input: pool config plus an operation sequence
#[derive(Debug, Clone, Arbitrary)]
struct VaultFuzzInput {
    tax_threshold: u8,
    ops: Vec<VaultOp>,
}

fn gobbler_ids(t: &TestPool) -> Vec<u64> {
    t.vault.custody().gobblers.keys().copied().collect()
}

fn pick(ids: &[u64], index: u8) -> u64 {
    if ids.is_empty() {
        // unknown id, every call on it must fail
        return u64::MAX;
    }
    ids[index as usize % ids.len()]
}

fn run(input: VaultFuzzInput) {
    let mut t = TestPool::new(input.tax_threshold as u64 % 4);
    let users: Vec<Pubkey> = (0..USERS).map(|_| Pubkey::new_unique()).collect();
    let user = |index: u8| users[index as usize % USERS];
    let mut now = START;

    for op in input.ops.into_iter().take(64) {
        let ids = gobbler_ids(&t);
        let before = t.vault.state().clone();
        let custody_before = t.vault.custody().clone();
        let rate_before = t.vault.conversion_rate();

        let result = match op.clone() {
            VaultOp::Give { user: u, multiple } => {
                t.give(&user(u), multiple as u64 % 10 + 1);
                Ok(())
            }
            VaultOp::Deposit { user: u, pick: p } => {
                let gobbler_id = pick(&ids, p);
                t.vault.deposit(&t.pool, &user(u), gobbler_id, now).map(|event| {
                    // PROPERTY: depositing never raises the shares-per-multiple rate
                    if let (Ok(rate_before), Ok(rate_after)) = (rate_before, t.vault.conversion_rate()) {
                        assert!(
                            rate_after <= rate_before,
                            "CRITICAL: deposit of Gobbler {} diluted holders: rate {} -> {}",
                            gobbler_id,
                            rate_before,
                            rate_after
                        );
                    }
                    assert_eq!(
                        t.vault.custody().owner_of(gobbler_id),
                        Some(*t.vault.key()),
                        "Deposited Gobbler must be held by the pool"
                    );
                    assert_eq!(
                        event.shares.checked_add(event.tax).ok(),
                        t.vault.total_supply().checked_sub(before.shares.total_supply()).ok(),
                        "Supply must grow by exactly net + tax"
                    );
                })
            }
            VaultOp::SafeTransfer { user: u, pick: p } => {
                let gobbler_id = pick(&ids, p);
                let already_held = before.held.contains(&gobbler_id);
                t.safe_transfer_to_pool(&user(u), gobbler_id, now).map(|_| {
                    // PROPERTY: a Gobbler is credited at most once while it stays in the pool
                    assert!(!already_held, "CRITICAL: Gobbler {} credited twice", gobbler_id);
                    if let (Ok(rate_before), Ok(rate_after)) = (rate_before, t.vault.conversion_rate()) {
                        assert!(
                            rate_after <= rate_before,
                            "CRITICAL: received Gobbler {} diluted holders: rate {} -> {}",
                            gobbler_id,
                            rate_before,
                            rate_after
                        );
                    }
                })
            }
            VaultOp::Withdraw { user: u, pick: p } => {
                let gobbler_id = pick(&ids, p);
                t.vault.withdraw(&user(u), gobbler_id).map(|_| {
                    assert_eq!(t.vault.custody().owner_of(gobbler_id), Some(user(u)));
                })
            }
            VaultOp::DepositWithLag { user: u, pick: p } => {
                let gobbler_id = pick(&ids, p);
                t.vault.deposit_with_lag(&user(u), gobbler_id).map(|event| {
                    assert_eq!(event.window, t.vault.current_window());
                    assert_eq!(
                        t.vault.total_supply(),
                        before.shares.total_supply(),
                        "Lagged deposit must not issue shares"
                    );
                })
            }
            VaultOp::WithdrawLagged { user: u, pick: p } => {
                let gobbler_id = pick(&ids, p);
                t.vault.withdraw_lagged(&user(u), gobbler_id).map(|_| {
                    assert_eq!(t.vault.custody().owner_of(gobbler_id), Some(user(u)));
                    assert_eq!(t.vault.total_supply(), before.shares.total_supply());
                })
            }
            VaultOp::ClaimLagged { user: u, windows } => {
                let windows: Vec<u64> = windows.into_iter().take(4).map(|w| w as u64 % 6).collect();
                t.vault.claim_lagged(&t.pool, &user(u), &windows).map(|claimed| {
                    assert_eq!(claimed.len(), windows.len());
                    for window in &windows {
                        assert_eq!(t.vault.lagging_deposit(&user(u), *window), 0);
                    }
                })
            }
            VaultOp::MintGobbler { wait_secs } => {
                now += wait_secs as i64;
                let window = t.vault.current_window();
                t.vault.mint_gobbler(&t.pool, now).map(|event| {
                    assert_eq!(event.window, window + 1, "Each mint opens exactly one window");
                    assert_eq!(t.vault.total_supply(), before.shares.total_supply());
                })
            }
            VaultOp::MintLegendary { picks } => {
                let selected: Vec<u64> = picks.into_iter().take(4).map(|p| pick(&ids, p)).collect();
                t.vault.mint_legendary_gobbler(&t.pool, &selected).map(|_| {
                    assert_eq!(
                        t.vault.total_supply(),
                        before.shares.total_supply(),
                        "Legendary mint must not touch share supply"
                    );
                })
            }
            VaultOp::Unreveal { pick: p } => {
                t.gobblers().unreveal(pick(&ids, p));
                Ok(())
            }
            VaultOp::Reveal { pick: p, multiple } => {
                t.gobblers().reveal(pick(&ids, p), multiple as u64 % 10 + 1);
                Ok(())
            }
            VaultOp::SetGoo { user: u, amount } => {
                t.gobblers().set_goo_balance(&user(u), Wad::from_int(amount as u64));
                Ok(())
            }
            VaultOp::ChangeTaxAddress { by_owner, user: u } => {
                let caller = if by_owner { t.owner } else { user(u) };
                t.vault.change_tax_address(&mut t.pool, &caller, user(u)).map(|_| ())
            }
        };

        if let Err(e) = result {
            // PROPERTY: failed operations leave the vault ledgers untouched
            assert_eq!(
                t.vault.state(),
                &before,
                "CRITICAL: {:?} failed with {:?} but changed vault state",
                op,
                e
            );
            // PROPERTY: and the collection, goo balances included
            assert_eq!(
                t.vault.custody(),
                &custody_before,
                "CRITICAL: {:?} failed with {:?} but moved Gobblers or goo",
                op,
                e
            );
        }

        assert_vault_invariants(&t.vault);
    }
}

fuzz_target!(|input: VaultFuzzInput| {
    run(input);
});
