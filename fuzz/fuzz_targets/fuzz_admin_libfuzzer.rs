#![no_main]

use arbitrary::Arbitrary;
use fuzz_helpers::*;
use libfuzzer_sys::fuzz_target;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

/// Admin call, sent either by the pool owner or by a stranger
#[derive(Debug, Clone, Arbitrary)]
enum AdminOp {
    ChangeTaxAddress { by_owner: bool, target: [u8; 32] },
    ChangeMintStrategy { by_owner: bool, target: [u8; 32] },
}

/// Fuzzable input for the admin instructions
#[derive(Debug, Clone, Arbitrary)]
struct AdminFuzzInput {
    tax_threshold: Option<u64>,
    tax_recipient: [u8; 32],
    mint_strategy: [u8; 32],
    ops: Vec<AdminOp>,
}

/// Execute a single fuzz iteration over the admin instructions
async fn fuzz_admin_once(input: AdminFuzzInput) -> FuzzResult<()> {
    let mut env = setup_program_test().await;

    let tax_recipient = Pubkey::new_from_array(input.tax_recipient);
    let mint_strategy = Pubkey::new_from_array(input.mint_strategy);

    let accounts = match setup_pool(
        &mut env.context,
        &env.program_id,
        tax_recipient,
        mint_strategy,
        input.tax_threshold,
    )
    .await
    {
        Ok(accounts) => accounts,
        Err(e) => {
            eprintln!("Setup failed: {}", e);
            return Ok(()); // Skip this iteration if setup fails
        }
    };

    // PROPERTY: initialize stores exactly what it was given
    let pool = get_pool_state(&mut env.context, &accounts.pool).await?;
    assert_eq!(pool.owner, accounts.owner);
    assert_eq!(pool.tax_recipient, tax_recipient);
    assert_eq!(pool.mint_strategy, mint_strategy);
    assert_eq!(
        pool.tax_threshold,
        input.tax_threshold.unwrap_or(gobbler_pool::DEFAULT_TAX_THRESHOLD)
    );

    let stranger = Keypair::new();
    fund_account(&mut env.context, &stranger.pubkey()).await?;

    for op in input.ops.into_iter().take(8) {
        let before = get_pool_state(&mut env.context, &accounts.pool).await?;

        let (by_owner, result) = match &op {
            AdminOp::ChangeTaxAddress { by_owner, target } => {
                let signer = if *by_owner { &accounts.owner_keypair } else { &stranger };
                let result = send_change_tax_address(
                    &mut env.context,
                    &env.program_id,
                    &accounts.pool,
                    signer,
                    Pubkey::new_from_array(*target),
                )
                .await;
                (*by_owner, result)
            }
            AdminOp::ChangeMintStrategy { by_owner, target } => {
                let signer = if *by_owner { &accounts.owner_keypair } else { &stranger };
                let result = send_change_mint_strategy(
                    &mut env.context,
                    &env.program_id,
                    &accounts.pool,
                    signer,
                    Pubkey::new_from_array(*target),
                )
                .await;
                (*by_owner, result)
            }
        };

        let after = get_pool_state(&mut env.context, &accounts.pool).await?;

        // ========================================
        // SECURITY PROPERTY: OWNER-ONLY ADMIN
        // ========================================
        if !by_owner {
            assert!(
                result.is_err(),
                "CRITICAL VULNERABILITY: stranger {} changed pool config with {:?}",
                stranger.pubkey(),
                op
            );
            assert_eq!(after, before, "Rejected admin call must not touch the pool");
            continue;
        }

        if let Err(e) = result {
            panic!("Owner admin call failed: {:?}\nOp: {:?}", e, op);
        }

        // ========================================
        // CORRECTNESS CHECKS
        // ========================================
        assert_eq!(after.owner, before.owner, "Ownership never moves");
        assert_eq!(after.tax_threshold, before.tax_threshold);
        assert_eq!(after.bump, before.bump);
        match op {
            AdminOp::ChangeTaxAddress { target, .. } => {
                assert_eq!(after.tax_recipient, Pubkey::new_from_array(target));
                assert_eq!(after.mint_strategy, before.mint_strategy);
            }
            AdminOp::ChangeMintStrategy { target, .. } => {
                assert_eq!(after.mint_strategy, Pubkey::new_from_array(target));
                assert_eq!(after.tax_recipient, before.tax_recipient);
            }
        }
    }

    println!("✓ PASS - pool {} admin invariants ✓", accounts.pool);
    Ok(())
}

fuzz_target!(|input: AdminFuzzInput| {
    // Run the async fuzz test
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime.block_on(async {
        if let Err(e) = fuzz_admin_once(input).await {
            eprintln!("Fuzz iteration failed: {}", e);
        }
    });
});
