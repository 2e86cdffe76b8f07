use anchor_lang::AccountDeserialize;
use anchor_lang::InstructionData;
use anchor_lang::ToAccountMetas;
use gobbler_pool::state::Pool;
use gobbler_pool::testing::{LinearGooOracle, MockArtGobbler};
use gobbler_pool::{GobblerCustody, GobblerVault, Wad, POOL_SEED};
use solana_program_test::*;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};

// Re-export for convenience
pub use gobbler_pool::testing::TestPool;
pub use solana_program_test::ProgramTestContext;

// Custom error type for fuzzing
pub type FuzzResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub type FuzzVault = GobblerVault<MockArtGobbler, LinearGooOracle>;

/// Test environment with program loaded
pub struct FuzzTestEnv {
    pub program_id: Pubkey,
    pub context: ProgramTestContext,
}

/// Pool config account plus the keys allowed to administer it
#[derive(Debug)]
pub struct PoolAccounts {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub owner_keypair: Keypair,
}

// ============================================================================
// Core Setup Functions
// ============================================================================

/// Creates the program test environment with the pool program loaded
pub async fn setup_program_test() -> FuzzTestEnv {
    let program_id = gobbler_pool::id();
    let program_test = ProgramTest::new("gobbler_pool", program_id, None);

    let context = program_test.start_with_context().await;

    FuzzTestEnv {
        program_id,
        context,
    }
}

/// Sends 1 SOL on top of rent exemption to `account`
pub async fn fund_account(context: &mut ProgramTestContext, account: &Pubkey) -> FuzzResult<()> {
    let rent = context.banks_client.get_rent().await?;
    let lamports = rent.minimum_balance(0) + 1_000_000_000;

    let ix = solana_sdk::system_instruction::transfer(&context.payer.pubkey(), account, lamports);

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;
    Ok(())
}

/// Creates the pool config account (calls initialize instruction)
pub async fn setup_pool(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    tax_recipient: Pubkey,
    mint_strategy: Pubkey,
    tax_threshold: Option<u64>,
) -> FuzzResult<PoolAccounts> {
    let owner_keypair = Keypair::new();
    let owner = owner_keypair.pubkey();
    fund_account(context, &owner).await?;

    let (pool, _) = derive_pool_pda(program_id);

    let accounts = gobbler_pool::accounts::Initialize {
        pool,
        owner,
        payer: owner,
        system_program: solana_sdk::system_program::ID,
    };

    let data = gobbler_pool::instruction::Initialize {
        tax_recipient,
        mint_strategy,
        tax_threshold,
    }
    .data();

    let ix = Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data,
    };

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&owner),
        &[&owner_keypair],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;

    Ok(PoolAccounts {
        pool,
        owner,
        owner_keypair,
    })
}

/// Signs and sends `change_tax_address` as `signer`
pub async fn send_change_tax_address(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    pool: &Pubkey,
    signer: &Keypair,
    new_tax_address: Pubkey,
) -> FuzzResult<()> {
    let accounts = gobbler_pool::accounts::ChangeTaxAddress {
        pool: *pool,
        owner: signer.pubkey(),
    };

    let data = gobbler_pool::instruction::ChangeTaxAddress { new_tax_address }.data();

    let ix = Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data,
    };

    send_signed(context, ix, signer).await
}

/// Signs and sends `change_mint_strategy` as `signer`
pub async fn send_change_mint_strategy(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    pool: &Pubkey,
    signer: &Keypair,
    new_strategy: Pubkey,
) -> FuzzResult<()> {
    let accounts = gobbler_pool::accounts::ChangeMintStrategy {
        pool: *pool,
        owner: signer.pubkey(),
    };

    let data = gobbler_pool::instruction::ChangeMintStrategy { new_strategy }.data();

    let ix = Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data,
    };

    send_signed(context, ix, signer).await
}

async fn send_signed(context: &mut ProgramTestContext, ix: Instruction, signer: &Keypair) -> FuzzResult<()> {
    // Fresh blockhash so identical admin calls are not deduplicated
    let blockhash = context.get_new_latest_blockhash().await?;

    let tx = Transaction::new_signed_with_payer(&[ix], Some(&signer.pubkey()), &[signer], blockhash);

    context.banks_client.process_transaction(tx).await?;
    Ok(())
}

// ============================================================================
// PDA Derivation Helpers
// ============================================================================

/// Derive pool config PDA
pub fn derive_pool_pda(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED], program_id)
}

// ============================================================================
// Account State Verification Helpers
// ============================================================================

/// Fetch and return pool config
pub async fn get_pool_state(context: &mut ProgramTestContext, pool: &Pubkey) -> FuzzResult<Pool> {
    let account = context
        .banks_client
        .get_account(*pool)
        .await?
        .ok_or("Pool account not found")?;

    let pool_data = Pool::try_deserialize(&mut account.data.as_ref())?;
    Ok(pool_data)
}

// ============================================================================
// In-memory Vault Invariants
// ============================================================================

/// Sum of every holder's mGOB balance, `None` if it overflows
pub fn sum_of_balances(vault: &FuzzVault) -> Option<Wad> {
    vault
        .state()
        .shares
        .holders()
        .try_fold(Wad::ZERO, |acc, (_, balance)| acc.checked_add(*balance).ok())
}

/// Checks the ledger invariants that must hold after every operation, failed or not
pub fn assert_vault_invariants(vault: &FuzzVault) {
    let state = vault.state();

    assert_eq!(
        sum_of_balances(vault),
        Some(state.shares.total_supply()),
        "CRITICAL: share balances do not add up to total supply"
    );

    let lagged: u64 = state.windows.entries().map(|(_, entry)| entry.multiple()).sum();
    assert_eq!(
        lagged,
        state.windows.total_lagged_multiple(),
        "CRITICAL: lag entries do not add up to total lagged multiple"
    );

    assert_eq!(
        state.windows.current_window(),
        state.minted.total_minted(),
        "Mint window must equal the number of pool mints"
    );

    for ((_, window), _) in state.windows.entries() {
        assert!(
            *window >= 1 && *window <= state.windows.current_window(),
            "Lag entry in window {} outside [1, {}]",
            window,
            state.windows.current_window()
        );
    }

    let custody = vault.custody();
    for (gobbler_id, gobbler) in &custody.gobblers {
        if state.windows.is_pending(*gobbler_id) {
            assert_eq!(
                gobbler.owner,
                *vault.key(),
                "CRITICAL: lagged Gobbler {} left the pool while pending",
                gobbler_id
            );
        }
    }

    for gobbler_id in &state.held {
        assert_eq!(
            custody.owner_of(*gobbler_id),
            Some(*vault.key()),
            "CRITICAL: credited Gobbler {} is no longer in the pool",
            gobbler_id
        );
    }
}
