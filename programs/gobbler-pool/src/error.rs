use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    #[msg("Gobbler has not been revealed yet")]
    UnrevealedGobbler,
    #[msg("Lagged deposit can only be claimed after its mint window closed")]
    ClaimingInLowerMintWindow,
    #[msg("No Gobbler has been minted by the pool yet")]
    TotalMintedIsZero,
    #[msg("Only the pool owner can perform this action")]
    Unauthorized,
    #[msg("Insufficient shares")]
    InsufficientShares,
    #[msg("Math operation overflow")]
    MathOverflow,
    #[msg("Shares are outstanding but the pool has no backing multiple")]
    ZeroBackingMultiple,
    #[msg("A mint happened since the lagged deposit, claim it instead")]
    LagWindowClosed,
    #[msg("Gobbler was not lag deposited by this account")]
    LagEntryNotFound,
    #[msg("No lagged deposit to claim for this window")]
    NothingToClaim,
    #[msg("Gobbler is pending in a lagged deposit")]
    GobblerLagPending,
    #[msg("Mint strategy does not match the pool's configured strategy")]
    StrategyMismatch,
    #[msg("Mint strategy configuration is invalid")]
    InvalidStrategyConfig,
    #[msg("Legendary mint requires at least one Gobbler")]
    EmptyLegendarySelection,
    #[msg("Gobbler is not waiting in the pool to be credited")]
    GobblerNotReceived,
}
