pub mod change_mint_strategy;
pub mod change_tax_address;
pub mod initialize;

pub use change_mint_strategy::*;
pub use change_tax_address::*;
pub use initialize::*;
