use anchor_lang::prelude::*;

use crate::math::Wad;

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintStrategyChanged {
    pub old_strategy: Pubkey,
    pub new_strategy: Pubkey,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxAddressChanged {
    pub old_tax_address: Pubkey,
    pub new_tax_address: Pubkey,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GobblerMinted {
    pub gobbler_id: u64,
    /// Window opened by this mint
    pub window: u64,
    pub bid: Wad,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendaryGobblerMinted {
    pub gobbler_id: u64,
    pub burned: Vec<u64>,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposited {
    pub depositor: Pubkey,
    pub gobbler_id: u64,
    pub multiple: u64,
    /// Shares credited to the depositor, net of tax
    pub shares: Wad,
    pub tax: Wad,
    pub goo_deposit: Wad,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawn {
    pub owner: Pubkey,
    pub gobbler_id: u64,
    pub multiple: u64,
    pub shares_burned: Wad,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaggedDeposited {
    pub depositor: Pubkey,
    pub gobbler_id: u64,
    pub multiple: u64,
    pub window: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaggedWithdrawn {
    pub depositor: Pubkey,
    pub gobbler_id: u64,
    pub multiple: u64,
    pub window: u64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaggedClaimed {
    pub depositor: Pubkey,
    pub window: u64,
    pub multiple: u64,
    pub shares: Wad,
    pub tax: Wad,
}
