use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::WAD;
use crate::error::VaultError;

/// Unsigned 18-decimal fixed-point amount.
///
/// Every division rounds toward zero, which favors the pool over the caller.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Wad(u128);

impl Wad {
    pub const ZERO: Wad = Wad(0);
    pub const ONE: Wad = Wad(WAD);

    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Whole units; cannot overflow since `u64::MAX * 1e18 < u128::MAX`.
    pub const fn from_int(value: u64) -> Self {
        Self(value as u128 * WAD)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Wad) -> Result<Wad> {
        self.0
            .checked_add(other.0)
            .map(Wad)
            .ok_or_else(|| VaultError::MathOverflow.into())
    }

    pub fn checked_sub(self, other: Wad) -> Result<Wad> {
        self.0
            .checked_sub(other.0)
            .map(Wad)
            .ok_or_else(|| VaultError::MathOverflow.into())
    }

    /// `self * factor`, with `factor` an unscaled integer.
    pub fn checked_mul_int(self, factor: u64) -> Result<Wad> {
        self.0
            .checked_mul(factor as u128)
            .map(Wad)
            .ok_or_else(|| VaultError::MathOverflow.into())
    }

    /// `self / divisor`, with `divisor` an unscaled integer. Floors.
    pub fn checked_div_int(self, divisor: u64) -> Result<Wad> {
        self.0
            .checked_div(divisor as u128)
            .map(Wad)
            .ok_or_else(|| VaultError::MathOverflow.into())
    }

    /// `self * numerator / denominator`, floored.
    pub fn checked_mul_ratio(self, numerator: u128, denominator: u128) -> Result<Wad> {
        self.0
            .checked_mul(numerator)
            .ok_or(VaultError::MathOverflow)?
            .checked_div(denominator)
            .map(Wad)
            .ok_or_else(|| VaultError::MathOverflow.into())
    }

    pub fn saturating_sub(self, other: Wad) -> Wad {
        Wad(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / WAD, self.0 % WAD)
    }
}

/// Elapsed seconds as a wad number of days, the time unit the balance oracle expects.
pub fn seconds_to_wad_days(seconds: u64) -> Result<Wad> {
    Wad::from_int(seconds).checked_mul_ratio(1, crate::constants::SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_eighteen_decimals() {
        assert_eq!(Wad::from_int(5).to_string(), "5.000000000000000000");
        assert_eq!(Wad::from_raw(25 * WAD / 1000).to_string(), "0.025000000000000000");
    }

    #[test]
    fn division_floors() {
        let third = Wad::from_int(5).checked_div_int(15).unwrap();
        assert_eq!(third.raw(), 333_333_333_333_333_333);
        assert_eq!(third.checked_mul_int(15).unwrap().raw(), 4_999_999_999_999_999_995);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert_eq!(
            Wad::ONE.checked_div_int(0).unwrap_err(),
            VaultError::MathOverflow.into()
        );
    }

    #[test]
    fn sixty_seconds_in_days() {
        // 60 / 86400 days
        assert_eq!(seconds_to_wad_days(60).unwrap().raw(), 694_444_444_444_444);
        assert_eq!(seconds_to_wad_days(86_400).unwrap(), Wad::ONE);
    }
}
