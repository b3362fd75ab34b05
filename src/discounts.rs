//! Discount utilities
//!
//! Percentage and unit-conversion helpers shared by every pricing step. All
//! arithmetic runs on integer minor units (centavos for BRL) and rounds half
//! away from zero, so repeated summation never accumulates rounding noise.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::iso::Currency;
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A major-unit amount could not be represented in minor units.
    #[error("amount {0} cannot be represented in minor units of {1}")]
    AmountConversion(Decimal, &'static str),

    /// A major-unit amount has finer precision than the currency's minor unit.
    #[error("amount {0} has more decimal places than {1} allows")]
    ExcessPrecision(Decimal, &'static str),
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Reduce a minor unit amount by a percentage, never going below zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn minor_after_percent_off(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let discount = percent_of_minor(percent, minor)?;

    Ok(minor.saturating_sub(discount).max(0))
}

/// Convert a major-unit amount (e.g. `399.90`) into minor units of `currency`.
///
/// # Errors
///
/// Returns [`DiscountError::AmountConversion`] if the amount does not fit in an `i64`
/// and [`DiscountError::ExcessPrecision`] if it has more decimal places than the
/// currency's minor unit.
pub fn minor_from_major(amount: Decimal, currency: &Currency) -> Result<i64, DiscountError> {
    let scaled = scaled_to_minor(amount, currency)?;

    if !scaled.fract().is_zero() {
        return Err(DiscountError::ExcessPrecision(amount, currency.iso_alpha_code));
    }

    scaled
        .to_i64()
        .ok_or(DiscountError::AmountConversion(amount, currency.iso_alpha_code))
}

/// Convert a major-unit limit into minor units of `currency`, rounding toward
/// zero so the result never exceeds `amount`.
///
/// # Errors
///
/// Returns [`DiscountError::AmountConversion`] if the amount does not fit in an `i64`.
pub fn minor_floor_from_major(amount: Decimal, currency: &Currency) -> Result<i64, DiscountError> {
    scaled_to_minor(amount, currency)?
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_i64()
        .ok_or(DiscountError::AmountConversion(amount, currency.iso_alpha_code))
}

fn scaled_to_minor(amount: Decimal, currency: &Currency) -> Result<Decimal, DiscountError> {
    let conversion_error = || DiscountError::AmountConversion(amount, currency.iso_alpha_code);

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .ok_or_else(conversion_error)?;

    amount
        .checked_mul(Decimal::from(scale))
        .ok_or_else(conversion_error)
}
