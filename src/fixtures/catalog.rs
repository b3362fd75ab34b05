//! Catalog Fixtures

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{BRL, Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{catalog::CatalogItem, discounts::minor_from_major, fixtures::FixtureError};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "249.90 BRL")
    pub price: String,

    /// Strike-through reference price
    #[serde(default)]
    pub old_price: Option<String>,

    /// Informational PIX price
    #[serde(default)]
    pub pix_price: Option<String>,

    /// Discount badge
    #[serde(default)]
    pub discount_percent: Option<u8>,
}

impl ProductFixture {
    /// Convert into a validated catalog item with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or the item is invalid.
    pub fn into_item(self, id: String) -> Result<CatalogItem<'static>, FixtureError> {
        let mut item = CatalogItem::new(id, self.name, parse_money(&self.price)?)?;

        if let Some(old_price) = self.old_price {
            item = item.with_old_price(parse_money(&old_price)?)?;
        }

        if let Some(pix_price) = self.pix_price {
            item = item.with_pix_price(parse_money(&pix_price)?)?;
        }

        if let Some(percent) = self.discount_percent {
            item = item.with_discount_percent(percent)?;
        }

        Ok(item)
    }
}

/// Parse price string (e.g., "249.90 BRL") into money.
///
/// # Errors
///
/// See [`parse_price`].
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "249.90 BRL") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, has more decimal places than
/// the currency's minor unit, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency = parse_currency(currency_code)?;

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units =
        minor_from_major(amount, currency).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Look up a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything else.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "BRL" => Ok(BRL),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse percentage string (e.g., "20%" or "0.20") into a `Percentage`
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        // 20% -> 0.20
        Ok(Percentage::from(value / Decimal::ONE_HUNDRED))
    } else {
        let value = trimmed
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
