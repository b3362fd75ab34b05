//! Pricing
//!
//! The cart and checkout price path. A base price first takes the permanent
//! site-wide markdown and the per-unit cap, then the quantity-tier wholesale
//! discount when the line or the whole cart reaches the threshold. The PIX
//! incentive is taken once, on the aggregate, at checkout.
//!
//! Every step works in integer minor units and rounds half away from zero to
//! the currency's minor unit.

use decimal_percentage::Percentage;
use jiff::SignedDuration;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartLine, Quantity},
    discounts::{DiscountError, minor_after_percent_off, minor_floor_from_major},
};

/// Errors that can occur while pricing.
///
/// None of these is reachable for prices and quantities built through the
/// validated constructors; they exist because the arithmetic is checked.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Wrapped discount arithmetic error.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// A line total or cart sum did not fit in minor units.
    #[error("price arithmetic overflowed")]
    Overflow,
}

/// The discount constants of a storefront deployment.
///
/// [`PricingPolicy::default`] is the reference deployment: 20% site-wide,
/// a 399.90 per-unit cap, 20% wholesale from 5 units, 5% for PIX and a 40%
/// quiz promotion lasting 24 hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Permanent markdown applied to every catalog price.
    pub site_discount: Percentage,

    /// Maximum discounted unit price, in major units of the item currency.
    pub price_cap: Decimal,

    /// Units at which a line, or the whole cart, becomes wholesale-eligible.
    pub wholesale_threshold: u64,

    /// Quantity-tier discount applied on top of the site price.
    pub wholesale_discount: Percentage,

    /// Instant-payment incentive applied to the checkout total.
    pub pix_discount: Percentage,

    /// Product page discount unlocked by the quiz.
    pub quiz_discount: Percentage,

    /// How long a quiz unlock lasts.
    pub quiz_duration: SignedDuration,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            site_discount: Percentage::from(Decimal::new(20, 2)),
            price_cap: Decimal::new(39_990, 2),
            wholesale_threshold: 5,
            wholesale_discount: Percentage::from(Decimal::new(20, 2)),
            pix_discount: Percentage::from(Decimal::new(5, 2)),
            quiz_discount: Percentage::from(Decimal::new(40, 2)),
            quiz_duration: SignedDuration::from_hours(24),
        }
    }
}

/// The price breakdown of a single cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineQuote<'a> {
    /// Catalog id of the line's item.
    pub item_id: String,

    /// Units on the line.
    pub quantity: Quantity,

    /// Unit price after the site-wide markdown and cap.
    pub site_price: Money<'a, Currency>,

    /// Chargeable unit price.
    pub unit_price: Money<'a, Currency>,

    /// `unit_price * quantity`
    pub line_total: Money<'a, Currency>,

    /// Whether the wholesale discount applied.
    pub wholesale: bool,

    /// Wholesale savings on this line.
    pub savings: Money<'a, Currency>,
}

/// Aggregate values for a priced cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartTotals<'a> {
    /// Sum of quantities.
    pub total_items: u64,

    /// Sum of line totals.
    pub total_price: Money<'a, Currency>,

    /// Sum of wholesale savings. Exactly zero below the wholesale threshold.
    pub total_savings: Money<'a, Currency>,

    /// Per-line breakdown, in cart order.
    pub lines: Vec<LineQuote<'a>>,
}

impl PricingPolicy {
    /// The price cap expressed in minor units of `currency`, rounded down when
    /// the currency cannot represent it exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the cap does not fit in minor units.
    pub fn price_cap_minor(&self, currency: &Currency) -> Result<i64, PricingError> {
        Ok(minor_floor_from_major(self.price_cap, currency)?)
    }

    /// Apply the site-wide markdown and the per-unit cap to a base price.
    ///
    /// Callers apply this exactly once per base price: feeding an already
    /// discounted price back in discounts it again.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn apply_site_discount<'a>(
        &self,
        base_price: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let base_minor = base_price.to_minor_units();

        debug_assert!(base_minor >= 0, "negative base price {base_minor}");

        let discounted = minor_after_percent_off(&self.site_discount, base_minor)?;
        let cap = self.price_cap_minor(base_price.currency())?;

        Ok(Money::from_minor(discounted.min(cap), base_price.currency()))
    }

    /// A line is eligible when it, or the whole cart, reaches the threshold.
    pub fn is_wholesale_eligible(&self, line: &CartLine<'_>, cart_total_quantity: u64) -> bool {
        u64::from(line.quantity().get()) >= self.wholesale_threshold
            || cart_total_quantity >= self.wholesale_threshold
    }

    /// Chargeable unit price of a line given the cart's total quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn unit_price<'a>(
        &self,
        line: &CartLine<'a>,
        cart_total_quantity: u64,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let site_price = self.apply_site_discount(line.item().price())?;

        self.wholesale_price(&site_price, line, cart_total_quantity)
    }

    /// `unit_price * quantity`
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn line_total<'a>(
        &self,
        line: &CartLine<'a>,
        cart_total_quantity: u64,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let unit_price = self.unit_price(line, cart_total_quantity)?;

        times_quantity(&unit_price, line.quantity())
    }

    /// Full breakdown of a single line given the cart's total quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn quote_line<'a>(
        &self,
        line: &CartLine<'a>,
        cart_total_quantity: u64,
    ) -> Result<LineQuote<'a>, PricingError> {
        let site_price = self.apply_site_discount(line.item().price())?;
        let unit_price = self.wholesale_price(&site_price, line, cart_total_quantity)?;
        let wholesale = self.is_wholesale_eligible(line, cart_total_quantity);

        let site_total = times_quantity(&site_price, line.quantity())?;
        let line_total = times_quantity(&unit_price, line.quantity())?;

        let savings_minor = if !wholesale {
            0
        } else {
            site_total
                .to_minor_units()
                .checked_sub(line_total.to_minor_units())
                .ok_or(PricingError::Overflow)?
        };

        Ok(LineQuote {
            item_id: line.item().id().to_string(),
            quantity: line.quantity(),
            site_price,
            unit_price,
            line_total,
            wholesale,
            savings: Money::from_minor(savings_minor, site_price.currency()),
        })
    }

    /// Price every line of a cart.
    ///
    /// The cart's total quantity is computed once and shared by every line,
    /// so the result does not depend on line order.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    #[tracing::instrument(level = "debug", skip_all, fields(lines = cart.len()))]
    pub fn cart_totals<'a>(&self, cart: &Cart<'a>) -> Result<CartTotals<'a>, PricingError> {
        let total_items = cart.total_items();

        let lines = cart
            .iter()
            .map(|line| self.quote_line(line, total_items))
            .collect::<Result<Vec<_>, _>>()?;

        let total_price_minor = checked_sum(lines.iter().map(|q| q.line_total.to_minor_units()))?;

        let total_savings_minor = if total_items < self.wholesale_threshold {
            0
        } else {
            checked_sum(lines.iter().map(|q| q.savings.to_minor_units()))?
        };

        let total_price = Money::from_minor(total_price_minor, cart.currency());
        let total_savings = Money::from_minor(total_savings_minor, cart.currency());

        debug!(
            total_items,
            total_price = %total_price,
            total_savings = %total_savings,
            "priced cart"
        );

        Ok(CartTotals {
            total_items,
            total_price,
            total_savings,
            lines,
        })
    }

    /// Checkout total when paying by PIX.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn checkout_pix_price<'a>(
        &self,
        total_price: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let minor = minor_after_percent_off(&self.pix_discount, total_price.to_minor_units())?;

        Ok(Money::from_minor(minor, total_price.currency()))
    }

    /// `total_price - checkout_pix_price(total_price)`
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn pix_discount<'a>(
        &self,
        total_price: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let pix_price = self.checkout_pix_price(total_price)?;

        let minor = total_price
            .to_minor_units()
            .checked_sub(pix_price.to_minor_units())
            .ok_or(PricingError::Overflow)?;

        Ok(Money::from_minor(minor, total_price.currency()))
    }

    fn wholesale_price<'a>(
        &self,
        site_price: &Money<'a, Currency>,
        line: &CartLine<'_>,
        cart_total_quantity: u64,
    ) -> Result<Money<'a, Currency>, PricingError> {
        if !self.is_wholesale_eligible(line, cart_total_quantity) {
            return Ok(*site_price);
        }

        let minor = minor_after_percent_off(&self.wholesale_discount, site_price.to_minor_units())?;

        Ok(Money::from_minor(minor, site_price.currency()))
    }
}

fn times_quantity<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: Quantity,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity.get()))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, unit_price.currency()))
}

fn checked_sum(mut values: impl Iterator<Item = i64>) -> Result<i64, PricingError> {
    values.try_fold(0_i64, |acc, value| {
        acc.checked_add(value).ok_or(PricingError::Overflow)
    })
}

/// [`PricingPolicy::apply_site_discount`] with the reference policy.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn apply_site_discount<'a>(
    base_price: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    PricingPolicy::default().apply_site_discount(base_price)
}

/// [`PricingPolicy::is_wholesale_eligible`] with the reference policy.
pub fn is_wholesale_eligible(line: &CartLine<'_>, cart_total_quantity: u64) -> bool {
    PricingPolicy::default().is_wholesale_eligible(line, cart_total_quantity)
}

/// [`PricingPolicy::unit_price`] with the reference policy.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn unit_price<'a>(
    line: &CartLine<'a>,
    cart_total_quantity: u64,
) -> Result<Money<'a, Currency>, PricingError> {
    PricingPolicy::default().unit_price(line, cart_total_quantity)
}

/// [`PricingPolicy::line_total`] with the reference policy.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn line_total<'a>(
    line: &CartLine<'a>,
    cart_total_quantity: u64,
) -> Result<Money<'a, Currency>, PricingError> {
    PricingPolicy::default().line_total(line, cart_total_quantity)
}

/// [`PricingPolicy::cart_totals`] with the reference policy.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn cart_totals<'a>(cart: &Cart<'a>) -> Result<CartTotals<'a>, PricingError> {
    PricingPolicy::default().cart_totals(cart)
}

/// [`PricingPolicy::checkout_pix_price`] with the reference policy.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn checkout_pix_price<'a>(
    total_price: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    PricingPolicy::default().checkout_pix_price(total_price)
}
