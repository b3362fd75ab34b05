//! Checkout

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::pricing::{CartTotals, PricingError, PricingPolicy};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Brazilian instant payment; earns the PIX discount.
    #[default]
    Pix,

    /// Credit card; full price.
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Pix => write!(f, "PIX"),
            PaymentMethod::Card => write!(f, "card"),
        }
    }
}

/// Final amounts for placing an order.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary<'a> {
    /// Payment method the amounts were computed for.
    pub method: PaymentMethod,

    /// Units in the cart.
    pub total_items: u64,

    /// Cart total after wholesale pricing.
    pub subtotal: Money<'a, Currency>,

    /// Wholesale savings already included in `subtotal`.
    pub wholesale_savings: Money<'a, Currency>,

    /// PIX incentive; zero for card payments.
    pub pix_discount: Money<'a, Currency>,

    /// Amount to charge.
    pub total: Money<'a, Currency>,
}

impl<'a> CheckoutSummary<'a> {
    /// Summarise a priced cart for a payment method.
    ///
    /// The PIX discount is taken on the wholesale-priced total, so the two
    /// stack sequentially.
    ///
    /// # Errors
    ///
    /// Returns an error if the arithmetic overflows.
    pub fn for_cart(
        totals: &CartTotals<'a>,
        method: PaymentMethod,
        policy: &PricingPolicy,
    ) -> Result<Self, PricingError> {
        let subtotal = totals.total_price;

        let (pix_discount, total) = match method {
            PaymentMethod::Pix => (
                policy.pix_discount(&subtotal)?,
                policy.checkout_pix_price(&subtotal)?,
            ),
            PaymentMethod::Card => (Money::from_minor(0, subtotal.currency()), subtotal),
        };

        Ok(Self {
            method,
            total_items: totals.total_items,
            subtotal,
            wholesale_savings: totals.total_savings,
            pix_discount,
            total,
        })
    }
}
