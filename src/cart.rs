//! Cart

use std::{fmt, num::NonZeroU32};

use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::catalog::CatalogItem;

/// Errors related to cart construction or mutation.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// An item's currency differs from the cart currency (item id, item currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// No line holds an item with this id.
    #[error("No cart line for item {0}")]
    LineNotFound(String),

    /// Adding to a line would overflow its quantity.
    #[error("Quantity overflow for item {0}")]
    QuantityOverflow(String),
}

/// A positive number of units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Quantity = Quantity(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    pub const fn new(units: u32) -> Option<Self> {
        match NonZeroU32::new(units) {
            Some(units) => Some(Self(units)),
            None => None,
        }
    }

    /// Number of units.
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Add units, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, units: u32) -> Option<Self> {
        self.0.checked_add(units).map(Self)
    }
}

impl From<NonZeroU32> for Quantity {
    fn from(units: NonZeroU32) -> Self {
        Self(units)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog item and how many units of it are in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    item: CatalogItem<'a>,
    quantity: Quantity,
}

impl<'a> CartLine<'a> {
    /// Create a new cart line.
    pub fn new(item: CatalogItem<'a>, quantity: Quantity) -> Self {
        Self { item, quantity }
    }

    /// Returns the catalog item
    pub fn item(&self) -> &CatalogItem<'a> {
        &self.item
    }

    /// Returns the quantity
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// Cart
///
/// Lines keep insertion order for display. Pricing does not depend on it.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart from existing lines. Lines for the same item are merged.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if a line's currency differs from the cart
    /// currency, or if merging lines overflows a quantity.
    pub fn with_lines(
        lines: impl IntoIterator<Item = CartLine<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Cart::new(currency);

        for line in lines {
            cart.add(line.item, line.quantity)?;
        }

        Ok(cart)
    }

    /// Add units of an item, merging into the existing line for the same id.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] or [`CartError::QuantityOverflow`].
    pub fn add(&mut self, item: CatalogItem<'a>, quantity: Quantity) -> Result<Quantity, CartError> {
        if item.currency() != self.currency {
            return Err(CartError::CurrencyMismatch(
                item.id().to_string(),
                item.currency().iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if let Some(line) = self.line_mut(item.id()) {
            line.quantity = line
                .quantity
                .checked_add(quantity.get())
                .ok_or_else(|| CartError::QuantityOverflow(item.id().to_string()))?;

            debug!(item = item.id(), quantity = line.quantity.get(), "cart line increased");

            return Ok(line.quantity);
        }

        debug!(item = item.id(), quantity = quantity.get(), "cart line added");

        self.lines.push(CartLine::new(item, quantity));

        Ok(quantity)
    }

    /// Add a single unit to an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] or [`CartError::QuantityOverflow`].
    pub fn increment(&mut self, id: &str) -> Result<Quantity, CartError> {
        let line = self
            .line_mut(id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?;

        line.quantity = line
            .quantity
            .checked_add(1)
            .ok_or_else(|| CartError::QuantityOverflow(id.to_string()))?;

        Ok(line.quantity)
    }

    /// Remove a single unit from a line. A line that would reach zero is
    /// removed and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line holds the item.
    pub fn decrement(&mut self, id: &str) -> Result<Option<Quantity>, CartError> {
        let remaining = self
            .line(id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?
            .quantity
            .get()
            .saturating_sub(1);

        self.set_quantity(id, remaining)
    }

    /// Set a line's quantity. Zero removes the line and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line holds the item.
    pub fn set_quantity(&mut self, id: &str, units: u32) -> Result<Option<Quantity>, CartError> {
        let Some(quantity) = Quantity::new(units) else {
            self.remove(id)?;

            return Ok(None);
        };

        let line = self
            .line_mut(id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?;

        line.quantity = quantity;

        Ok(Some(quantity))
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line holds the item.
    pub fn remove(&mut self, id: &str) -> Result<CartLine<'a>, CartError> {
        let position = self
            .lines
            .iter()
            .position(|line| line.item.id() == id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?;

        debug!(item = id, "cart line removed");

        Ok(self.lines.remove(position))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get the line holding an item.
    pub fn line(&self, id: &str) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.item.id() == id)
    }

    fn line_mut(&mut self, id: &str) -> Option<&mut CartLine<'a>> {
        self.lines.iter_mut().find(|line| line.item.id() == id)
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity.get()))
            .sum()
    }

    /// Iterate over the lines in the cart.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
