//! Fixtures
//!
//! YAML fixture sets laid out under a base directory:
//!
//! ```text
//! catalog/<name>.yml
//! carts/<name>.yml
//! policy/<name>.yml
//! promotions/<name>.yml
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError, CartLine, Quantity},
    catalog::{Catalog, CatalogError, CatalogItem},
    fixtures::{
        carts::CartFixture, catalog::CatalogFixture, policy::PolicyFixture,
        promotions::QuizUnlockFixture,
    },
    pricing::PricingPolicy,
    promotions::{PromotionError, QuizUnlock},
};

pub mod carts;
pub mod catalog;
pub mod policy;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid duration format
    #[error("Invalid duration format: {0}")]
    InvalidDuration(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A cart line had a zero quantity
    #[error("Cart line for {0} must have a positive quantity")]
    InvalidQuantity(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Catalog validation error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),

    /// Quiz unlock validation error
    #[error("Invalid quiz unlock: {0}")]
    Promotion(#[from] PromotionError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products loaded so far
    catalog: Catalog<'static>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            currency: None,
        }
    }

    /// Load a catalog fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?;

        Ok(fixture)
    }

    /// Base path fixture files are read from
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load products from `catalog/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CatalogFixture = self.read("catalog", name)?;

        for (id, product_fixture) in fixture.products {
            let item = product_fixture.into_item(id)?;
            let currency = item.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.catalog.insert(item)?;
        }

        debug!(set = name, products = self.catalog.len(), "loaded catalog");

        Ok(self)
    }

    /// Build a cart from `carts/<name>.yml` against the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, no catalog is
    /// loaded, or a line names an unknown product or a zero quantity.
    pub fn cart(&self, name: &str) -> Result<Cart<'static>, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;
        let fixture: CartFixture = self.read("carts", name)?;

        let lines = fixture
            .lines
            .into_iter()
            .map(|line| -> Result<CartLine<'static>, FixtureError> {
                let item = self.product(&line.product)?.clone();
                let quantity = Quantity::new(line.quantity)
                    .ok_or_else(|| FixtureError::InvalidQuantity(line.product.clone()))?;

                Ok(CartLine::new(item, quantity))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cart = Cart::with_lines(lines, currency)?;

        debug!(cart = name, lines = cart.len(), items = cart.total_items(), "loaded cart");

        Ok(cart)
    }

    /// Load a pricing policy from `policy/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a value is invalid.
    pub fn policy(&self, name: &str) -> Result<PricingPolicy, FixtureError> {
        let fixture: PolicyFixture = self.read("policy", name)?;

        fixture.into_policy()
    }

    /// Load a stored quiz unlock from `promotions/<name>.yml`
    ///
    /// When the fixture has no `expires_at`, the policy's quiz duration is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the window is invalid.
    pub fn quiz_unlock(
        &self,
        name: &str,
        policy: &PricingPolicy,
    ) -> Result<QuizUnlock, FixtureError> {
        let fixture: QuizUnlockFixture = self.read("promotions", name)?;

        fixture.into_unlock(policy)
    }

    /// Get a product by its id
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the loaded catalog.
    pub fn product(&self, id: &str) -> Result<&CatalogItem<'static>, FixtureError> {
        self.catalog
            .find(id)
            .ok_or_else(|| FixtureError::ProductNotFound(id.to_string()))
    }

    /// The loaded catalog
    pub fn catalog(&self) -> &Catalog<'static> {
        &self.catalog
    }

    /// Currency of the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    fn read<T: DeserializeOwned>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
