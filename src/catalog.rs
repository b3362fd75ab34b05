//! Catalog
//!
//! Catalog items are validated once, when they cross into the crate, so the
//! pricing functions never see a negative price or a mixed-currency item.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

new_key_type! {
    /// Catalog Key
    pub struct CatalogKey;
}

/// Errors raised while building catalog items or inserting them into a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The item id was empty.
    #[error("catalog item id must not be empty")]
    EmptyId,

    /// A price field was negative (item id, field name).
    #[error("item {0} has a negative {1}")]
    NegativePrice(String, &'static str),

    /// A price field uses a different currency from the base price (item id, expected, actual).
    #[error("item {0} mixes currencies: expected {1}, found {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// The discount badge was outside `0..=100` (item id, percent).
    #[error("item {0} has an invalid discount badge of {1}%")]
    InvalidDiscountPercent(String, u8),

    /// An item with the same id is already in the catalog.
    #[error("duplicate catalog item id: {0}")]
    DuplicateId(String),
}

/// A product as sold by the storefront.
///
/// Only `price` takes part in pricing. `old_price`, `pix_price` and
/// `discount_percent` are display fields carried through for the product page.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem<'a> {
    id: String,
    name: String,
    price: Money<'a, Currency>,
    old_price: Option<Money<'a, Currency>>,
    pix_price: Option<Money<'a, Currency>>,
    discount_percent: Option<u8>,
}

impl<'a> CatalogItem<'a> {
    /// Create a catalog item with a base price and no display extras.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyId`] for an empty id and
    /// [`CatalogError::NegativePrice`] for a negative price.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Result<Self, CatalogError> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(CatalogError::EmptyId);
        }

        if price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(id, "price"));
        }

        Ok(Self {
            id,
            name: name.into(),
            price,
            old_price: None,
            pix_price: None,
            discount_percent: None,
        })
    }

    /// Attach a strike-through reference price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is negative or in another currency.
    pub fn with_old_price(mut self, old_price: Money<'a, Currency>) -> Result<Self, CatalogError> {
        self.check_display_price(&old_price, "old price")?;
        self.old_price = Some(old_price);

        Ok(self)
    }

    /// Attach the informational instant-payment price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is negative or in another currency.
    pub fn with_pix_price(mut self, pix_price: Money<'a, Currency>) -> Result<Self, CatalogError> {
        self.check_display_price(&pix_price, "pix price")?;
        self.pix_price = Some(pix_price);

        Ok(self)
    }

    /// Attach the discount badge shown next to the price.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDiscountPercent`] if the badge exceeds 100.
    pub fn with_discount_percent(mut self, percent: u8) -> Result<Self, CatalogError> {
        if percent > 100 {
            return Err(CatalogError::InvalidDiscountPercent(self.id, percent));
        }

        self.discount_percent = Some(percent);

        Ok(self)
    }

    fn check_display_price(
        &self,
        price: &Money<'a, Currency>,
        field: &'static str,
    ) -> Result<(), CatalogError> {
        if price.currency() != self.price.currency() {
            return Err(CatalogError::CurrencyMismatch(
                self.id.clone(),
                self.price.currency().iso_alpha_code,
                price.currency().iso_alpha_code,
            ));
        }

        if price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(self.id.clone(), field));
        }

        Ok(())
    }

    /// Returns the item id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the strike-through reference price, if any
    pub fn old_price(&self) -> Option<&Money<'a, Currency>> {
        self.old_price.as_ref()
    }

    /// Returns the informational instant-payment price, if any
    pub fn pix_price(&self) -> Option<&Money<'a, Currency>> {
        self.pix_price.as_ref()
    }

    /// Returns the discount badge, if any
    pub fn discount_percent(&self) -> Option<u8> {
        self.discount_percent
    }

    /// Returns the currency of the item
    pub fn currency(&self) -> &'a Currency {
        self.price.currency()
    }
}

/// In-memory catalog store.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    items: SlotMap<CatalogKey, CatalogItem<'a>>,
    ids: FxHashMap<String, CatalogKey>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            ids: FxHashMap::default(),
        }
    }

    /// Insert an item, returning its key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if the id is already present.
    pub fn insert(&mut self, item: CatalogItem<'a>) -> Result<CatalogKey, CatalogError> {
        if self.ids.contains_key(item.id()) {
            return Err(CatalogError::DuplicateId(item.id().to_string()));
        }

        let id = item.id().to_string();
        let key = self.items.insert(item);

        self.ids.insert(id, key);

        Ok(key)
    }

    /// Get an item by key.
    pub fn get(&self, key: CatalogKey) -> Option<&CatalogItem<'a>> {
        self.items.get(key)
    }

    /// Find an item by its id.
    pub fn find(&self, id: &str) -> Option<&CatalogItem<'a>> {
        self.ids.get(id).and_then(|key| self.items.get(*key))
    }

    /// Iterate over the items in the catalog.
    pub fn iter(&self) -> impl Iterator<Item = (CatalogKey, &CatalogItem<'a>)> {
        self.items.iter()
    }

    /// Get the number of items in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{BRL, USD};
    use testresult::TestResult;

    use super::*;

    fn shampoo<'a>() -> Result<CatalogItem<'a>, CatalogError> {
        CatalogItem::new("shampoo-v-floc", "Shampoo V-Floc 1.5L", Money::from_minor(4_990, BRL))
    }

    #[test]
    fn new_item_exposes_fields() -> TestResult {
        let item = shampoo()?
            .with_old_price(Money::from_minor(5_990, BRL))?
            .with_pix_price(Money::from_minor(4_740, BRL))?
            .with_discount_percent(17)?;

        assert_eq!(item.id(), "shampoo-v-floc");
        assert_eq!(item.name(), "Shampoo V-Floc 1.5L");
        assert_eq!(item.price(), &Money::from_minor(4_990, BRL));
        assert_eq!(item.old_price(), Some(&Money::from_minor(5_990, BRL)));
        assert_eq!(item.pix_price(), Some(&Money::from_minor(4_740, BRL)));
        assert_eq!(item.discount_percent(), Some(17));
        assert_eq!(item.currency(), BRL);

        Ok(())
    }

    #[test]
    fn empty_id_is_rejected() {
        let result = CatalogItem::new("  ", "Nameless", Money::from_minor(100, BRL));

        assert_eq!(result, Err(CatalogError::EmptyId));
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = CatalogItem::new("wax", "Wax", Money::from_minor(-1, BRL));

        assert_eq!(
            result,
            Err(CatalogError::NegativePrice("wax".to_string(), "price"))
        );
    }

    #[test]
    fn display_price_in_other_currency_is_rejected() -> TestResult {
        let result = shampoo()?.with_old_price(Money::from_minor(5_990, USD));

        assert_eq!(
            result,
            Err(CatalogError::CurrencyMismatch(
                "shampoo-v-floc".to_string(),
                "BRL",
                "USD"
            ))
        );

        Ok(())
    }

    #[test]
    fn negative_pix_price_is_rejected() -> TestResult {
        let result = shampoo()?.with_pix_price(Money::from_minor(-10, BRL));

        assert_eq!(
            result,
            Err(CatalogError::NegativePrice(
                "shampoo-v-floc".to_string(),
                "pix price"
            ))
        );

        Ok(())
    }

    #[test]
    fn discount_badge_over_100_is_rejected() -> TestResult {
        let result = shampoo()?.with_discount_percent(101);

        assert_eq!(
            result,
            Err(CatalogError::InvalidDiscountPercent(
                "shampoo-v-floc".to_string(),
                101
            ))
        );

        Ok(())
    }

    #[test]
    fn catalog_insert_and_find() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.insert(shampoo()?)?;

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get(key).map(CatalogItem::id), Some("shampoo-v-floc"));
        assert_eq!(
            catalog.find("shampoo-v-floc").map(CatalogItem::name),
            Some("Shampoo V-Floc 1.5L")
        );
        assert!(catalog.find("missing").is_none());

        Ok(())
    }

    #[test]
    fn catalog_rejects_duplicate_ids() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.insert(shampoo()?)?;

        let result = catalog.insert(shampoo()?);

        assert_eq!(
            result,
            Err(CatalogError::DuplicateId("shampoo-v-floc".to_string()))
        );
        assert_eq!(catalog.len(), 1);

        Ok(())
    }
}
