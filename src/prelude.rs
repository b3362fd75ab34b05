//! Vitrine prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, Quantity},
    catalog::{Catalog, CatalogError, CatalogItem, CatalogKey},
    checkout::{CheckoutSummary, PaymentMethod},
    discounts::DiscountError,
    fixtures::{Fixture, FixtureError},
    pricing::{
        CartTotals, LineQuote, PricingError, PricingPolicy, apply_site_discount, cart_totals,
        checkout_pix_price, is_wholesale_eligible, line_total, unit_price,
    },
    promotions::{
        ProductPagePrice, PromotionError, PromotionState, QuizUnlock, advertised_price, countdown,
        describe_remaining, display_price_with_promotion, remaining,
    },
    receipt::{Receipt, ReceiptError, ReceiptRow},
};
