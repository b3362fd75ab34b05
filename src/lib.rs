//! Vitrine
//!
//! Vitrine is the pricing engine of an automotive detailing storefront: site-wide markdowns with a
//! unit price cap, quantity-tier wholesale pricing, the PIX instant-payment incentive and a
//! time-limited quiz promotion on product pages.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discounts;
pub mod fixtures;
pub mod prelude;
pub mod pricing;
pub mod promotions;
pub mod receipt;
