//! Promotions
//!
//! The quiz promotion and the product page price path.
//!
//! A completed quiz is stored by the caller as a [`QuizUnlock`]. Whenever a
//! price is needed the caller builds a [`PromotionState`] snapshot from the
//! unlock and the current time; nothing here reads the clock or schedules
//! anything, so an unlock that expired while the tab was closed is simply
//! inactive the next time a snapshot is taken.
//!
//! The product page path (site price, then quiz discount) is deliberately
//! separate from the cart path in [`crate::pricing`]; the two never compose.

use std::time::Duration;

use decimal_percentage::Percentage;
use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::{SignedDuration, Timestamp};
use rusty_money::{Money, iso::Currency};
use serde::Serialize;
use thiserror::Error;

use crate::{
    catalog::CatalogItem,
    discounts::minor_after_percent_off,
    pricing::{PricingError, PricingPolicy},
};

/// Errors raised while recording a quiz unlock.
#[derive(Debug, Error)]
pub enum PromotionError {
    /// The unlock window is empty or reversed (unlocked at, expires at).
    #[error("quiz unlock at {0} must expire after it starts, not at {1}")]
    InvalidWindow(Timestamp, Timestamp),

    /// The promotion duration was zero or negative.
    #[error("quiz promotion duration must be positive, got {0}")]
    InvalidDuration(SignedDuration),

    /// The expiry could not be represented.
    #[error(transparent)]
    Time(#[from] jiff::Error),
}

/// A stored quiz completion and when its discount lapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizUnlock {
    unlocked_at: Timestamp,
    expires_at: Timestamp,
}

impl QuizUnlock {
    /// Create an unlock from stored timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::InvalidWindow`] unless `expires_at` is after `unlocked_at`.
    pub fn new(unlocked_at: Timestamp, expires_at: Timestamp) -> Result<Self, PromotionError> {
        if expires_at <= unlocked_at {
            return Err(PromotionError::InvalidWindow(unlocked_at, expires_at));
        }

        Ok(Self {
            unlocked_at,
            expires_at,
        })
    }

    /// Create an unlock starting now and lasting `duration`.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive duration or an unrepresentable expiry.
    pub fn starting_at(now: Timestamp, duration: SignedDuration) -> Result<Self, PromotionError> {
        if !duration.is_positive() {
            return Err(PromotionError::InvalidDuration(duration));
        }

        let expires_at = now.checked_add(duration)?;

        Self::new(now, expires_at)
    }

    /// When the quiz was completed.
    pub fn unlocked_at(&self) -> Timestamp {
        self.unlocked_at
    }

    /// When the discount lapses.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Whether the discount applies at `now`: from the unlock up to, but not
    /// including, the expiry.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.unlocked_at <= now && now < self.expires_at
    }

    /// Time left at `now`, zero once expired.
    pub fn remaining_at(&self, now: Timestamp) -> Duration {
        remaining(now, self.expires_at)
    }
}

/// Snapshot of the promotions in force when a price is rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromotionState {
    site_wide_discount_active: bool,
    quiz_discount_active: bool,
    discount_percent: Percentage,
    expires_at: Option<Timestamp>,
}

impl PromotionState {
    /// Site-wide markdown only.
    pub fn inactive(policy: &PricingPolicy) -> Self {
        Self {
            site_wide_discount_active: true,
            quiz_discount_active: false,
            discount_percent: policy.quiz_discount,
            expires_at: None,
        }
    }

    /// Snapshot at `now` for a visitor with an optional stored unlock.
    pub fn at(now: Timestamp, unlock: Option<&QuizUnlock>, policy: &PricingPolicy) -> Self {
        let active = unlock.filter(|unlock| unlock.is_active_at(now));

        Self {
            quiz_discount_active: active.is_some(),
            expires_at: active.map(QuizUnlock::expires_at),
            ..Self::inactive(policy)
        }
    }

    /// Override the site-wide flag.
    #[must_use]
    pub fn with_site_wide_discount(mut self, active: bool) -> Self {
        self.site_wide_discount_active = active;
        self
    }

    /// Whether the permanent site-wide markdown is on.
    pub fn site_wide_discount_active(&self) -> bool {
        self.site_wide_discount_active
    }

    /// Whether the quiz discount applies.
    pub fn quiz_discount_active(&self) -> bool {
        self.quiz_discount_active
    }

    /// The quiz discount.
    pub fn discount_percent(&self) -> Percentage {
        self.discount_percent
    }

    /// Expiry of the active quiz discount.
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    /// Time left on the quiz discount at `now`.
    pub fn remaining_at(&self, now: Timestamp) -> Duration {
        self.expires_at
            .map_or(Duration::ZERO, |expires_at| remaining(now, expires_at))
    }
}

/// Prices shown on a product detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPagePrice<'a> {
    /// Catalog base price.
    pub list_price: Money<'a, Currency>,

    /// Strike-through reference price from the catalog.
    pub old_price: Option<Money<'a, Currency>>,

    /// Price after the site-wide markdown and cap.
    pub site_price: Money<'a, Currency>,

    /// Price after the quiz discount, when it is active.
    pub promotional_price: Option<Money<'a, Currency>>,

    /// Catalog discount badge.
    pub badge: Option<u8>,
}

impl<'a> ProductPagePrice<'a> {
    /// The price the page advertises.
    pub fn advertised(&self) -> Money<'a, Currency> {
        self.promotional_price.unwrap_or(self.site_price)
    }
}

/// Apply the quiz discount to a price that already carries the site-wide markdown.
///
/// Expiry is not checked here; it was checked when the snapshot was built.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn display_price_with_promotion<'a>(
    price_after_site_discount: &Money<'a, Currency>,
    promo: &PromotionState,
) -> Result<Money<'a, Currency>, PricingError> {
    if !promo.quiz_discount_active {
        return Ok(*price_after_site_discount);
    }

    let minor = minor_after_percent_off(
        &promo.discount_percent,
        price_after_site_discount.to_minor_units(),
    )?;

    Ok(Money::from_minor(minor, price_after_site_discount.currency()))
}

/// Prices for a product detail page.
///
/// # Errors
///
/// Returns an error if the arithmetic overflows.
pub fn advertised_price<'a>(
    item: &CatalogItem<'a>,
    promo: &PromotionState,
    policy: &PricingPolicy,
) -> Result<ProductPagePrice<'a>, PricingError> {
    let site_price = if promo.site_wide_discount_active {
        policy.apply_site_discount(item.price())?
    } else {
        *item.price()
    };

    let promotional_price = if promo.quiz_discount_active {
        Some(display_price_with_promotion(&site_price, promo)?)
    } else {
        None
    };

    Ok(ProductPagePrice {
        list_price: *item.price(),
        old_price: item.old_price().copied(),
        site_price,
        promotional_price,
        badge: item.discount_percent(),
    })
}

/// Time from `now` until `expires_at`, saturating at zero.
pub fn remaining(now: Timestamp, expires_at: Timestamp) -> Duration {
    Duration::try_from(now.duration_until(expires_at)).unwrap_or(Duration::ZERO)
}

/// Clock-style countdown, e.g. `23:59:59`.
pub fn countdown(remaining: Duration) -> String {
    let seconds = remaining.as_secs();

    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3_600,
        (seconds % 3_600) / 60,
        seconds % 60
    )
}

/// Human readable time left, e.g. for log lines.
pub fn describe_remaining(remaining: Duration) -> String {
    if remaining.is_zero() {
        return "expired".to_string();
    }

    format!("{}", remaining.human(Truncate::Second))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::BRL;
    use testresult::TestResult;

    use super::*;

    fn at(s: &str) -> Result<Timestamp, jiff::Error> {
        s.parse()
    }

    fn wax<'a>() -> Result<CatalogItem<'a>, crate::catalog::CatalogError> {
        CatalogItem::new("carnauba-wax", "Carnauba Wax", Money::from_minor(20_000, BRL))?
            .with_old_price(Money::from_minor(25_000, BRL))?
            .with_discount_percent(20)
    }

    #[test]
    fn starting_at_uses_duration() -> TestResult {
        let now = at("2026-03-01T12:00:00Z")?;
        let unlock = QuizUnlock::starting_at(now, SignedDuration::from_hours(24))?;

        assert_eq!(unlock.unlocked_at(), now);
        assert_eq!(unlock.expires_at(), at("2026-03-02T12:00:00Z")?);

        Ok(())
    }

    #[test]
    fn starting_at_rejects_non_positive_duration() -> TestResult {
        let now = at("2026-03-01T12:00:00Z")?;

        assert!(matches!(
            QuizUnlock::starting_at(now, SignedDuration::ZERO),
            Err(PromotionError::InvalidDuration(_))
        ));

        Ok(())
    }

    #[test]
    fn new_rejects_reversed_window() -> TestResult {
        let start = at("2026-03-01T12:00:00Z")?;
        let end = at("2026-03-01T11:00:00Z")?;

        assert!(matches!(
            QuizUnlock::new(start, end),
            Err(PromotionError::InvalidWindow(_, _))
        ));

        Ok(())
    }

    #[test]
    fn unlock_expires_exactly_at_expiry() -> TestResult {
        let unlock = QuizUnlock::starting_at(
            at("2026-03-01T12:00:00Z")?,
            SignedDuration::from_hours(24),
        )?;

        assert!(unlock.is_active_at(at("2026-03-02T11:59:59Z")?));
        assert!(!unlock.is_active_at(at("2026-03-02T12:00:00Z")?));

        Ok(())
    }

    #[test]
    fn unlock_is_inactive_before_it_starts() -> TestResult {
        let policy = PricingPolicy::default();
        let unlock = QuizUnlock::starting_at(at("2026-03-01T12:00:00Z")?, policy.quiz_duration)?;

        assert!(!unlock.is_active_at(at("2026-03-01T11:59:59Z")?));
        assert!(unlock.is_active_at(at("2026-03-01T12:00:00Z")?));

        let early = PromotionState::at(at("2026-03-01T11:00:00Z")?, Some(&unlock), &policy);

        assert!(!early.quiz_discount_active());
        assert_eq!(early.expires_at(), None);

        Ok(())
    }

    #[test]
    fn snapshot_reflects_expiry() -> TestResult {
        let policy = PricingPolicy::default();
        let unlock = QuizUnlock::starting_at(
            at("2026-03-01T12:00:00Z")?,
            policy.quiz_duration,
        )?;

        let during = PromotionState::at(at("2026-03-01T18:00:00Z")?, Some(&unlock), &policy);
        let after = PromotionState::at(at("2026-03-03T00:00:00Z")?, Some(&unlock), &policy);
        let never = PromotionState::at(at("2026-03-01T18:00:00Z")?, None, &policy);

        assert!(during.quiz_discount_active());
        assert_eq!(during.expires_at(), Some(unlock.expires_at()));
        assert!(!after.quiz_discount_active());
        assert_eq!(after.expires_at(), None);
        assert!(!never.quiz_discount_active());
        assert!(never.site_wide_discount_active());

        Ok(())
    }

    #[test]
    fn display_price_applies_quiz_discount_only_when_active() -> TestResult {
        let policy = PricingPolicy::default();
        let unlock = QuizUnlock::starting_at(at("2026-03-01T12:00:00Z")?, policy.quiz_duration)?;
        let active = PromotionState::at(at("2026-03-01T13:00:00Z")?, Some(&unlock), &policy);
        let inactive = PromotionState::inactive(&policy);
        let site_price = Money::from_minor(16_000, BRL);

        assert_eq!(
            display_price_with_promotion(&site_price, &active)?,
            Money::from_minor(9_600, BRL)
        );
        assert_eq!(
            display_price_with_promotion(&site_price, &inactive)?,
            site_price
        );

        Ok(())
    }

    #[test]
    fn advertised_price_stacks_quiz_on_site_price() -> TestResult {
        let policy = PricingPolicy::default();
        let unlock = QuizUnlock::starting_at(at("2026-03-01T12:00:00Z")?, policy.quiz_duration)?;
        let promo = PromotionState::at(at("2026-03-01T13:00:00Z")?, Some(&unlock), &policy);

        let page = advertised_price(&wax()?, &promo, &policy)?;

        assert_eq!(page.list_price, Money::from_minor(20_000, BRL));
        assert_eq!(page.old_price, Some(Money::from_minor(25_000, BRL)));
        assert_eq!(page.site_price, Money::from_minor(16_000, BRL));
        assert_eq!(page.promotional_price, Some(Money::from_minor(9_600, BRL)));
        assert_eq!(page.badge, Some(20));
        assert_eq!(page.advertised(), Money::from_minor(9_600, BRL));

        Ok(())
    }

    #[test]
    fn advertised_price_without_quiz_is_site_price() -> TestResult {
        let policy = PricingPolicy::default();
        let page = advertised_price(&wax()?, &PromotionState::inactive(&policy), &policy)?;

        assert_eq!(page.promotional_price, None);
        assert_eq!(page.advertised(), Money::from_minor(16_000, BRL));

        Ok(())
    }

    #[test]
    fn advertised_price_without_site_discount_uses_list_price() -> TestResult {
        let policy = PricingPolicy::default();
        let promo = PromotionState::inactive(&policy).with_site_wide_discount(false);

        let page = advertised_price(&wax()?, &promo, &policy)?;

        assert_eq!(page.advertised(), Money::from_minor(20_000, BRL));

        Ok(())
    }

    #[test]
    fn remaining_saturates_at_zero() -> TestResult {
        let expires_at = at("2026-03-02T12:00:00Z")?;

        assert_eq!(
            remaining(at("2026-03-02T11:00:00Z")?, expires_at),
            Duration::from_secs(3_600)
        );
        assert_eq!(remaining(at("2026-03-02T13:00:00Z")?, expires_at), Duration::ZERO);

        Ok(())
    }

    #[test]
    fn snapshot_remaining_is_zero_without_unlock() -> TestResult {
        let promo = PromotionState::inactive(&PricingPolicy::default());

        assert_eq!(promo.remaining_at(at("2026-03-02T11:00:00Z")?), Duration::ZERO);

        Ok(())
    }

    #[test]
    fn countdown_formats_hours_minutes_seconds() {
        assert_eq!(countdown(Duration::from_secs(86_400)), "24:00:00");
        assert_eq!(countdown(Duration::from_secs(3_725)), "01:02:05");
        assert_eq!(countdown(Duration::ZERO), "00:00:00");
    }

    #[test]
    fn describe_remaining_reports_expiry() {
        assert_eq!(describe_remaining(Duration::ZERO), "expired");
        assert!(!describe_remaining(Duration::from_secs(90)).is_empty());
    }
}
