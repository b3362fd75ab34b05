//! Pricing Policy Fixtures

use jiff::SignedDuration;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, catalog::parse_percentage},
    pricing::PricingPolicy,
};

/// Pricing policy fixture from YAML.
///
/// Omitted fields keep the reference deployment values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyFixture {
    /// Site-wide markdown (e.g., "20%")
    #[serde(default)]
    pub site_discount: Option<String>,

    /// Unit price cap in major units (e.g., "399.90")
    #[serde(default)]
    pub price_cap: Option<String>,

    /// Wholesale threshold in units
    #[serde(default)]
    pub wholesale_threshold: Option<u64>,

    /// Wholesale discount (e.g., "20%")
    #[serde(default)]
    pub wholesale_discount: Option<String>,

    /// PIX discount (e.g., "5%")
    #[serde(default)]
    pub pix_discount: Option<String>,

    /// Quiz discount (e.g., "40%")
    #[serde(default)]
    pub quiz_discount: Option<String>,

    /// Quiz duration (e.g., "24h" or "PT24H")
    #[serde(default)]
    pub quiz_duration: Option<String>,
}

impl PolicyFixture {
    /// Convert into a pricing policy.
    ///
    /// # Errors
    ///
    /// Returns an error if any value cannot be parsed.
    pub fn into_policy(self) -> Result<PricingPolicy, FixtureError> {
        let mut policy = PricingPolicy::default();

        if let Some(site_discount) = self.site_discount {
            policy.site_discount = parse_percentage(&site_discount)?;
        }

        if let Some(price_cap) = self.price_cap {
            policy.price_cap = price_cap
                .trim()
                .parse::<Decimal>()
                .ok()
                .filter(|cap| !cap.is_sign_negative())
                .ok_or(FixtureError::InvalidPrice(price_cap))?;
        }

        if let Some(threshold) = self.wholesale_threshold {
            policy.wholesale_threshold = threshold;
        }

        if let Some(wholesale_discount) = self.wholesale_discount {
            policy.wholesale_discount = parse_percentage(&wholesale_discount)?;
        }

        if let Some(pix_discount) = self.pix_discount {
            policy.pix_discount = parse_percentage(&pix_discount)?;
        }

        if let Some(quiz_discount) = self.quiz_discount {
            policy.quiz_discount = parse_percentage(&quiz_discount)?;
        }

        if let Some(quiz_duration) = self.quiz_duration {
            policy.quiz_duration = quiz_duration
                .trim()
                .parse::<SignedDuration>()
                .ok()
                .filter(|duration| duration.is_positive())
                .ok_or(FixtureError::InvalidDuration(quiz_duration))?;
        }

        Ok(policy)
    }
}
