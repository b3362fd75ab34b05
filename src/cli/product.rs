use std::{io, path::Path};

use clap::Args;
use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use tracing::info;
use vitrine::{
    fixtures::Fixture,
    pricing::PricingPolicy,
    promotions::{PromotionState, advertised_price, countdown, describe_remaining},
};

use super::CliError;

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Catalog fixture set
    #[arg(long)]
    set: String,

    /// Catalog product id
    #[arg(long)]
    id: String,

    /// Stored quiz unlock fixture
    #[arg(long)]
    promotion: Option<String>,

    /// Pricing policy fixture; the reference policy when omitted
    #[arg(long)]
    policy: Option<String>,

    /// Evaluate at this instant (RFC 3339) instead of the current time
    #[arg(long)]
    now: Option<Timestamp>,
}

pub(crate) fn run(
    args: ProductArgs,
    fixtures_dir: &Path,
    mut out: impl io::Write,
) -> Result<(), CliError> {
    let mut fixture = Fixture::with_base_path(fixtures_dir);
    fixture.load_catalog(&args.set)?;

    let policy = match args.policy.as_deref() {
        Some(name) => fixture.policy(name)?,
        None => PricingPolicy::default(),
    };

    let now = args.now.unwrap_or_else(Timestamp::now);
    let unlock = args
        .promotion
        .as_deref()
        .map(|name| fixture.quiz_unlock(name, &policy))
        .transpose()?;

    let promo = PromotionState::at(now, unlock.as_ref(), &policy);
    let item = fixture.product(&args.id)?;
    let page = advertised_price(item, &promo, &policy)?;

    info!(
        product = item.id(),
        quiz = promo.quiz_discount_active(),
        advertised = %page.advertised(),
        "priced product page"
    );

    writeln!(out, "{}", item.name())?;

    if let Some(old_price) = page.old_price {
        writeln!(out, "  Was:         {old_price}")?;
    }

    writeln!(out, "  List price:  {}", page.list_price)?;
    writeln!(out, "  Site price:  {}", page.site_price)?;

    if let Some(badge) = page.badge {
        writeln!(out, "  Badge:       {badge}% OFF")?;
    }

    if let Some(pix_price) = item.pix_price() {
        writeln!(out, "  PIX price:   {pix_price}")?;
    }

    match page.promotional_price {
        Some(quiz_price) => {
            let left = promo.remaining_at(now);

            writeln!(
                out,
                "  Quiz price:  {quiz_price} (-{}%)",
                percent_points(promo.discount_percent())
            )?;
            writeln!(
                out,
                "  Ends in:     {} ({})",
                countdown(left),
                describe_remaining(left)
            )?;
        }
        None if unlock.is_some() => writeln!(out, "  Quiz discount expired")?,
        None => {}
    }

    Ok(())
}

fn percent_points(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).normalize()
}
