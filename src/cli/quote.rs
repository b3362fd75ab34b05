use std::{io, path::Path};

use clap::{Args, ValueEnum};
use tracing::info;
use vitrine::{
    checkout::{CheckoutSummary, PaymentMethod},
    fixtures::Fixture,
    pricing::PricingPolicy,
    receipt::Receipt,
};

use super::CliError;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum Payment {
    /// PIX instant payment
    Pix,

    /// Credit card
    Card,
}

impl From<Payment> for PaymentMethod {
    fn from(payment: Payment) -> Self {
        match payment {
            Payment::Pix => PaymentMethod::Pix,
            Payment::Card => PaymentMethod::Card,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Catalog fixture set
    #[arg(long)]
    set: String,

    /// Cart fixture; defaults to the set name
    #[arg(long)]
    cart: Option<String>,

    /// Pricing policy fixture; the reference policy when omitted
    #[arg(long)]
    policy: Option<String>,

    /// Payment method
    #[arg(long, value_enum, default_value_t = Payment::Pix)]
    payment: Payment,
}

pub(crate) fn run(args: QuoteArgs, fixtures_dir: &Path, out: impl io::Write) -> Result<(), CliError> {
    let mut fixture = Fixture::with_base_path(fixtures_dir);
    fixture.load_catalog(&args.set)?;

    let cart_name = args.cart.as_deref().unwrap_or(&args.set);
    let cart = fixture.cart(cart_name)?;

    let policy = match args.policy.as_deref() {
        Some(name) => fixture.policy(name)?,
        None => PricingPolicy::default(),
    };

    let totals = policy.cart_totals(&cart)?;
    let summary = CheckoutSummary::for_cart(&totals, args.payment.into(), &policy)?;

    info!(
        cart = cart_name,
        items = summary.total_items,
        method = %summary.method,
        total = %summary.total,
        "quoted cart"
    );

    Receipt::new(&cart, &totals, summary)?.write_to(out)?;

    Ok(())
}
