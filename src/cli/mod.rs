use std::{io, path::Path};

use clap::Subcommand;
use thiserror::Error;
use vitrine::{
    fixtures::FixtureError, pricing::PricingError, promotions::PromotionError,
    receipt::ReceiptError,
};

mod product;
mod quote;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Promotion(#[from] PromotionError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Price a cart fixture and print the receipt
    Quote(quote::QuoteArgs),

    /// Show the product page prices for one catalog item
    Product(product::ProductArgs),
}

impl Command {
    pub(crate) fn run(self, fixtures_dir: &Path, out: impl io::Write) -> Result<(), CliError> {
        match self {
            Command::Quote(args) => quote::run(args, fixtures_dir, out),
            Command::Product(args) => product::run(args, fixtures_dir, out),
        }
    }
}
