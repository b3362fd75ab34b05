//! Receipt

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, Quantity},
    checkout::{CheckoutSummary, PaymentMethod},
    pricing::CartTotals,
};

/// Errors that can occur when building or writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The totals were computed for a different cart (cart lines, quoted lines).
    #[error("cart has {0} lines but totals quote {1}")]
    LineMismatch(usize, usize),

    /// IO error
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRow<'a> {
    /// Display name of the item.
    pub name: String,

    /// Units on the line.
    pub quantity: Quantity,

    /// Catalog base price.
    pub list_price: Money<'a, Currency>,

    /// Price after the site-wide markdown and cap.
    pub site_price: Money<'a, Currency>,

    /// Chargeable unit price.
    pub unit_price: Money<'a, Currency>,

    /// Line total.
    pub line_total: Money<'a, Currency>,

    /// Whether the wholesale discount applied.
    pub wholesale: bool,
}

/// A priced cart ready to print.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    rows: Vec<ReceiptRow<'a>>,
    summary: CheckoutSummary<'a>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a cart, its totals and the checkout summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::LineMismatch`] if `totals` were not computed for `cart`.
    pub fn new(
        cart: &Cart<'a>,
        totals: &CartTotals<'a>,
        summary: CheckoutSummary<'a>,
    ) -> Result<Self, ReceiptError> {
        if cart.len() != totals.lines.len() {
            return Err(ReceiptError::LineMismatch(cart.len(), totals.lines.len()));
        }

        let rows = cart
            .iter()
            .zip(&totals.lines)
            .map(|(line, quote)| ReceiptRow {
                name: line.item().name().to_string(),
                quantity: quote.quantity,
                list_price: *line.item().price(),
                site_price: quote.site_price,
                unit_price: quote.unit_price,
                line_total: quote.line_total,
                wholesale: quote.wholesale,
            })
            .collect();

        Ok(Self { rows, summary })
    }

    /// Rendered lines, in cart order.
    pub fn rows(&self) -> &[ReceiptRow<'a>] {
        &self.rows
    }

    /// Checkout amounts.
    pub fn summary(&self) -> &CheckoutSummary<'a> {
        &self.summary
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record([
            "", "Item", "Qty", "List Price", "Site Price", "Unit Price", "Line Total",
        ]);

        for (idx, row) in self.rows.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                row.name.clone(),
                row.quantity.to_string(),
                format!("{}", row.list_price),
                format!("{}", row.site_price),
                format!("{}", row.unit_price),
                format!("{}", row.line_total),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..), Alignment::right());
        table.modify(Columns::new(3..4), color_dark_grey());

        for (idx, row) in self.rows.iter().enumerate() {
            if row.wholesale {
                table.modify((idx + 1, 5), color_green());
            }
        }

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let summary = &self.summary;

        let mut lines = vec![
            (" Items:".to_string(), format!("{}  ", summary.total_items)),
            (" Subtotal:".to_string(), format!("{}  ", summary.subtotal)),
            (
                " Wholesale savings:".to_string(),
                format!("{}  ", summary.wholesale_savings),
            ),
        ];

        if summary.method == PaymentMethod::Pix {
            lines.push((" PIX discount:".to_string(), format!("{}  ", summary.pix_discount)));
        }

        lines.push((
            format!(" \x1b[1mTotal ({}):\x1b[0m", summary.method),
            format!("\x1b[1m{}\x1b[0m  ", summary.total),
        ));

        let label_width = lines
            .iter()
            .map(|(label, _)| visible_width(label))
            .max()
            .unwrap_or_default();

        let value_width = lines
            .iter()
            .map(|(_, value)| visible_width(value))
            .max()
            .unwrap_or_default();

        for (label, value) in &lines {
            write_summary_line(out, label, value, label_width, value_width)?;
        }

        writeln!(out)?;

        Ok(())
    }
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )?;

    Ok(())
}

/// Width of a string once ANSI escapes are stripped.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

fn color_green() -> Color {
    Color::new("\x1b[32m", "\x1b[0m")
}
