//! Receipt
//!
//! Text rendering of a cart for terminals and logs.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{cart::Cart, pricing::format_price};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The output could not be written.
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Write the cart as a table followed by its totals.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_cart(mut out: impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Item", "Category", "Unit Price", "Qty", "Subtotal"]);

    for (index, line) in cart.lines().iter().enumerate() {
        builder.push_record([
            (index + 1).to_string(),
            line.name().to_string(),
            line.category().to_string(),
            format_price(line.unit_price()),
            line.quantity().to_string(),
            format_price(line.subtotal()),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..6), Alignment::right());

    writeln!(out, "{table}")?;

    write_totals(&mut out, cart)?;

    Ok(())
}

fn write_totals(out: &mut impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    let items = cart.total_quantity().to_string();
    let total = format_price(cart.total_price());
    let width = items.len().max(total.len());

    writeln!(out, " Items: {items:>width$}")?;
    writeln!(out, " Total: {total:>width$}")?;

    let estimate = cart.estimated_preparation();

    writeln!(
        out,
        " Ready in {}-{} min",
        estimate.min_minutes, estimate.max_minutes
    )?;

    Ok(())
}
