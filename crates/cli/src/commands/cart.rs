//! Cart commands

use std::io::Write;

use clap::{Args, Subcommand};
use concierge::{
    cart::{CartStore, LineId},
    pricing::format_price,
    receipt::write_cart,
    storage::FileStorage,
};
use tracing::info;

use super::{Context, write_line, write_table};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    pub(crate) command: CartSubcommand,
}

/// Lines are addressed by line id or by the menu item id they hold.
#[derive(Debug, Subcommand)]
pub(crate) enum CartSubcommand {
    /// Print the cart
    Show,

    /// Add a menu item
    Add {
        /// Menu item id, e.g. borscht
        item_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Remove a line
    Remove {
        /// Line id or menu item id
        line: String,
    },

    /// Set a line's quantity; zero or below removes it
    #[command(allow_negative_numbers = true)]
    Set {
        /// Line id or menu item id
        line: String,

        /// New quantity
        quantity: i64,
    },

    /// Add one unit to a line
    Inc {
        /// Line id or menu item id
        line: String,
    },

    /// Take one unit off a line
    Dec {
        /// Line id or menu item id
        line: String,
    },

    /// Remove every line
    Clear,

    /// Totals per category and price statistics
    Summary,
}

pub(crate) fn run(command: CartCommand, context: &Context, out: &mut impl Write) -> Result<(), String> {
    let mut store = CartStore::with_key(context.storage.clone(), &context.cart_key);

    let _subscription = store.subscribe(|cart| {
        info!(
            lines = cart.len(),
            total_quantity = cart.total_quantity(),
            total_price = cart.total_price(),
            "Cart updated"
        );
    });

    match command.command {
        CartSubcommand::Show => {}
        CartSubcommand::Add { item_id, quantity } => {
            let item = context
                .catalogs
                .menu
                .item(&item_id)
                .ok_or_else(|| format!("no menu item with id '{item_id}'"))?;

            store
                .can_add_item(item, quantity)
                .and_then(|()| store.add_item(item, quantity))
                .map_err(|error| format!("cannot add {item_id}: {error}"))?;
        }
        CartSubcommand::Remove { line } => {
            let line_id = resolve_line(&store, &line)?;

            store.remove_item(&line_id);
        }
        CartSubcommand::Set { line, quantity } => {
            let line_id = resolve_line(&store, &line)?;

            store.update_item_quantity(&line_id, quantity);
        }
        CartSubcommand::Inc { line } => {
            let line_id = resolve_line(&store, &line)?;

            store.increment_item(&line_id);
        }
        CartSubcommand::Dec { line } => {
            let line_id = resolve_line(&store, &line)?;

            store.decrement_item(&line_id);
        }
        CartSubcommand::Clear => store.clear_cart(),
        CartSubcommand::Summary => return write_summary(out, &store),
    }

    write_cart(&mut *out, store.cart()).map_err(|error| error.to_string())
}

fn resolve_line(store: &CartStore<FileStorage>, line: &str) -> Result<LineId, String> {
    let line_id = LineId::from(line);

    if store.line(&line_id).is_some() {
        return Ok(line_id);
    }

    store
        .cart()
        .line_for_item(line)
        .map(|line| line.line_id().clone())
        .ok_or_else(|| format!("no cart line for '{line}'"))
}

fn write_summary(out: &mut impl Write, store: &CartStore<FileStorage>) -> Result<(), String> {
    let Some(analytics) = store.analytics() else {
        return write_line(out, "Cart is empty");
    };

    let summary = store.summary();

    write_table(
        out,
        ["Category", "Qty", "Subtotal"],
        summary
            .categories
            .iter()
            .map(|total| {
                [
                    total.category.clone(),
                    total.quantity.to_string(),
                    format_price(total.subtotal),
                ]
            })
            .collect(),
    )?;

    write_line(
        out,
        format!(
            " {} lines, {} items, {}",
            summary.line_count,
            summary.total_quantity,
            format_price(summary.total_price)
        ),
    )?;
    write_line(
        out,
        format!(
            " Average unit price: {}",
            format_price(analytics.average_unit_price)
        ),
    )?;
    write_line(
        out,
        format!(
            " Most expensive: {} ({})",
            analytics.most_expensive.name(),
            format_price(analytics.most_expensive.unit_price())
        ),
    )?;
    write_line(
        out,
        format!(
            " Cheapest: {} ({})",
            analytics.cheapest.name(),
            format_price(analytics.cheapest.unit_price())
        ),
    )?;

    let estimate = store.estimated_preparation();

    write_line(
        out,
        format!(
            " Ready in {}-{} min",
            estimate.min_minutes, estimate.max_minutes
        ),
    )
}
