//! Subcommands

use std::io::Write;

use clap::Subcommand;
use concierge::{
    catalog::CatalogError,
    fixtures::Catalogs,
    pricing::{CURRENCY, parse_price},
    storage::FileStorage,
};
use tabled::{
    Table,
    builder::Builder,
    settings::{Color, Style, object::Rows},
};

use crate::config::StorageConfig;

pub(crate) mod cart;
pub(crate) mod menu;
pub(crate) mod restaurants;
pub(crate) mod rooms;
pub(crate) mod spa;

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Browse the in-room dining menu
    Menu(menu::MenuCommand),

    /// Browse the hotel restaurants and bars
    Restaurants(restaurants::RestaurantsCommand),

    /// Browse room types
    Rooms(rooms::RoomsCommand),

    /// Browse spa services
    Spa(spa::SpaCommand),

    /// Manage the room-service cart
    Cart(cart::CartCommand),
}

/// What every command runs against.
#[derive(Debug)]
pub(crate) struct Context {
    pub(crate) catalogs: Catalogs,
    pub(crate) storage: FileStorage,
    pub(crate) cart_key: String,
}

impl Context {
    /// Load catalogs and open cart storage as configured.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog file fails to load.
    pub(crate) fn from_config(config: &StorageConfig) -> Result<Self, CatalogError> {
        let catalogs = match &config.catalog_dir {
            Some(dir) => Catalogs::from_dir(dir)?,
            None => Catalogs::bundled()?,
        };

        Ok(Self {
            catalogs,
            storage: FileStorage::new(&config.data_dir),
            cart_key: config.cart_key.clone(),
        })
    }
}

/// Run a command, writing its output to `out`.
///
/// # Errors
///
/// Returns a printable message if the command fails.
pub(crate) fn run(command: Command, context: &Context, out: &mut impl Write) -> Result<(), String> {
    match command {
        Command::Menu(command) => menu::run(command, &context.catalogs.menu, out),
        Command::Restaurants(command) => {
            restaurants::run(command, &context.catalogs.restaurants, out)
        }
        Command::Rooms(command) => rooms::run(command, &context.catalogs.rooms, out),
        Command::Spa(command) => spa::run(command, &context.catalogs.spa, out),
        Command::Cart(command) => cart::run(command, context, out),
    }
}

/// Parse a price given in major units of the catalog currency, e.g. `650`
/// or `649.50`.
pub(crate) fn parse_amount(s: &str) -> Result<u64, String> {
    parse_price(&format!("{} {}", s.trim(), CURRENCY.iso_alpha_code))
        .map_err(|error| error.to_string())
}

/// The current local hour of day.
pub(crate) fn current_hour() -> u8 {
    u8::try_from(jiff::Zoned::now().hour()).unwrap_or_default()
}

/// Build a rounded table with a bold header row.
pub(crate) fn table<const N: usize>(
    header: [&str; N],
    rows: impl IntoIterator<Item = [String; N]>,
) -> Table {
    let mut builder = Builder::default();

    builder.push_record(header);

    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Rows::first(), Color::BOLD);

    table
}

/// Write a table, or a short notice when there are no rows.
pub(crate) fn write_table<const N: usize>(
    out: &mut impl Write,
    header: [&str; N],
    rows: Vec<[String; N]>,
) -> Result<(), String> {
    if rows.is_empty() {
        return write_line(out, "Nothing found");
    }

    write_line(out, table(header, rows))
}

/// Write one line of output.
pub(crate) fn write_line(out: &mut impl Write, line: impl std::fmt::Display) -> Result<(), String> {
    writeln!(out, "{line}").map_err(|error| format!("failed to write output: {error}"))
}

/// A comma-separated list, or `-` when empty.
pub(crate) fn join(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}
