//! Room commands

use std::io::Write;

use clap::{Args, Subcommand};
use concierge::{
    catalog::{Catalog, rooms::Room},
    pricing::format_price,
};

use super::{join, parse_amount, write_line, write_table};

#[derive(Debug, Args)]
pub(crate) struct RoomsCommand {
    #[command(subcommand)]
    pub(crate) command: RoomsSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum RoomsSubcommand {
    /// List room types, optionally filtered
    List(ListArgs),

    /// Search names, descriptions, categories and features
    Search {
        /// Text to look for
        query: String,
    },

    /// Show one room type in full
    Show {
        /// Room id, e.g. room-classic
        id: String,
    },
}

#[derive(Debug, Default, Args)]
pub(crate) struct ListArgs {
    /// Party size the room must accept
    #[arg(long)]
    guests: Option<u32>,

    /// Feature, e.g. "city view"
    #[arg(long)]
    feature: Option<String>,

    /// Amenity, e.g. "bathtub"
    #[arg(long)]
    amenity: Option<String>,

    /// Lowest nightly rate in roubles
    #[arg(long, value_parser = parse_amount)]
    min_price: Option<u64>,

    /// Highest nightly rate in roubles
    #[arg(long, value_parser = parse_amount)]
    max_price: Option<u64>,
}

pub(crate) fn run(
    command: RoomsCommand,
    rooms: &Catalog<Room>,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        RoomsSubcommand::List(args) => {
            let mut matches = rooms.iter().collect::<Vec<_>>();

            if let Some(guests) = args.guests {
                let for_guests = rooms.for_guests(guests);
                matches.retain(|room| for_guests.contains(room));
            }

            if let Some(feature) = &args.feature {
                let by_feature = rooms.by_feature(feature);
                matches.retain(|room| by_feature.contains(room));
            }

            if let Some(amenity) = &args.amenity {
                let by_amenity = rooms.by_amenity(amenity);
                matches.retain(|room| by_amenity.contains(room));
            }

            if args.min_price.is_some() || args.max_price.is_some() {
                let by_price = rooms.by_price_range(
                    args.min_price.unwrap_or(0),
                    args.max_price.unwrap_or(u64::MAX),
                );
                matches.retain(|room| by_price.contains(room));
            }

            write_rooms(out, &matches)
        }
        RoomsSubcommand::Search { query } => write_rooms(out, &rooms.search(&query)),
        RoomsSubcommand::Show { id } => {
            let room = rooms
                .get(&id)
                .ok_or_else(|| format!("no room with id '{id}'"))?;

            write_line(out, &room.name)?;
            write_line(out, format!("  {}", room.description))?;
            write_line(out, format!("  Category:  {}", room.category))?;
            write_line(out, format!("  Capacity:  {}", room.capacity))?;
            write_line(out, format!("  Per night: {}", rate(room)))?;
            write_line(out, format!("  Amenities: {}", join(&room.amenities)))?;
            write_line(out, format!("  Features:  {}", join(&room.features)))
        }
    }
}

fn rate(room: &Room) -> String {
    let range = room.price_range;

    if range.min == range.max {
        format_price(range.min)
    } else {
        format!("{} - {}", format_price(range.min), format_price(range.max))
    }
}

fn write_rooms(out: &mut impl Write, rooms: &[&Room]) -> Result<(), String> {
    write_table(
        out,
        ["ID", "Name", "Category", "Guests", "Per night", "Features"],
        rooms
            .iter()
            .map(|room| {
                [
                    room.id.clone(),
                    room.name.clone(),
                    room.category.clone(),
                    room.max_guests.to_string(),
                    rate(room),
                    join(&room.features),
                ]
            })
            .collect(),
    )
}
