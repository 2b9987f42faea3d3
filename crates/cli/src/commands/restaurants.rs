//! Restaurant commands

use std::io::Write;

use clap::{Args, Subcommand};
use concierge::{
    catalog::{Catalog, restaurants::Restaurant},
    pricing::format_price,
};

use super::{current_hour, join, parse_amount, write_line, write_table};

#[derive(Debug, Args)]
pub(crate) struct RestaurantsCommand {
    #[command(subcommand)]
    pub(crate) command: RestaurantsSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum RestaurantsSubcommand {
    /// List restaurants, optionally filtered
    List(ListArgs),

    /// Search names, descriptions, cuisines and features
    Search {
        /// Text to look for
        query: String,
    },

    /// Signature and premium venues first
    Featured {
        /// Maximum number of venues
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },

    /// Every cuisine on offer
    Cuisines,

    /// Restaurant counts per average-bill bracket
    Prices,

    /// Venues open at the given hour
    Open {
        /// Hour of day (0-23); defaults to now
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..24))]
        hour: Option<u8>,
    },
}

#[derive(Debug, Default, Args)]
pub(crate) struct ListArgs {
    /// Cuisine, e.g. "Italian"
    #[arg(long)]
    cuisine: Option<String>,

    /// Feature, e.g. "terrace"
    #[arg(long)]
    feature: Option<String>,

    /// Lowest average bill in roubles
    #[arg(long, value_parser = parse_amount)]
    min_price: Option<u64>,

    /// Highest average bill in roubles
    #[arg(long, value_parser = parse_amount)]
    max_price: Option<u64>,
}

pub(crate) fn run(
    command: RestaurantsCommand,
    restaurants: &Catalog<Restaurant>,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        RestaurantsSubcommand::List(args) => {
            let mut matches = restaurants.iter().collect::<Vec<_>>();

            if let Some(cuisine) = &args.cuisine {
                let by_cuisine = restaurants.by_cuisine(cuisine);
                matches.retain(|restaurant| by_cuisine.contains(restaurant));
            }

            if let Some(feature) = &args.feature {
                let by_feature = restaurants.by_feature(feature);
                matches.retain(|restaurant| by_feature.contains(restaurant));
            }

            if args.min_price.is_some() || args.max_price.is_some() {
                let by_price = restaurants.by_price_range(
                    args.min_price.unwrap_or(0),
                    args.max_price.unwrap_or(u64::MAX),
                );
                matches.retain(|restaurant| by_price.contains(restaurant));
            }

            write_restaurants(out, &matches)
        }
        RestaurantsSubcommand::Search { query } => {
            write_restaurants(out, &restaurants.search(&query))
        }
        RestaurantsSubcommand::Featured { limit } => {
            write_restaurants(out, &restaurants.featured(limit))
        }
        RestaurantsSubcommand::Cuisines => {
            for cuisine in restaurants.cuisine_types() {
                write_line(out, cuisine)?;
            }

            Ok(())
        }
        RestaurantsSubcommand::Prices => write_table(
            out,
            ["From", "Below", "Restaurants"],
            restaurants
                .price_buckets()
                .into_iter()
                .map(|bucket| {
                    [
                        format_price(bucket.min),
                        bucket.max.map_or_else(|| "-".to_string(), format_price),
                        bucket.count.to_string(),
                    ]
                })
                .collect(),
        ),
        RestaurantsSubcommand::Open { hour } => {
            let hour = hour.unwrap_or_else(current_hour);
            let open = restaurants.filter(|restaurant| restaurants.is_open_at(&restaurant.id, hour));

            write_line(out, format!("Open at {hour:02}:00"))?;
            write_restaurants(out, &open)
        }
    }
}

fn write_restaurants(out: &mut impl Write, restaurants: &[&Restaurant]) -> Result<(), String> {
    write_table(
        out,
        ["ID", "Name", "Cuisine", "Average bill", "Hours", "Features"],
        restaurants
            .iter()
            .map(|restaurant| {
                [
                    restaurant.id.clone(),
                    restaurant.name.clone(),
                    restaurant.cuisine.clone(),
                    restaurant
                        .average_price
                        .map_or_else(|| "-".to_string(), format_price),
                    restaurant.hours.clone(),
                    join(&restaurant.features),
                ]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::commands::test_helpers::{context, output};

    use super::*;

    fn run_restaurants(command: RestaurantsSubcommand) -> TestResult<String> {
        let (context, _dir) = context()?;
        let mut out = Vec::new();

        run(
            RestaurantsCommand { command },
            &context.catalogs.restaurants,
            &mut out,
        )?;

        output(out)
    }

    #[test]
    fn list_combines_filters() -> TestResult {
        let text = run_restaurants(RestaurantsSubcommand::List(ListArgs {
            cuisine: Some("russian".to_string()),
            max_price: Some(300_000),
            ..ListArgs::default()
        }))?;

        assert!(text.contains("Atrium"));
        assert!(!text.contains("Panorama"));
        assert!(!text.contains("Sakura"));

        Ok(())
    }

    #[test]
    fn featured_puts_signature_venues_first() -> TestResult {
        let text = run_restaurants(RestaurantsSubcommand::Featured { limit: 1 })?;

        assert!(text.contains("Panorama"));
        assert!(!text.contains("Atrium"));

        Ok(())
    }

    #[test]
    fn cuisines_are_listed_once() -> TestResult {
        let text = run_restaurants(RestaurantsSubcommand::Cuisines)?;

        assert_eq!(text.matches("Russian").count(), 1);
        assert!(text.contains("Italian\n"));

        Ok(())
    }

    #[test]
    fn only_round_the_clock_venues_open_at_night() -> TestResult {
        let text = run_restaurants(RestaurantsSubcommand::Open { hour: Some(3) })?;

        assert!(text.starts_with("Open at 03:00"));
        assert!(text.contains("Lobby Bar"));
        assert!(!text.contains("Atrium"));

        Ok(())
    }

    #[test]
    fn prices_show_every_bracket() -> TestResult {
        let text = run_restaurants(RestaurantsSubcommand::Prices)?;

        let rows = text.lines().filter(|line| line.starts_with('│')).count();

        assert_eq!(rows, 1 + 4, "header plus four brackets");

        Ok(())
    }
}
