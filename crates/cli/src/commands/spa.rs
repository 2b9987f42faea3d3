//! Spa commands

use std::io::Write;

use clap::{Args, Subcommand};
use concierge::{
    catalog::{Catalog, spa::SpaService},
    pricing::format_price,
};

use super::{parse_amount, write_table};

#[derive(Debug, Args)]
pub(crate) struct SpaCommand {
    #[command(subcommand)]
    pub(crate) command: SpaSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum SpaSubcommand {
    /// List services, optionally filtered
    List(ListArgs),

    /// Search names, descriptions, categories and features
    Search {
        /// Text to look for
        query: String,
    },

    /// Promoted services first
    Featured {
        /// Maximum number of services
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },

    /// Service counts per session length bracket
    Durations,
}

#[derive(Debug, Default, Args)]
pub(crate) struct ListArgs {
    /// Service group, e.g. "Massage"
    #[arg(long)]
    category: Option<String>,

    /// Longest acceptable session in minutes
    #[arg(long)]
    max_duration: Option<u32>,

    /// Feature, e.g. "relaxation"
    #[arg(long)]
    feature: Option<String>,

    /// Lowest price in roubles
    #[arg(long, value_parser = parse_amount)]
    min_price: Option<u64>,

    /// Highest price in roubles
    #[arg(long, value_parser = parse_amount)]
    max_price: Option<u64>,
}

pub(crate) fn run(
    command: SpaCommand,
    spa: &Catalog<SpaService>,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        SpaSubcommand::List(args) => {
            let mut matches = spa.iter().collect::<Vec<_>>();

            if let Some(category) = &args.category {
                let by_category = spa.by_category(category);
                matches.retain(|service| by_category.contains(service));
            }

            if let Some(minutes) = args.max_duration {
                let by_duration = spa.by_duration(minutes);
                matches.retain(|service| by_duration.contains(service));
            }

            if let Some(feature) = &args.feature {
                let by_feature = spa.by_feature(feature);
                matches.retain(|service| by_feature.contains(service));
            }

            if args.min_price.is_some() || args.max_price.is_some() {
                let by_price = spa.by_price_range(
                    args.min_price.unwrap_or(0),
                    args.max_price.unwrap_or(u64::MAX),
                );
                matches.retain(|service| by_price.contains(service));
            }

            write_services(out, &matches)
        }
        SpaSubcommand::Search { query } => write_services(out, &spa.search(&query)),
        SpaSubcommand::Featured { limit } => write_services(out, &spa.featured(limit)),
        SpaSubcommand::Durations => write_table(
            out,
            ["From (min)", "Below (min)", "Services"],
            spa.duration_buckets()
                .into_iter()
                .map(|bucket| {
                    [
                        bucket.min.to_string(),
                        bucket
                            .max
                            .map_or_else(|| "-".to_string(), |max| max.to_string()),
                        bucket.count.to_string(),
                    ]
                })
                .collect(),
        ),
    }
}

fn price(service: &SpaService) -> String {
    match service.price_range {
        Some(range) if range.min == range.max => format_price(range.min),
        Some(range) => format!("{} - {}", format_price(range.min), format_price(range.max)),
        None => "Included".to_string(),
    }
}

fn write_services(out: &mut impl Write, services: &[&SpaService]) -> Result<(), String> {
    write_table(
        out,
        ["ID", "Name", "Category", "Duration", "Price"],
        services
            .iter()
            .map(|service| {
                [
                    service.id.clone(),
                    service.name.clone(),
                    service.category.clone(),
                    service.duration.clone().unwrap_or_else(|| "-".to_string()),
                    price(service),
                ]
            })
            .collect(),
    )
}
