//! Menu commands

use std::io::Write;

use clap::{Args, Subcommand};
use concierge::{
    catalog::menu::{DietaryInfo, Menu, MenuItem, MenuQuery},
    pricing::format_price,
};

use super::{current_hour, parse_amount, write_line, write_table};

#[derive(Debug, Args)]
pub(crate) struct MenuCommand {
    #[command(subcommand)]
    pub(crate) command: MenuSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum MenuSubcommand {
    /// List items, optionally filtered
    List(ListArgs),

    /// List browsable categories with item counts
    Categories,

    /// Search names, descriptions and categories
    Search {
        /// Text to look for
        query: String,
    },

    /// Suggest items for the time of day
    Recommended {
        /// Hour of day (0-23); defaults to now
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..24))]
        hour: Option<u8>,
    },

    /// A short selection across categories
    Featured {
        /// Maximum number of items
        #[arg(long, default_value_t = 6)]
        limit: usize,
    },

    /// Show one item in full
    Show {
        /// Item id, e.g. borscht
        id: String,
    },

    /// Lowest, highest and average price
    Stats,
}

#[derive(Debug, Default, Args)]
pub(crate) struct ListArgs {
    /// Category name, e.g. "Soups"
    #[arg(long)]
    category: Option<String>,

    /// Text matched against name and description
    #[arg(long)]
    text: Option<String>,

    /// Lowest price in roubles
    #[arg(long, value_parser = parse_amount)]
    min_price: Option<u64>,

    /// Highest price in roubles
    #[arg(long, value_parser = parse_amount)]
    max_price: Option<u64>,

    /// Only vegetarian dishes
    #[arg(long)]
    vegetarian: bool,

    /// Only lactose-free dishes
    #[arg(long)]
    lactose_free: bool,

    /// Only gluten-free dishes
    #[arg(long)]
    gluten_free: bool,
}

impl ListArgs {
    fn query(&self) -> MenuQuery {
        let dietary = DietaryInfo {
            vegetarian: self.vegetarian,
            lactose_free: self.lactose_free,
            gluten_free: self.gluten_free,
            ..DietaryInfo::default()
        };

        MenuQuery {
            text: self.text.clone(),
            category: self.category.clone(),
            min_price: self.min_price,
            max_price: self.max_price,
            dietary: (dietary != DietaryInfo::default()).then_some(dietary),
        }
    }
}

pub(crate) fn run(command: MenuCommand, menu: &Menu, out: &mut impl Write) -> Result<(), String> {
    match command.command {
        MenuSubcommand::List(args) => write_items(out, &menu.query(&args.query())),
        MenuSubcommand::Categories => write_table(
            out,
            ["ID", "Category", "Items"],
            menu.category_item_counts()
                .into_iter()
                .filter(|(category, _)| !category.hidden)
                .map(|(category, count)| {
                    [category.id.clone(), category.name.clone(), count.to_string()]
                })
                .collect(),
        ),
        MenuSubcommand::Search { query } => write_items(out, &menu.search(&query)),
        MenuSubcommand::Recommended { hour } => {
            let hour = hour.unwrap_or_else(current_hour);

            write_line(out, format!("Recommended at {hour:02}:00"))?;
            write_items(out, &menu.recommended_for_hour(hour))
        }
        MenuSubcommand::Featured { limit } => write_items(out, &menu.featured(limit)),
        MenuSubcommand::Show { id } => {
            let item = menu
                .item(&id)
                .ok_or_else(|| format!("no menu item with id '{id}'"))?;

            write_item(out, item)
        }
        MenuSubcommand::Stats => match menu.price_stats() {
            Some(stats) => write_table(
                out,
                ["Items", "Lowest", "Highest", "Average"],
                vec![[
                    menu.items().len().to_string(),
                    format_price(stats.min),
                    format_price(stats.max),
                    format_price(stats.average),
                ]],
            ),
            None => write_line(out, "The menu is empty"),
        },
    }
}

fn write_items(out: &mut impl Write, items: &[&MenuItem]) -> Result<(), String> {
    write_table(
        out,
        ["ID", "Name", "Category", "Portion", "Price"],
        items
            .iter()
            .map(|item| {
                [
                    item.id.clone(),
                    item.name.clone(),
                    item.category.clone(),
                    item.portion.clone().unwrap_or_else(|| "-".to_string()),
                    format_price(item.price),
                ]
            })
            .collect(),
    )
}

fn write_item(out: &mut impl Write, item: &MenuItem) -> Result<(), String> {
    write_line(out, &item.name)?;
    write_line(out, format!("  Category: {}", item.category))?;
    write_line(out, format!("  Price:    {}", format_price(item.price)))?;

    if let Some(portion) = &item.portion {
        write_line(out, format!("  Portion:  {portion}"))?;
    }

    if let Some(description) = &item.description {
        write_line(out, format!("  {description}"))?;
    }

    let flags = dietary_labels(item.dietary);

    if !flags.is_empty() {
        write_line(out, format!("  Dietary:  {}", flags.join(", ")))?;
    }

    Ok(())
}

fn dietary_labels(dietary: DietaryInfo) -> Vec<&'static str> {
    [
        (dietary.vegetarian, "vegetarian"),
        (dietary.lactose_free, "lactose-free"),
        (dietary.gluten_free, "gluten-free"),
        (dietary.spicy, "spicy"),
        (dietary.halal, "halal"),
    ]
    .into_iter()
    .filter_map(|(set, label)| set.then_some(label))
    .collect()
}
