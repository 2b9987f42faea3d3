//! Pricing
//!
//! Catalog prices and cart totals are plain minor-unit amounts (kopecks). This
//! module turns the human-written fixture format into minor units and back into
//! displayable [`Money`].

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency every catalog price and cart total is expressed in.
pub const CURRENCY: &Currency = iso::RUB;

/// Errors that can occur while parsing a price.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// The price was not written as `AMOUNT CURRENCY`.
    #[error("Expected format 'AMOUNT CURRENCY', got: {0}")]
    InvalidFormat(String),

    /// The amount could not be parsed, was negative, or too large.
    #[error("Invalid price amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not one we know about.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The currency is known but is not the catalog currency.
    #[error("Price {0} is not in {1}")]
    CurrencyMismatch(String, &'static str),
}

/// Parse a price string (e.g. `"1200 RUB"` or `"99.50 RUB"`) into minor units.
///
/// # Errors
///
/// Returns a [`PriceError`] if the string is not in the format `AMOUNT CURRENCY`,
/// if the amount is not a non-negative decimal, or if the currency is not
/// [`CURRENCY`].
pub fn parse_price(s: &str) -> Result<u64, PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidFormat(s.to_string()));
    };

    let currency = match code {
        "RUB" => iso::RUB,
        "EUR" => iso::EUR,
        "GBP" => iso::GBP,
        "USD" => iso::USD,
        other => return Err(PriceError::UnknownCurrency(other.to_string())),
    };

    if currency != CURRENCY {
        return Err(PriceError::CurrencyMismatch(
            s.to_string(),
            CURRENCY.iso_alpha_code,
        ));
    }

    parse_amount(amount).ok_or_else(|| PriceError::InvalidAmount(s.to_string()))
}

/// Parse a bare decimal amount in major units into minor units.
pub(crate) fn parse_amount(amount: &str) -> Option<u64> {
    minor_units(amount.parse::<Decimal>().ok()?)
}

/// Convert an amount in major units to minor units, rounding to the nearest
/// kopeck. `None` if the amount is negative or too large.
pub(crate) fn minor_units(amount: Decimal) -> Option<u64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return None;
    }

    amount.checked_mul(Decimal::new(100, 0))?.round_dp(0).to_u64()
}

/// Wrap a minor-unit amount as [`Money`] in the catalog currency.
pub fn money(minor_units: u64) -> Money<'static, Currency> {
    Money::from_minor(i64::try_from(minor_units).unwrap_or(i64::MAX), CURRENCY)
}

/// Format a minor-unit amount for display.
pub fn format_price(minor_units: u64) -> String {
    money(minor_units).to_string()
}

/// Minimum, maximum and rounded mean of a set of prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceStats {
    /// Lowest price
    pub min: u64,

    /// Highest price
    pub max: u64,

    /// Mean price, rounded half up to the nearest minor unit
    pub average: u64,
}

impl PriceStats {
    /// Compute stats over the given prices, or `None` if there are none.
    pub fn from_prices(prices: impl IntoIterator<Item = u64>) -> Option<Self> {
        let mut prices = prices.into_iter();
        let first = prices.next()?;

        let (min, max, sum, count) = prices.fold(
            (first, first, u128::from(first), 1_u128),
            |(min, max, sum, count), price| {
                (
                    min.min(price),
                    max.max(price),
                    sum + u128::from(price),
                    count + 1,
                )
            },
        );

        let average = u64::try_from((sum + count / 2) / count).unwrap_or(u64::MAX);

        Some(Self { min, max, average })
    }
}
