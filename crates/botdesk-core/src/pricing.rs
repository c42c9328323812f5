//! Rental pricing.
//!
//! Per-day rates are banded by rental length. Bands are checked from the
//! longest threshold down and the first band the day count reaches wins.

use std::fmt;
use std::num::NonZeroU32;

use crate::validation::ValidationError;

/// Whole currency units (VND). No fractional amounts exist anywhere.
pub type Price = u64;

/// Rate bands as `(minimum days, price per day)`, longest threshold first.
const RATE_BANDS: &[(u32, Price)] = &[(90, 4500), (30, 5000), (15, 6000)];

/// Rate for rentals shorter than every band.
const BASE_RATE: Price = 7000;

/// Day counts offered as preset cards on the rental screen.
pub const PRESET_DAYS: [u32; 4] = [7, 15, 30, 90];

/// Initially selected rental length.
pub const DEFAULT_DAYS: u32 = 15;

/// A validated, strictly positive rental length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RentalDays(NonZeroU32);

impl RentalDays {
    pub fn new(days: u32) -> Option<Self> {
        NonZeroU32::new(days).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for RentalDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self.get();
        if days == 1 {
            write!(f, "1 day")
        } else {
            write!(f, "{days} days")
        }
    }
}

/// Parses operator input into a rental length.
///
/// # Errors
/// Returns `Missing` for blank input and `InvalidDays` for anything that is
/// not a positive whole number.
pub fn parse_days(input: &str) -> Result<RentalDays, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field: "number of days" });
    }
    trimmed
        .parse::<u32>()
        .ok()
        .and_then(RentalDays::new)
        .ok_or_else(|| ValidationError::InvalidDays {
            input: trimmed.to_string(),
        })
}

/// Per-day rate for a rental length.
pub fn rate_for(days: RentalDays) -> Price {
    RATE_BANDS
        .iter()
        .find(|(min_days, _)| days.get() >= *min_days)
        .map_or(BASE_RATE, |(_, rate)| *rate)
}

/// Total price for a rental length.
pub fn price_for(days: RentalDays) -> Price {
    Price::from(days.get()) * rate_for(days)
}

/// A rental duration paired with its per-day rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalTier {
    pub days: RentalDays,
    pub price_per_day: Price,
}

impl RentalTier {
    pub fn for_days(days: RentalDays) -> Self {
        Self {
            days,
            price_per_day: rate_for(days),
        }
    }

    pub fn total_price(&self) -> Price {
        Price::from(self.days.get()) * self.price_per_day
    }
}

impl Default for RentalTier {
    fn default() -> Self {
        let days = RentalDays::new(DEFAULT_DAYS).unwrap_or(RentalDays(NonZeroU32::MIN));
        Self::for_days(days)
    }
}

/// Tiers shown as preset cards, in display order.
pub fn preset_tiers() -> Vec<RentalTier> {
    PRESET_DAYS
        .iter()
        .filter_map(|days| RentalDays::new(*days))
        .map(RentalTier::for_days)
        .collect()
}

/// Formats an amount the way the operator sees it: `90.000đ`.
pub fn format_vnd(amount: Price) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push('đ');
    grouped
}
