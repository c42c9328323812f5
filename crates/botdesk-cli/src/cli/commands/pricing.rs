//! Rental price lookups.

use anyhow::Result;
use botdesk_core::pricing::{self, RentalTier, format_vnd};

pub fn price(days: &str) -> Result<()> {
    let days = pricing::parse_days(days)?;
    let tier = RentalTier::for_days(days);
    println!(
        "{days}: {} ({}/day)",
        format_vnd(tier.total_price()),
        format_vnd(tier.price_per_day)
    );
    Ok(())
}

pub fn tiers() {
    for tier in pricing::preset_tiers() {
        println!(
            "{:>8}  {:>10}  {}/day",
            tier.days.to_string(),
            format_vnd(tier.total_price()),
            format_vnd(tier.price_per_day)
        );
    }
}
