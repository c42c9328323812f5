//! Rental screen: tier cards, custom day count, payment method and contact form.

mod render;
mod update;

pub use render::{HINTS, render};
pub use update::handle_key;
