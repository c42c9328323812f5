//! Command shop: catalog of add-on commands and the selection cart.

mod render;
mod update;

pub use render::{HINTS, render};
pub use update::{confirm_purchase, handle_key};
