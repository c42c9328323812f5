//! Payment screen: countdown, confirm and cancel for the open session.

mod render;
mod update;

pub use render::{HINTS, render};
pub use update::{confirm_cancel, handle_key, on_countdown_started, on_settled, on_tick};
