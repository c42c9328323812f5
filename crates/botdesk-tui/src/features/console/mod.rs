//! Console screen: bot list, conversation targets, transcript panel and composer.

mod render;
mod update;

pub use render::{hints, render};
pub use update::{clamp_cursors, handle_key};
