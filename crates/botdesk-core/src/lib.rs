//! Core botdesk library (transcript panel, pricing, cart, payment session, API client, config).

pub mod api;
pub mod cart;
pub mod collaborators;
pub mod config;
pub mod directory;
pub mod logging;
pub mod payment;
pub mod pricing;
pub mod transcript;
pub mod validation;
