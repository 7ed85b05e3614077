//! invoice-core: Shared infrastructure for the invoice generator crates.
pub mod config;
pub mod error;
pub mod observability;
