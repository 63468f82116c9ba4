//! Database models and configuration shared across the crate.

#[cfg(feature = "server")]
pub mod client;
pub mod config;
