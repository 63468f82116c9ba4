//! Domain aggregates shared by the clients API and the admin console.

pub mod client;
pub mod client_event;
pub mod country;
pub mod types;
