//! Wire types exchanged between the clients API and its consumers.

pub mod api;
