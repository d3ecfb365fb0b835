//! Infrastructure: port traits and their concrete adapters.

pub mod clock;
pub mod config;
pub mod ports;
pub mod sqlite;
