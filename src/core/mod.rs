//! Core benchmark types: models, configuration, errors and the retrying client

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
