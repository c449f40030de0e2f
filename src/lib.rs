// Library modules for integration tests
pub mod account;
pub mod audio;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
mod models; // Internal module, not exported
pub mod provider;
pub mod rate_limit;
pub mod server;
pub mod utils;
