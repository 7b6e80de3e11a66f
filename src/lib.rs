pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod rates;
pub mod services;

pub use config::Config;
pub use errors::{JarLedgerError, Result};
