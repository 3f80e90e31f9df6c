// Chronicle aggregator library

pub mod api;
pub mod config;
pub mod consumer;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod queue;
pub mod store;

pub use config::Config;
pub use errors::{AppError, Result};
