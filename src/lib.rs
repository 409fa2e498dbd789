pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feedback;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod pricing;
pub mod selection;
pub mod session;

pub use logging::init_tracing;
