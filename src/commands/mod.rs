//! Command implementations for the CLI
//!
//! - catalog: list and search firearms
//! - loadout: select a firearm, fetch attachment prices, total the build
//! - login: sign in with the identity provider
//! - config: configuration display and validation

pub mod catalog;
pub mod config;
pub mod loadout;
pub mod login;
