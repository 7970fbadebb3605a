//! # IAM Token Cache
//!
//! Client-side credential cache for an IAM identity provider: fetches
//! short-lived bearer tokens, caches them, refreshes them before they
//! lapse, and coalesces concurrent cold fetches into a single network
//! call.
//!
//! Modules:
//! - `cache` — token state and the lifecycle coordinator
//! - `sources` — transport contract and the reqwest-backed IAM transport
//! - `config` — coordinator and logging configuration
//! - `errors` — typed error surface

pub mod cache;
pub mod config;
pub mod errors;
pub mod helpers;
pub mod sources;
#[cfg(test)]
pub mod tests;
pub mod utils;

pub use crate::cache::coordinator::TokenCoordinator;
pub use crate::cache::token_state::TokenState;
pub use crate::config::settings::CoordinatorConfig;
pub use crate::errors::{Error, Result};
pub use crate::sources::iam::IamTransport;
pub use crate::sources::TokenTransport;
