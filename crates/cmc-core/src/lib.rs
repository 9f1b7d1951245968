//! # cmc-core
//!
//! Core crate for the CoinMarketCap client workspace, providing:
//!
//! - **Types** (`types`): option enums, `Limit`, `Structure`, `OneOrMany`
//! - **Configuration** (`config`): JSON config deserialization
//! - **Error types** (`error`): `CmcError` via thiserror
//! - **Logging** (`logging`): tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{CmcError, Result};
// Re-export types at crate root for convenience.
pub use types::*;
