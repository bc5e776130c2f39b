//! Core types and utilities for the Primordia artificial-life simulation.

pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{Error, Result};
pub use types::*;
