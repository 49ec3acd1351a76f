//! Time-of-day rating performance from chess.com monthly game archives.
//!
//! `remote` resolves a player's archives and streams them one month at a
//! time, `archive` narrows the month window, and `aggregator` turns the
//! stream into 24 hourly averages per time class.

pub mod aggregator;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod remote;
pub mod report;
pub mod tz;

pub use error::{Error, Result};
