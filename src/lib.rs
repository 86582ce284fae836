//! Offshore wind turbine placement, yield simulation, and revenue estimation.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod geo;
/// Click debouncing and two-click area selection.
pub mod interaction;
pub mod io;
pub mod placement;
pub mod service;
pub mod session;
/// Simulation period, orchestration, result types, and aggregation.
pub mod sim;
pub mod turbine;
pub mod view;

pub use error::{Error, Result, ServiceError};
