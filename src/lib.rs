//! `price-band` library crate.
//!
//! The binary (`pb`) is a thin wrapper around this library so that:
//!
//! - the pipeline is testable without spawning processes
//! - feature extraction and prediction can be embedded elsewhere
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod math;
pub mod predict;
pub mod report;
