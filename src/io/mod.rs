//! Output helpers: JSON rendering and file export (`export`).

pub mod export;

pub use export::*;
