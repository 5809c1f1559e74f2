//! # Encore Server Library
//!
//! Wiring shared by the `encore-server` binary and the `encore-plugins` CLI:
//! the built-in plugin catalog, the application builder and startup output.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod startup;

pub use app::{App, AppBuilder};
pub use catalog::builtin_catalog;
