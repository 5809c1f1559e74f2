//! # Encore Core
//!
//! Core types, traits, and error definitions for the Encore plugin platform.
//! Every other crate in the workspace reports failures through [`EncoreError`]
//! and identifies plugins through [`PluginId`].

pub mod error;
pub mod id;
pub mod result;
pub mod traits;

pub use error::*;
pub use id::*;
pub use result::*;
pub use traits::*;
