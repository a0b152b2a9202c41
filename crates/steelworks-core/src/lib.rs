//! Core types and trait definitions for the SteelWorks operations store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod range;
pub mod record;
pub mod report;
pub mod store;

pub use error::{Error, Result};
