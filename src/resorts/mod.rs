//! Ski resort module
//!
//! This module provides the built-in resort catalog and the search logic that
//! turns a configured location or a manual resort list into candidate resorts.

pub mod catalog;
pub mod finder;

pub use catalog::ResortCatalog;
pub use finder::{ResortFinder, ResortSpec};
