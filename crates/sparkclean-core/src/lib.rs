//! # sparkclean-core
//!
//! Core types, traits, configuration, and error handling for SparkClean.

pub mod config;
pub mod error;
pub mod model;
pub mod recurrence;
pub mod traits;
pub mod validate;
