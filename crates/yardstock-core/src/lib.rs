//! # yardstock-core
//!
//! Core crate for Yardstock. Contains configuration schemas, typed
//! identifiers, and the unified error system shared by the store and
//! the authentication engine.
//!
//! This crate has **no** internal dependencies on other Yardstock crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
