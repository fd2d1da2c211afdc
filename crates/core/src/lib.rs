//! SellerDash Core - goal definitions, progress evaluation, and services.
//!
//! This crate contains the goal-tracking business logic for SellerDash.
//! It is storage-agnostic and defines repository traits that storage
//! crates implement. Evaluation itself is pure: callers inject the current
//! time and the sale records to measure.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod sales;
pub mod utils;

// Re-export error types
pub use errors::ConfigurationError;
pub use errors::Error;
pub use errors::Result;
