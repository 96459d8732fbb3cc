//! Core types and trait definitions for the application tracker.
//!
//! This crate is deliberately free of HTTP and Google dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod program;
pub mod rank;
pub mod store;

pub use program::{Program, ProgramKey};
pub use rank::calculate_rank;
